use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::campaign::Campaign;
use crate::config::CampaignConfig;
use crate::content::Catalog;
use crate::model::*;
use crate::scheduler::ManualScheduler;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A fresh level-1 player: every visible attribute 10, 200 gold, 800 of 1000 troops.
pub fn test_player() -> Player {
    Player {
        name: "Tester".to_string(),
        level: 1,
        attributes: Attributes::uniform(10, 0),
        skills: Vec::new(),
        equipment: Loadout::new(),
        gold: 200,
        troops: 800,
        max_troops: 1000,
        cities_controlled: 1,
        battles_won: 0,
        battles_lost: 0,
        generals_recruited: 0,
        maintenance_cost: 0,
    }
}

pub fn test_catalog() -> Catalog {
    Catalog::builtin().expect("bundled catalog should load")
}

/// Default campaign state, still in the draft phase.
pub fn test_state(catalog: &Catalog) -> GameState {
    catalog.instantiate(&CampaignConfig::default())
}

/// A campaign on the bundled catalog with a virtual clock and a fixed seed.
pub fn seeded_campaign(seed: u64) -> Campaign<ManualScheduler> {
    Campaign::with_rng(
        test_catalog(),
        CampaignConfig::default(),
        ManualScheduler::new(),
        SmallRng::seed_from_u64(seed),
    )
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Assert a game state still holds its structural invariants.
pub fn assert_consistent(state: &GameState) {
    let problems = state.validate();
    assert!(problems.is_empty(), "inconsistent state: {problems:?}");
}

#![allow(dead_code)]

use destiny_campaign::config::CampaignConfig;
use destiny_campaign::content::{Catalog, CatalogSources};
use destiny_campaign::model::Attributes;
use destiny_campaign::scheduler::TurnScheduler;
use destiny_campaign::Campaign;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub const HOME_CITY: &str = "home";
pub const FORT_CITY: &str = "fort";

const TWO_CITIES: &str = r#"[
    {"id": "home", "name": "Home", "faction": "other", "connections": ["fort"],
     "gold_production": 100, "troop_production": 50, "defense_value": 80},
    {"id": "fort", "name": "Fort", "faction": "wei", "connections": ["home"],
     "gold_production": 100, "troop_production": 50, "defense_value": 50}
]"#;

/// Two connected cities, an empty garrison, and no skills, gear, or events.
pub fn two_city_catalog() -> Catalog {
    Catalog::from_json_strs(CatalogSources {
        skills: "[]",
        cities: TWO_CITIES,
        generals: "[]",
        equipment: "[]",
        events: "[]",
    })
    .unwrap()
}

/// Opens straight into play in [`HOME_CITY`] with every attribute at 100.
pub fn strong_config() -> CampaignConfig {
    CampaignConfig {
        draft_rounds: 0,
        starting_attributes: Attributes::uniform(100, 0),
        preferred_start_cities: vec![HOME_CITY.to_string()],
        ..CampaignConfig::default()
    }
}

pub fn seeded<S: TurnScheduler>(
    catalog: Catalog,
    config: CampaignConfig,
    scheduler: S,
    seed: u64,
) -> Campaign<S> {
    Campaign::with_rng(catalog, config, scheduler, SmallRng::seed_from_u64(seed))
}

/// Write the bundled catalog's files into `dir`.
pub fn write_catalog(dir: &std::path::Path) {
    let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    for file in [
        "skills.json",
        "cities.json",
        "generals.json",
        "equipment.json",
        "events.json",
    ] {
        std::fs::copy(data.join(file), dir.join(file)).unwrap();
    }
}

//! Combat phase: march on one adjacent city, resolve the battle, and take
//! the city and its garrison on victory.

use rand::RngCore;

use super::context::PhaseContext;
use super::formulas::{
    check_probability, garrison_troop_power, general_combat_power, pick, player_combat_power,
    random_int, win_probability,
};
use super::phase::TurnPhase;
use super::recruitment::{attempt_recruitment, describe_attempt};
use crate::error::PhaseError;
use crate::model::{City, Faction, GameState, MessageCategory, TurnMessage};

/// The army will not march with fewer troops than this.
pub const MIN_ATTACK_TROOPS: i64 = 50;

const VICTORY_CASUALTY_PERCENT: (i64, i64) = (5, 15);
const DEFEAT_CASUALTY_PERCENT: (i64, i64) = (20, 40);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleResult {
    pub victory: bool,
    /// Chance of victory used for the roll, always within `[15, 85]`.
    pub win_rate: f64,
    pub casualties: i64,
}

/// Non-player cities adjacent to any player-held city, each listed once.
pub fn attack_targets(state: &GameState) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for city in state.player_cities() {
        for id in &city.connections {
            let Some(neighbor) = state.cities.get(id) else {
                continue;
            };
            if !neighbor.is_player_held() && !targets.contains(id) {
                targets.push(id.clone());
            }
        }
    }
    targets
}

pub fn select_target(state: &GameState, rng: &mut dyn RngCore) -> Option<String> {
    pick(rng, &attack_targets(state)).cloned()
}

/// Defense value plus every garrisoned general's power and troops, floored.
pub fn defender_power(state: &GameState, city: &City) -> i64 {
    let garrison: f64 = city
        .garrison
        .iter()
        .filter_map(|id| state.general(id))
        .map(|g| {
            general_combat_power(&g.attributes, &g.equipment) as f64
                + garrison_troop_power(g.troops)
        })
        .sum();
    (city.defense_value as f64 + garrison).floor() as i64
}

/// Roll one battle. Casualties are a share of `troops`, never more than it.
pub fn resolve_battle(
    rng: &mut dyn RngCore,
    player_power: i64,
    enemy_power: i64,
    troops: i64,
) -> BattleResult {
    let win_rate = win_probability(player_power, enemy_power);
    let victory = check_probability(rng, win_rate);
    let (min, max) = if victory {
        VICTORY_CASUALTY_PERCENT
    } else {
        DEFEAT_CASUALTY_PERCENT
    };
    let percent = random_int(rng, min, max);
    let troops = troops.max(0);
    let casualties = (troops * percent / 100).min(troops);
    BattleResult {
        victory,
        win_rate,
        casualties,
    }
}

/// Flip a city to the player and hand back the garrison it held.
pub fn capture_city(state: &mut GameState, city_id: &str) -> Result<Vec<String>, PhaseError> {
    let city = state
        .cities
        .get_mut(city_id)
        .ok_or_else(|| PhaseError::UnknownCity(city_id.to_string()))?;
    city.faction = Faction::Player;
    let garrison = std::mem::take(&mut city.garrison);
    state.player.cities_controlled += 1;
    Ok(garrison)
}

#[derive(Debug, Default)]
pub struct CombatPhase;

impl TurnPhase for CombatPhase {
    fn name(&self) -> &str {
        "combat"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        if ctx.state.player.troops < MIN_ATTACK_TROOPS {
            return Ok(vec![TurnMessage::new(
                MessageCategory::Battle,
                "Too few troops to march. The army holds its ground.",
            )]);
        }
        let Some(target_id) = select_target(ctx.state, ctx.rng) else {
            return Ok(vec![TurnMessage::new(
                MessageCategory::Battle,
                "No neighboring city is open to attack.",
            )]);
        };
        let target = ctx
            .state
            .cities
            .get(&target_id)
            .ok_or_else(|| PhaseError::UnknownCity(target_id.clone()))?;
        let target_name = target.name.clone();
        let enemy_power = defender_power(ctx.state, target);
        let player_power = player_combat_power(&ctx.state.player).total;

        let result = resolve_battle(ctx.rng, player_power, enemy_power, ctx.state.player.troops);
        ctx.state.player.lose_troops(result.casualties);
        tracing::debug!(
            city = %target_id,
            player_power,
            enemy_power,
            win_rate = result.win_rate,
            victory = result.victory,
            "battle resolved"
        );

        let verdict = if result.victory { "Victory" } else { "Defeat" };
        let mut messages = vec![TurnMessage::new(
            MessageCategory::Battle,
            format!(
                "{verdict} at {target_name} (power {player_power} vs {enemy_power}, {:.0}% odds). {} troops lost.",
                result.win_rate, result.casualties
            ),
        )];

        if !result.victory {
            ctx.state.player.battles_lost += 1;
            return Ok(messages);
        }

        ctx.state.player.battles_won += 1;
        let garrison = capture_city(ctx.state, &target_id)?;
        messages.push(TurnMessage::new(
            MessageCategory::Capture,
            format!("{target_name} now flies your banner."),
        ));
        for general_id in &garrison {
            let recruitable = ctx
                .state
                .general(general_id)
                .is_some_and(|g| g.is_recruitable());
            if recruitable {
                let attempt = attempt_recruitment(ctx.state, ctx.rng, general_id)?;
                messages.push(describe_attempt(&attempt));
            }
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testutil::{test_catalog, test_state};

    fn hold(state: &mut GameState, id: &str) {
        state.cities.get_mut(id).unwrap().faction = Faction::Player;
    }

    #[test]
    fn targets_are_deduplicated_neighbors() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        // Both border wan.
        hold(&mut state, "luoyang");
        hold(&mut state, "xuchang");
        let targets = attack_targets(&state);
        assert_eq!(targets.iter().filter(|t| *t == "wan").count(), 1);
        assert!(!targets.iter().any(|t| t == "luoyang" || t == "xuchang"));
        for t in &targets {
            assert!(state.cities[t].connections.iter().any(|c| c == "luoyang" || c == "xuchang"));
        }
    }

    #[test]
    fn casualties_never_exceed_troops() {
        let mut rng = SmallRng::seed_from_u64(4);
        for troops in [0, 1, 7, 50, 800, 12_345] {
            for _ in 0..50 {
                let result = resolve_battle(&mut rng, 100, 100, troops);
                assert!(result.casualties <= troops);
                assert!(result.casualties >= 0);
                let percent = if result.victory { 15 } else { 40 };
                assert!(result.casualties <= troops * percent / 100);
            }
        }
    }

    #[test]
    fn lopsided_battles_still_use_clamped_odds() {
        let mut rng = SmallRng::seed_from_u64(8);
        assert_eq!(resolve_battle(&mut rng, 1_000_000, 1, 100).win_rate, 85.0);
        assert_eq!(resolve_battle(&mut rng, 1, 1_000_000, 100).win_rate, 15.0);
    }

    #[test]
    fn defender_power_counts_garrison() {
        let catalog = test_catalog();
        let state = test_state(&catalog);
        let empty = &state.cities["wan"];
        assert_eq!(defender_power(&state, empty), empty.defense_value);
        let held = &state.cities["luoyang"];
        assert!(defender_power(&state, held) > held.defense_value);
    }

    #[test]
    fn capture_flips_faction_and_clears_garrison() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let garrison = capture_city(&mut state, "luoyang").unwrap();
        assert_eq!(garrison, vec!["cao_ren".to_string()]);
        assert!(state.cities["luoyang"].is_player_held());
        assert!(state.cities["luoyang"].garrison.is_empty());
        assert_eq!(state.player.cities_controlled, 2);
        assert!(matches!(
            capture_city(&mut state, "atlantis"),
            Err(PhaseError::UnknownCity(_))
        ));
    }

    #[test]
    fn weak_army_stays_home() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        hold(&mut state, "wan");
        state.player.troops = 49;
        let before = state.clone();
        let mut rng = SmallRng::seed_from_u64(2);
        let messages = CombatPhase
            .run(&mut PhaseContext {
                state: &mut state,
                catalog: &catalog,
                rng: &mut rng,
            })
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(state.player, before.player);
        assert_eq!(state.cities, before.cities);
    }

    #[test]
    fn a_battle_always_changes_the_record() {
        let catalog = test_catalog();
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..20 {
            let mut state = test_state(&catalog);
            hold(&mut state, "wan");
            let troops = state.player.troops;
            CombatPhase
                .run(&mut PhaseContext {
                    state: &mut state,
                    catalog: &catalog,
                    rng: &mut rng,
                })
                .unwrap();
            let p = &state.player;
            assert_eq!(p.battles_won + p.battles_lost, 1);
            assert!(p.troops <= troops);
            assert_eq!(p.cities_controlled, 1 + p.battles_won);
        }
    }
}

use std::collections::BTreeMap;

use super::context::PhaseContext;
use super::formulas::{pick, random_int};
use super::phase::TurnPhase;
use crate::error::PhaseError;
use crate::model::{Attribute, MAX_LEVEL, MessageCategory, Player, TurnMessage};

/// Victories needed per level.
const WINS_PER_LEVEL: u32 = 2;
const LEVEL_UP_POINTS: (i64, i64) = (3, 8);

/// Level earned by the player's victories so far, before the cap.
pub fn earned_level(player: &Player) -> u32 {
    1 + player.battles_won / WINS_PER_LEVEL
}

/// One level per turn while the player's victories are ahead of their level.
#[derive(Debug, Default)]
pub struct LevelingPhase;

impl TurnPhase for LevelingPhase {
    fn name(&self) -> &str {
        "leveling"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        let player = &mut ctx.state.player;
        if player.level >= MAX_LEVEL || player.level >= earned_level(player) {
            return Ok(Vec::new());
        }
        player.level += 1;

        let points = random_int(ctx.rng, LEVEL_UP_POINTS.0, LEVEL_UP_POINTS.1);
        let mut gains: BTreeMap<Attribute, i32> = BTreeMap::new();
        for _ in 0..points {
            let Some(&attr) = pick(ctx.rng, &Attribute::VISIBLE) else {
                break;
            };
            let applied = player.attributes.adjust(attr, 1);
            *gains.entry(attr).or_default() += applied;
        }

        let summary: Vec<String> = gains
            .iter()
            .filter(|(_, gain)| **gain > 0)
            .map(|(attr, gain)| format!("{attr} +{gain}"))
            .collect();
        let mut text = format!("Reached level {}.", player.level);
        if !summary.is_empty() {
            text.push(' ');
            text.push_str(&summary.join(", "));
        }
        tracing::debug!(level = player.level, "player leveled up");
        Ok(vec![TurnMessage::new(MessageCategory::LevelUp, text)])
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::GameState;
    use crate::testutil::{test_catalog, test_state};

    fn run_once(state: &mut GameState, rng: &mut SmallRng) -> Vec<TurnMessage> {
        let catalog = test_catalog();
        LevelingPhase
            .run(&mut PhaseContext {
                state,
                catalog: &catalog,
                rng,
            })
            .unwrap()
    }

    #[test]
    fn no_level_without_victories() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(1);
        state.player.battles_won = 1;
        assert!(run_once(&mut state, &mut rng).is_empty());
        assert_eq!(state.player.level, 1);
    }

    #[test]
    fn one_level_per_turn_until_caught_up() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(2);
        state.player.battles_won = 5;
        let total_before = state.player.attributes.visible_total();

        assert_eq!(run_once(&mut state, &mut rng).len(), 1);
        assert_eq!(state.player.level, 2);
        let gained = state.player.attributes.visible_total() - total_before;
        assert!((3..=8).contains(&gained));

        run_once(&mut state, &mut rng);
        assert_eq!(state.player.level, 3);
        assert!(run_once(&mut state, &mut rng).is_empty());
        assert_eq!(state.player.level, 3);
    }

    #[test]
    fn level_is_capped() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(3);
        state.player.battles_won = 100;
        for _ in 0..30 {
            run_once(&mut state, &mut rng);
        }
        assert_eq!(state.player.level, MAX_LEVEL);
    }

    #[test]
    fn gains_respect_the_attribute_ceiling() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(4);
        state.player.attributes = crate::model::Attributes::uniform(100, 0);
        state.player.battles_won = 2;
        run_once(&mut state, &mut rng);
        assert_eq!(state.player.level, 2);
        assert!(state.player.attributes.visible_in_bounds());
    }
}

use rand::RngCore;

use super::formulas::pick;
use super::recruitment::enlist_general;
use crate::content::Catalog;
use crate::model::{EffectKind, Equipment, GameState};

/// Apply one effect to the campaign, whichever pipeline it came from
/// (skill selection, event outcome, item grant).
///
/// Returns a short note when the effect did something worth reporting.
/// Passive effects (combat, recruitment and event modifiers) change nothing
/// here; resolvers read them off the player's skills.
pub fn apply_effect(
    state: &mut GameState,
    catalog: &Catalog,
    effect: &EffectKind,
    rng: &mut dyn RngCore,
) -> Option<String> {
    let player = &mut state.player;
    match effect {
        EffectKind::AttributeBonus { target, value } => {
            let applied = player.attributes.adjust_target(*target, *value);
            Some(format!("{} {applied:+}", String::from(*target)))
        }
        EffectKind::AttributeChange { target, value } => {
            let applied = player.attributes.adjust(*target, *value);
            Some(format!("{target} {applied:+}"))
        }
        EffectKind::CombatBonus { .. }
        | EffectKind::EventModifier { .. }
        | EffectKind::RecruitmentBonus { .. }
        | EffectKind::Special { .. } => None,
        EffectKind::GainGold { value } => {
            let applied = player.add_gold(*value);
            Some(format!("gold {applied:+}"))
        }
        EffectKind::GainTroops { value } => {
            let gained = player.gain_troops_capped(*value);
            Some(format!("troops {gained:+}"))
        }
        EffectKind::LoseTroops { value } => {
            let lost = player.lose_troops(*value);
            Some(format!("troops -{lost}"))
        }
        EffectKind::GainEquipment { rarity } => {
            let cities = player.cities_controlled;
            let candidates: Vec<&Equipment> = catalog
                .equipment
                .iter()
                .filter(|e| e.obtainable_with(cities))
                .filter(|e| rarity.is_none_or(|r| e.rarity == r))
                .collect();
            let item = (*pick(rng, &candidates)?).clone();
            let name = item.name.clone();
            let rarity = item.rarity;
            if let Some(old) = player.equipment.equip(item) {
                tracing::debug!(replaced = %old.id, "equipment slot replaced");
            }
            Some(format!("obtained {name} ({rarity})"))
        }
        EffectKind::GainGeneral => {
            let candidates: Vec<String> = state
                .generals
                .iter()
                .filter(|g| g.is_recruitable())
                .map(|g| g.id.clone())
                .collect();
            let id = pick(rng, &candidates)?;
            enlist_general(state, id).map(|(name, troops)| {
                format!("{name} joins with {troops} troops")
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::{Attribute, AttributeTarget, GeneralStatus, Rarity};
    use crate::testutil::{test_catalog, test_state};

    #[test]
    fn attribute_effects_keep_visible_attributes_in_bounds() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(1);
        let effects = [
            EffectKind::AttributeBonus {
                target: AttributeTarget::AllVisible,
                value: 250,
            },
            EffectKind::AttributeChange {
                target: Attribute::Charisma,
                value: -400,
            },
            EffectKind::AttributeBonus {
                target: AttributeTarget::One(Attribute::Politics),
                value: -3,
            },
        ];
        for effect in &effects {
            apply_effect(&mut state, &catalog, effect, &mut rng);
            assert!(state.player.attributes.visible_in_bounds());
        }
        assert_eq!(state.player.attributes.strength, 100);
        assert_eq!(state.player.attributes.charisma, 0);
        assert_eq!(state.player.attributes.politics, 97);
    }

    #[test]
    fn gold_and_troop_losses_floor_at_zero() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(1);
        state.player.gold = 50;
        state.player.troops = 30;
        apply_effect(&mut state, &catalog, &EffectKind::GainGold { value: -80 }, &mut rng);
        apply_effect(&mut state, &catalog, &EffectKind::LoseTroops { value: 100 }, &mut rng);
        assert_eq!(state.player.gold, 0);
        assert_eq!(state.player.troops, 0);
    }

    #[test]
    fn passive_effects_change_nothing() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let before = state.player.clone();
        let mut rng = SmallRng::seed_from_u64(1);
        let note = apply_effect(&mut state, &catalog, &EffectKind::CombatBonus { value: 9 }, &mut rng);
        assert!(note.is_none());
        assert_eq!(state.player, before);
    }

    #[test]
    fn gain_equipment_respects_rarity_and_requirements() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(5);
        state.player.cities_controlled = 1;
        let note = apply_effect(
            &mut state,
            &catalog,
            &EffectKind::GainEquipment {
                rarity: Some(Rarity::Common),
            },
            &mut rng,
        );
        assert!(note.is_some());
        assert!(state.player.equipment.items().all(|e| e.rarity == Rarity::Common));

        // Every legendary needs several cities or an event.
        let mut fresh = test_state(&catalog);
        let none = apply_effect(
            &mut fresh,
            &catalog,
            &EffectKind::GainEquipment {
                rarity: Some(Rarity::Legendary),
            },
            &mut rng,
        );
        assert!(none.is_none());
        assert!(fresh.player.equipment.is_empty());
    }

    #[test]
    fn gain_general_enlists_a_recruitable_general() {
        let catalog = test_catalog();
        let mut state = test_state(&catalog);
        let mut rng = SmallRng::seed_from_u64(9);
        let note = apply_effect(&mut state, &catalog, &EffectKind::GainGeneral, &mut rng);
        assert!(note.is_some());
        assert_eq!(state.player.generals_recruited, 1);
        let allies = state
            .generals
            .iter()
            .filter(|g| g.status == GeneralStatus::Ally)
            .count();
        assert_eq!(allies, 1);
    }
}

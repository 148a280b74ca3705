use serde::{Deserialize, Serialize};

use super::attributes::{Attribute, AttributeTarget};
use super::equipment::Rarity;

/// One effect carried by a skill, an event outcome, or an item grant.
///
/// Every effect kind in the game lives here so application is a single
/// exhaustive match (see `sim::effects::apply_effect`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(flatten)]
    pub kind: EffectKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Permanent attribute increase granted by a skill.
    AttributeBonus { target: AttributeTarget, value: i32 },
    /// Flat bonus added to the player's combat power.
    CombatBonus { value: i32 },
    /// Passive modifier with no immediate effect; kept on the skill.
    EventModifier { value: i32 },
    /// Added to the recruitment rate when approaching generals.
    RecruitmentBonus { value: i32 },
    /// Marker effect resolved elsewhere (or not at all).
    Special {
        #[serde(default)]
        value: i32,
    },
    /// Attribute change from an event outcome.
    AttributeChange { target: Attribute, value: i32 },
    GainGold { value: i64 },
    GainTroops { value: i64 },
    LoseTroops { value: i64 },
    /// Grant a random obtainable item, optionally restricted by rarity.
    GainEquipment {
        #[serde(default)]
        rarity: Option<Rarity>,
    },
    /// A random enemy or neutral general defects to the player.
    GainGeneral,
}

impl EffectKind {
    /// Contribution of this effect to the player's combat power.
    pub fn combat_value(&self) -> f64 {
        match self {
            EffectKind::CombatBonus { value } | EffectKind::AttributeBonus { value, .. } => {
                f64::from(*value)
            }
            _ => 0.0,
        }
    }

    pub fn recruitment_value(&self) -> i32 {
        match self {
            EffectKind::RecruitmentBonus { value } => *value,
            _ => 0,
        }
    }
}

impl Effect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            description: String::new(),
        }
    }
}

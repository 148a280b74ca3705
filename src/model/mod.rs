#[macro_use]
mod macros;

pub mod attributes;
pub mod city;
pub mod effect;
pub mod equipment;
pub mod event;
pub mod general;
pub mod message;
pub mod player;
pub mod skill;
pub mod state;

pub use attributes::{Attribute, AttributeTarget, Attributes};
pub use city::{City, Faction, SpecialBonus};
pub use effect::{Effect, EffectKind};
pub use equipment::{Equipment, EquipmentRequirements, EquipmentSlot, Loadout, Rarity};
pub use event::{Comparison, EventOutcome, EventRecord, EventType, GameEvent, Requirement};
pub use general::{General, GeneralStatus};
pub use message::{LoggedMessage, MessageCategory, TurnMessage};
pub use player::{MAX_LEVEL, Player};
pub use skill::{Skill, SkillType};
pub use state::{GameOutcome, GamePhase, GameSettings, GameState, Season};

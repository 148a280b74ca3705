pub mod combat;
mod context;
pub mod draft;
pub mod economy;
pub mod effects;
pub mod events;
pub mod formulas;
pub mod leveling;
pub mod opening;
mod phase;
pub mod recruitment;
mod runner;
pub mod timing;

pub use combat::CombatPhase;
pub use context::PhaseContext;
pub use draft::{DraftStep, SkillDraft, StarConversion};
pub use economy::{ProductionPhase, UpkeepPhase};
pub use effects::apply_effect;
pub use events::EventPhase;
pub use leveling::LevelingPhase;
pub use opening::open_campaign;
pub use phase::TurnPhase;
pub use recruitment::RecruitmentPhase;
pub use runner::{TurnOutput, TurnRunner, check_game_end, game_over_message};

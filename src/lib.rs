pub mod campaign;
pub mod config;
pub mod content;
pub mod driver;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod sim;

#[cfg(test)]
mod testutil;

pub use campaign::{Campaign, TurnReport};
pub use config::{CampaignConfig, TimingConfig};
pub use content::Catalog;
pub use driver::{Command, run_live};
pub use error::{ContentError, DraftError, PhaseError};
pub use model::{GameOutcome, GamePhase, GameState, LoggedMessage, MessageCategory, TurnMessage};
pub use scheduler::{ManualScheduler, Tick, TokioScheduler, TurnScheduler};

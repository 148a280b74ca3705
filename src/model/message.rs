use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MessageCategory {
    Opening,
    Turn,
    Production,
    Event,
    Battle,
    Capture,
    Recruitment,
    LevelUp,
    Upkeep,
    GameOver,
}

string_enum!(MessageCategory, "message category", {
    Opening => "opening",
    Turn => "turn",
    Production => "production",
    Event => "event",
    Battle => "battle",
    Capture => "capture",
    Recruitment => "recruitment",
    LevelUp => "level_up",
    Upkeep => "upkeep",
    GameOver => "game_over",
});

/// A human-readable result line produced by a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    pub category: MessageCategory,
    pub message: String,
}

impl TurnMessage {
    pub fn new(category: MessageCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// A message as kept in the campaign-wide log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub turn: u32,
    #[serde(flatten)]
    pub message: TurnMessage,
}

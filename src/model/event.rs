use serde::{Deserialize, Serialize};

use super::attributes::Attribute;
use super::effect::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventType {
    Positive,
    Negative,
    Neutral,
    Choice,
}

string_enum!(EventType, "event type", {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
    Choice => "choice",
});

impl EventType {
    pub fn marker(self) -> &'static str {
        match self {
            EventType::Positive => "[+]",
            EventType::Negative => "[-]",
            EventType::Neutral => "[~]",
            EventType::Choice => "[?]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Comparison {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    Ne,
}

string_enum!(Comparison, "comparison operator", {
    Ge => ">=",
    Le => "<=",
    Gt => ">",
    Lt => "<",
    Eq => "==",
    Ne => "!=",
});

impl Comparison {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

/// A predicate over the player that gates an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    Level {
        operator: Comparison,
        value: i64,
    },
    CityCount {
        operator: Comparison,
        value: i64,
    },
    Attribute {
        target: Attribute,
        operator: Comparison,
        value: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Percent weight. Non-choice events' outcomes sum to 100.
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub description: String,
    /// Base chance (0–100) of firing when scanned.
    pub base_probability: f64,
    /// Scales destiny's influence on the firing chance.
    #[serde(default)]
    pub destiny_modifier: f64,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    pub outcomes: Vec<EventOutcome>,
    #[serde(default)]
    pub is_choice: bool,
}

impl GameEvent {
    /// Choice events pick an outcome uniformly; the rest roll on probabilities.
    pub fn resolves_by_choice(&self) -> bool {
        self.is_choice || self.event_type == EventType::Choice
    }
}

/// A resolved event, as kept in the campaign history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub outcome_id: String,
    pub turn: u32,
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub description: String,
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::city::City;
use super::event::EventRecord;
use super::general::General;
use super::message::{LoggedMessage, TurnMessage};
use super::player::{MAX_LEVEL, Player};

pub const MIN_GAME_SPEED: f64 = 0.5;
pub const MAX_GAME_SPEED: f64 = 4.0;

/// Campaign phase. Moves strictly forward: draft, then play, then over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GamePhase {
    SkillSelection,
    Playing,
    GameOver,
}

string_enum!(GamePhase, "game phase", {
    SkillSelection => "skill_selection",
    Playing => "playing",
    GameOver => "game_over",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameOutcome {
    Victory,
    Defeat,
}

string_enum!(GameOutcome, "game outcome", {
    Victory => "victory",
    Defeat => "defeat",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

string_enum!(Season, "season", {
    Spring => "spring",
    Summer => "summer",
    Autumn => "autumn",
    Winter => "winter",
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Turn delays are divided by this. Always within `[0.5, 4]`.
    pub game_speed: f64,
}

impl GameSettings {
    pub fn set_speed(&mut self, speed: f64) {
        self.game_speed = if speed.is_nan() {
            1.0
        } else {
            speed.clamp(MIN_GAME_SPEED, MAX_GAME_SPEED)
        };
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self { game_speed: 1.0 }
    }
}

/// The single live campaign aggregate. Created fresh by each new game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub cities: BTreeMap<String, City>,
    pub generals: Vec<General>,
    pub current_turn: u32,
    pub phase: GamePhase,
    pub outcome: Option<GameOutcome>,
    pub season: Option<Season>,
    pub settings: GameSettings,
    /// Consecutive turns in which no event was rolled.
    pub turns_without_events: u32,
    pub event_history: Vec<EventRecord>,
    /// Every message emitted so far, in order.
    pub message_log: Vec<LoggedMessage>,
}

impl GameState {
    pub fn general(&self, id: &str) -> Option<&General> {
        self.generals.iter().find(|g| g.id == id)
    }

    pub fn general_mut(&mut self, id: &str) -> Option<&mut General> {
        self.generals.iter_mut().find(|g| g.id == id)
    }

    pub fn player_cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values().filter(|c| c.is_player_held())
    }

    pub fn log_messages(&mut self, turn: u32, messages: &[TurnMessage]) {
        self.message_log
            .extend(messages.iter().cloned().map(|message| LoggedMessage { turn, message }));
    }

    /// Check the invariants the simulation maintains, returning every violation.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let p = &self.player;
        for attr in super::Attribute::VISIBLE {
            let value = p.attributes.get(attr);
            if !(0..=100).contains(&value) {
                errors.push(format!("player {attr} out of range: {value}"));
            }
        }
        if !(1..=MAX_LEVEL).contains(&p.level) {
            errors.push(format!("player level out of range: {}", p.level));
        }
        if p.gold < 0 {
            errors.push(format!("negative gold: {}", p.gold));
        }
        if p.troops < 0 {
            errors.push(format!("negative troops: {}", p.troops));
        }
        if self.cities.is_empty() {
            errors.push("no cities".to_string());
        }
        errors
    }
}

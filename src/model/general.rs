use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::city::Faction;
use super::equipment::Loadout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GeneralStatus {
    Enemy,
    Neutral,
    Ally,
    Player,
}

string_enum!(GeneralStatus, "general status", {
    Enemy => "enemy",
    Neutral => "neutral",
    Ally => "ally",
    Player => "player",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    pub attributes: Attributes,
    pub level: u32,
    #[serde(default)]
    pub equipment: Loadout,
    #[serde(default)]
    pub troops: i64,
    #[serde(default)]
    pub max_troops: i64,
    pub status: GeneralStatus,
}

impl General {
    /// Enemy or neutral generals are the only ones the player can win over.
    pub fn is_recruitable(&self) -> bool {
        matches!(self.status, GeneralStatus::Enemy | GeneralStatus::Neutral)
    }

    pub fn join_player(&mut self) {
        self.status = GeneralStatus::Ally;
        self.faction = Faction::Player;
    }
}

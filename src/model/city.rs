use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Faction {
    Wei,
    Shu,
    Wu,
    Other,
    Player,
}

string_enum!(Faction, "faction", {
    Wei => "wei",
    Shu => "shu",
    Wu => "wu",
    Other => "other",
    Player => "player",
});

/// Bonus granted when the campaign opens in this city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SpecialBonus {
    Politics,
    Recruitment,
    Trade,
    Defense,
    Custom(String),
}

string_enum_open!(SpecialBonus, "special bonus", {
    Politics => "politics",
    Recruitment => "recruitment",
    Trade => "trade",
    Defense => "defense",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    /// Garrisoned general ids, in muster order.
    #[serde(default)]
    pub garrison: Vec<String>,
    /// Adjacent city ids. Edges are undirected: each must be listed on both ends.
    #[serde(default)]
    pub connections: Vec<String>,
    pub gold_production: i64,
    pub troop_production: i64,
    pub defense_value: i64,
    #[serde(default)]
    pub special_bonus: Option<SpecialBonus>,
}

impl City {
    pub fn is_player_held(&self) -> bool {
        self.faction == Faction::Player
    }

    pub fn is_adjacent_to(&self, other_id: &str) -> bool {
        self.connections.iter().any(|c| c == other_id)
    }
}

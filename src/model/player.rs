use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::equipment::Loadout;
use super::skill::Skill;

pub const MAX_LEVEL: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub attributes: Attributes,
    /// Skills in draft order. Only the draft appends here.
    pub skills: Vec<Skill>,
    pub equipment: Loadout,
    pub gold: i64,
    pub troops: i64,
    pub max_troops: i64,
    pub cities_controlled: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub generals_recruited: u32,
    /// Upkeep charged on the most recent turn.
    pub maintenance_cost: i64,
}

impl Player {
    pub fn skill_combat_bonus(&self) -> f64 {
        self.skills.iter().map(Skill::combat_bonus).sum()
    }

    pub fn skill_recruitment_bonus(&self) -> i32 {
        self.skills.iter().map(Skill::recruitment_bonus).sum()
    }

    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.skills.iter().any(|s| s.id == skill_id)
    }

    /// Add gold; losses floor at zero.
    pub fn add_gold(&mut self, delta: i64) -> i64 {
        let old = self.gold;
        self.gold = (self.gold + delta).max(0);
        self.gold - old
    }

    /// Remove troops, flooring at zero. Returns the troops actually lost.
    pub fn lose_troops(&mut self, amount: i64) -> i64 {
        let lost = amount.max(0).min(self.troops.max(0));
        self.troops -= lost;
        lost
    }

    /// Add troops up to `max_troops`. Returns the troops actually gained.
    pub fn gain_troops_capped(&mut self, amount: i64) -> i64 {
        let new = (self.troops + amount.max(0)).min(self.max_troops).max(self.troops);
        let gained = new - self.troops;
        self.troops = new;
        gained
    }
}

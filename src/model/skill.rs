use serde::{Deserialize, Serialize};

use super::effect::Effect;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SkillType {
    Combat,
    Passive,
    Economic,
    Special,
}

string_enum!(SkillType, "skill type", {
    Combat => "combat",
    Passive => "passive",
    Economic => "economic",
    Special => "special",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    /// Draft cost in stars (1–3).
    pub star_cost: u32,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Skill {
    pub fn combat_bonus(&self) -> f64 {
        self.effects.iter().map(|e| e.kind.combat_value()).sum()
    }

    pub fn recruitment_bonus(&self) -> i32 {
        self.effects.iter().map(|e| e.kind.recruitment_value()).sum()
    }
}

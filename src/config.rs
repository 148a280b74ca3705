use serde::Deserialize;

use crate::model::Attributes;

/// Turn pacing, in milliseconds of real time at 1x speed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between turns when the batch is short.
    pub base_interval_ms: u64,
    /// Offset of the first message of a batch.
    pub message_base_delay_ms: u64,
    /// Stagger between consecutive messages.
    pub message_interval_ms: u64,
    /// Slack after the last message before the next turn may start.
    pub display_buffer_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 3000,
            message_base_delay_ms: 200,
            message_interval_ms: 2000,
            display_buffer_ms: 500,
        }
    }
}

/// Configuration for a new campaign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub player_name: String,
    pub starting_gold: i64,
    pub starting_troops: i64,
    pub starting_max_troops: i64,
    pub starting_attributes: Attributes,
    /// Draft budget in stars.
    pub star_budget: u32,
    pub draft_rounds: u32,
    pub skills_per_round: usize,
    pub game_speed: f64,
    /// Cities the campaign may open in. Ids missing from the catalog are ignored.
    pub preferred_start_cities: Vec<String>,
    pub timing: TimingConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            starting_gold: 200,
            starting_troops: 800,
            starting_max_troops: 1000,
            starting_attributes: Attributes::uniform(10, 0),
            star_budget: 10,
            draft_rounds: 3,
            skills_per_round: 3,
            game_speed: 1.0,
            preferred_start_cities: ["jiangxia", "xuchang", "chengdu", "jianye", "luoyang"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timing: TimingConfig::default(),
        }
    }
}

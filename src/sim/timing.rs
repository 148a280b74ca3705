//! Real-time pacing of turns and of the messages inside a turn.
//!
//! Message `i` of a batch displays at `base_delay + i * interval`. The next
//! turn never starts before the last message plus a buffer has been shown,
//! however the interval is modulated or sped up.

use std::time::Duration;

use rand::RngCore;

use super::formulas::{check_probability, random_float};
use crate::config::TimingConfig;
use crate::model::GameState;

const JITTER_DESTINY: i32 = 25;
const JITTER_RANGE: (f64, f64) = (0.8, 1.2);
/// Win margin over losses beyond which turns speed up.
const WIN_STREAK_MARGIN: u32 = 2;
const WIN_STREAK_FACTOR: f64 = 0.9;
const ANOMALY_EVERY: u32 = 10;
const ANOMALY_CHANCE: f64 = 25.0;
const ANOMALY_FACTORS: [f64; 2] = [0.5, 1.5];

fn scaled(ms: f64, speed: f64) -> Duration {
    Duration::from_micros(((ms / speed).max(0.0) * 1000.0).round() as u64)
}

/// When each of `count` messages should display, relative to the turn start.
pub fn display_offsets(timing: &TimingConfig, count: usize, speed: f64) -> Vec<Duration> {
    (0..count)
        .map(|i| {
            let ms = timing.message_base_delay_ms + i as u64 * timing.message_interval_ms;
            scaled(ms as f64, speed)
        })
        .collect()
}

/// Time at 1x needed to show every message of a batch, plus the buffer.
pub fn display_window_ms(timing: &TimingConfig, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    let last = timing.message_base_delay_ms + (count as u64 - 1) * timing.message_interval_ms;
    last + timing.display_buffer_ms
}

/// The base interval, stretched when a batch needs longer to display.
pub fn minimum_interval_ms(timing: &TimingConfig, count: usize) -> u64 {
    timing
        .base_interval_ms
        .max(display_window_ms(timing, count))
}

/// Multiplier applied to the turn interval from the player's state.
pub fn interval_modifier(state: &GameState, rng: &mut dyn RngCore) -> f64 {
    let player = &state.player;
    let mut factor = 1.0;
    if player.attributes.destiny >= JITTER_DESTINY {
        factor *= random_float(rng, JITTER_RANGE.0, JITTER_RANGE.1);
    }
    if player.battles_won > player.battles_lost + WIN_STREAK_MARGIN {
        factor *= WIN_STREAK_FACTOR;
    }
    if state.current_turn % ANOMALY_EVERY == 0 && check_probability(rng, ANOMALY_CHANCE) {
        let anomaly = if check_probability(rng, 50.0) {
            ANOMALY_FACTORS[0]
        } else {
            ANOMALY_FACTORS[1]
        };
        tracing::debug!(turn = state.current_turn, anomaly, "temporal anomaly");
        factor *= anomaly;
    }
    factor
}

/// Delay before the next turn, after a batch of `message_count` messages.
pub fn next_turn_delay(
    timing: &TimingConfig,
    state: &GameState,
    message_count: usize,
    rng: &mut dyn RngCore,
) -> Duration {
    let interval = minimum_interval_ms(timing, message_count) as f64;
    let modulated = interval * interval_modifier(state, rng);
    let window = display_window_ms(timing, message_count) as f64;
    scaled(modulated.max(window), state.settings.game_speed)
}

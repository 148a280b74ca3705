//! Random events: eligibility, the per-turn event count, the order-dependent
//! event scan, and outcome resolution.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use super::context::PhaseContext;
use super::effects::apply_effect;
use super::formulas::{check_probability, event_probability, pick, random_int, random_percent};
use super::phase::TurnPhase;
use crate::content::Catalog;
use crate::error::PhaseError;
use crate::model::{
    EventOutcome, EventRecord, GameEvent, GameState, MessageCategory, Player, Requirement,
    TurnMessage,
};

/// After this many quiet turns, at least one event is rolled.
pub const QUIET_TURNS_BEFORE_FORCED_EVENT: u32 = 3;

const HIGH_DESTINY: i32 = 30;
const HIGH_LEVEL: u32 = 5;

fn requirement_holds(player: &Player, requirement: &Requirement) -> bool {
    match requirement {
        Requirement::Level { operator, value } => operator.holds(i64::from(player.level), *value),
        Requirement::CityCount { operator, value } => {
            operator.holds(i64::from(player.cities_controlled), *value)
        }
        Requirement::Attribute {
            target,
            operator,
            value,
        } => operator.holds(i64::from(player.attributes.get(*target)), *value),
    }
}

pub fn requirements_met(player: &Player, event: &GameEvent) -> bool {
    event
        .requirements
        .iter()
        .all(|r| requirement_holds(player, r))
}

/// Roll how many events this turn scans for, and update the quiet-turn streak.
pub fn roll_event_count(state: &mut GameState, rng: &mut dyn RngCore) -> u32 {
    let player = &state.player;
    let (min, max) = if player.attributes.destiny >= HIGH_DESTINY {
        (1, 3)
    } else if player.level >= HIGH_LEVEL {
        (0, 3)
    } else {
        (0, 2)
    };
    let mut count = random_int(rng, min, max) as u32;
    if state.turns_without_events >= QUIET_TURNS_BEFORE_FORCED_EVENT {
        count = count.max(1);
        state.turns_without_events = 0;
    }
    if count == 0 {
        state.turns_without_events += 1;
    } else {
        state.turns_without_events = 0;
    }
    count
}

/// Scan eligible events in catalog order; the first whose chance succeeds fires.
pub fn select_event<'a>(
    catalog: &'a Catalog,
    player: &Player,
    rng: &mut dyn RngCore,
) -> Option<&'a GameEvent> {
    let destiny = player.attributes.destiny;
    catalog
        .events
        .iter()
        .filter(|e| requirements_met(player, e))
        .find(|e| {
            let chance = event_probability(e.base_probability, e.destiny_modifier, destiny);
            check_probability(rng, chance)
        })
}

/// Choice events pick uniformly. Others take the first outcome whose
/// cumulative probability covers a single `[0, 100)` roll.
pub fn select_outcome<'a>(
    event: &'a GameEvent,
    rng: &mut dyn RngCore,
) -> Result<&'a EventOutcome, PhaseError> {
    if event.resolves_by_choice() {
        return pick(rng, &event.outcomes).ok_or_else(|| PhaseError::NoOutcomes(event.id.clone()));
    }
    let roll = random_percent(rng);
    let mut cumulative = 0.0;
    for outcome in &event.outcomes {
        cumulative += outcome.probability;
        if roll <= cumulative {
            return Ok(outcome);
        }
    }
    // Rounding can leave the total a hair under 100.
    event
        .outcomes
        .last()
        .ok_or_else(|| PhaseError::NoOutcomes(event.id.clone()))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Resolve `event`: roll the outcome, apply its effects, and record it.
pub fn resolve_event(
    state: &mut GameState,
    catalog: &Catalog,
    event: &GameEvent,
    rng: &mut dyn RngCore,
) -> Result<TurnMessage, PhaseError> {
    let outcome = select_outcome(event, rng)?;
    let mut details = Vec::new();
    for effect in &outcome.effects {
        let note = apply_effect(state, catalog, &effect.kind, rng);
        if !effect.description.is_empty() {
            details.push(effect.description.clone());
        } else if let Some(note) = note {
            details.push(note);
        }
    }

    let description = format!("{} - {}", event.name, outcome.name);
    state.event_history.push(EventRecord {
        event_id: event.id.clone(),
        outcome_id: outcome.id.clone(),
        turn: state.current_turn,
        timestamp_ms: now_ms(),
        description: description.clone(),
    });
    tracing::debug!(event = %event.id, outcome = %outcome.id, "event resolved");

    let mut text = format!("{} {description}", event.event_type.marker());
    if !details.is_empty() {
        text.push_str(": ");
        text.push_str(&details.join(", "));
    }
    Ok(TurnMessage::new(MessageCategory::Event, text))
}

#[derive(Debug, Default)]
pub struct EventPhase;

impl TurnPhase for EventPhase {
    fn name(&self) -> &str {
        "events"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        let count = roll_event_count(ctx.state, ctx.rng);
        let mut messages = Vec::new();
        for _ in 0..count {
            let Some(event) = select_event(ctx.catalog, &ctx.state.player, ctx.rng) else {
                continue;
            };
            messages.push(resolve_event(ctx.state, ctx.catalog, event, ctx.rng)?);
        }
        Ok(messages)
    }
}

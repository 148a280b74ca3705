use rand::RngCore;

use super::combat::CombatPhase;
use super::context::PhaseContext;
use super::economy::{ProductionPhase, UpkeepPhase};
use super::events::EventPhase;
use super::leveling::LevelingPhase;
use super::phase::TurnPhase;
use super::recruitment::RecruitmentPhase;
use crate::content::Catalog;
use crate::model::{GameOutcome, GamePhase, GameState, MessageCategory, TurnMessage};

/// What one pass through the pipeline produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub turn: u32,
    /// The turn header followed by every completed phase's lines, in order.
    pub messages: Vec<TurnMessage>,
    pub outcome: Option<GameOutcome>,
    /// `"<phase>: <error>"` when a phase failed and the turn was cut short.
    pub fault: Option<String>,
}

/// Runs the per-turn phase pipeline against a campaign state.
pub struct TurnRunner {
    phases: Vec<Box<dyn TurnPhase>>,
}

impl TurnRunner {
    pub fn new(phases: Vec<Box<dyn TurnPhase>>) -> Self {
        Self { phases }
    }

    /// Production, events, combat, recruitment, leveling, upkeep.
    pub fn default_pipeline() -> Self {
        Self::new(vec![
            Box::new(ProductionPhase),
            Box::new(EventPhase),
            Box::new(CombatPhase),
            Box::new(RecruitmentPhase),
            Box::new(LevelingPhase),
            Box::new(UpkeepPhase),
        ])
    }

    pub fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Advance the campaign by one turn.
    ///
    /// Phases run in registration order. If one fails, the remaining phases
    /// are skipped and the failing phase contributes no lines, but lines from
    /// earlier phases are kept. The end check only runs after a clean pass.
    pub fn run_turn(
        &mut self,
        state: &mut GameState,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> TurnOutput {
        state.current_turn += 1;
        let turn = state.current_turn;
        let mut messages = vec![TurnMessage::new(
            MessageCategory::Turn,
            format!("--- Turn {turn} begins ---"),
        )];
        let mut fault = None;

        for phase in self.phases.iter_mut() {
            let mut ctx = PhaseContext {
                state,
                catalog,
                rng,
            };
            match phase.run(&mut ctx) {
                Ok(lines) => {
                    tracing::debug!(
                        turn,
                        phase = phase.name(),
                        lines = lines.len(),
                        "phase complete"
                    );
                    messages.extend(lines);
                }
                Err(err) => {
                    tracing::error!(turn, phase = phase.name(), error = %err, "phase failed");
                    fault = Some(format!("{}: {err}", phase.name()));
                    break;
                }
            }
        }

        let outcome = if fault.is_none() {
            check_game_end(state, catalog.total_cities())
        } else {
            None
        };
        if let Some(outcome) = outcome {
            state.phase = GamePhase::GameOver;
            state.outcome = Some(outcome);
            messages.push(game_over_message(state, outcome));
            tracing::info!(turn, %outcome, "campaign over");
        }

        state.log_messages(turn, &messages);
        TurnOutput {
            turn,
            messages,
            outcome,
            fault,
        }
    }
}

/// Victory once every city in the catalog is held. Defeat needs both no
/// troops and no cities; an army wiped out while a city stands is not defeat.
pub fn check_game_end(state: &GameState, total_cities: usize) -> Option<GameOutcome> {
    let player = &state.player;
    if player.cities_controlled as usize >= total_cities {
        Some(GameOutcome::Victory)
    } else if player.troops <= 0 && player.cities_controlled == 0 {
        Some(GameOutcome::Defeat)
    } else {
        None
    }
}

pub fn game_over_message(state: &GameState, outcome: GameOutcome) -> TurnMessage {
    let player = &state.player;
    let headline = match outcome {
        GameOutcome::Victory => "Victory! The realm is united under your banner.",
        GameOutcome::Defeat => "Defeat. Your cause is lost.",
    };
    TurnMessage::new(
        MessageCategory::GameOver,
        format!(
            "{headline} Level {}, {} cities, {} battles won.",
            player.level, player.cities_controlled, player.battles_won
        ),
    )
}

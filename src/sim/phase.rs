use super::context::PhaseContext;
use crate::error::PhaseError;
use crate::model::TurnMessage;

/// One step of the per-turn pipeline.
///
/// Object-safe so phases can be stored as `Box<dyn TurnPhase>`. A phase either
/// completes and returns its result lines, or fails and contributes nothing.
pub trait TurnPhase {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError>;
}

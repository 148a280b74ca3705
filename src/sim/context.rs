use rand::RngCore;

use crate::content::Catalog;
use crate::model::GameState;

/// Context passed to each phase on every turn.
///
/// Bundled so phases see the same state, content and randomness without any
/// shared globals.
pub struct PhaseContext<'a> {
    pub state: &'a mut GameState,
    pub catalog: &'a Catalog,
    pub rng: &'a mut dyn RngCore,
}

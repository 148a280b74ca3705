use super::context::PhaseContext;
use super::formulas::{check_probability, pick, recruitment_rate};
use super::phase::TurnPhase;
use crate::error::PhaseError;
use crate::model::{Attribute, GameState, MessageCategory, TurnMessage};

/// Chance per turn that the recruitment phase approaches anyone.
pub const RECRUITMENT_PHASE_CHANCE: f64 = 20.0;
/// Share of the player's troops handed to a newly recruited general.
const TROOP_ALLOCATION_SHARE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct RecruitAttempt {
    pub general_name: String,
    pub rate: f64,
    pub success: bool,
    /// Troops moved from the player to the general on success.
    pub troops: i64,
}

/// Bonus added to the recruitment rate from skills and worn charisma gear.
pub fn player_recruitment_bonus(state: &GameState) -> i32 {
    state.player.skill_recruitment_bonus() + state.player.equipment.bonus(Attribute::Charisma)
}

/// Bring a general over to the player's side.
///
/// The general leaves any garrison it stood in and its command is replaced by
/// `min(floor(troops * 0.2), max_troops)` of the player's troops. Returns the
/// general's name and the troops transferred, or `None` if no such general.
pub fn enlist_general(state: &mut GameState, general_id: &str) -> Option<(String, i64)> {
    let available = state.player.troops;
    let general = state.general_mut(general_id)?;
    general.join_player();
    let allocation = ((available as f64 * TROOP_ALLOCATION_SHARE).floor() as i64)
        .min(general.max_troops)
        .max(0);
    general.troops = allocation;
    let name = general.name.clone();

    state.player.troops -= allocation;
    state.player.generals_recruited += 1;
    for city in state.cities.values_mut() {
        city.garrison.retain(|g| g != general_id);
    }
    Some((name, allocation))
}

/// Roll once to win `general_id` over.
pub fn attempt_recruitment(
    state: &mut GameState,
    rng: &mut dyn rand::RngCore,
    general_id: &str,
) -> Result<RecruitAttempt, PhaseError> {
    let general = state
        .general(general_id)
        .ok_or_else(|| PhaseError::UnknownGeneral(general_id.to_string()))?;
    let rate = recruitment_rate(
        state.player.attributes.charisma,
        general.level,
        player_recruitment_bonus(state),
    );
    let general_name = general.name.clone();

    if !check_probability(rng, rate) {
        return Ok(RecruitAttempt {
            general_name,
            rate,
            success: false,
            troops: 0,
        });
    }
    let (general_name, troops) = enlist_general(state, general_id)
        .ok_or_else(|| PhaseError::UnknownGeneral(general_id.to_string()))?;
    Ok(RecruitAttempt {
        general_name,
        rate,
        success: true,
        troops,
    })
}

pub fn describe_attempt(attempt: &RecruitAttempt) -> TurnMessage {
    let text = if attempt.success {
        if attempt.troops > 0 {
            format!(
                "{} joins your cause and takes command of {} troops ({:.0}% chance).",
                attempt.general_name, attempt.troops, attempt.rate
            )
        } else {
            format!(
                "{} joins your cause ({:.0}% chance).",
                attempt.general_name, attempt.rate
            )
        }
    } else {
        format!(
            "{} refuses your offer ({:.0}% chance).",
            attempt.general_name, attempt.rate
        )
    };
    TurnMessage::new(MessageCategory::Recruitment, text)
}

/// Occasionally approach one enemy or neutral general.
#[derive(Debug, Default)]
pub struct RecruitmentPhase;

impl TurnPhase for RecruitmentPhase {
    fn name(&self) -> &str {
        "recruitment"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        if !check_probability(ctx.rng, RECRUITMENT_PHASE_CHANCE) {
            return Ok(Vec::new());
        }
        let candidates: Vec<String> = ctx
            .state
            .generals
            .iter()
            .filter(|g| g.is_recruitable())
            .map(|g| g.id.clone())
            .collect();
        let Some(id) = pick(ctx.rng, &candidates) else {
            return Ok(Vec::new());
        };
        let attempt = attempt_recruitment(ctx.state, ctx.rng, id)?;
        tracing::debug!(general = %id, success = attempt.success, rate = attempt.rate, "recruitment attempt");
        Ok(vec![describe_attempt(&attempt)])
    }
}

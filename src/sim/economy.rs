use super::context::PhaseContext;
use super::formulas::{ally_troop_cap, troop_cap, upkeep_cost};
use super::phase::TurnPhase;
use crate::error::PhaseError;
use crate::model::{GameState, GeneralStatus, MessageCategory, TurnMessage};

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductionReport {
    pub cities: usize,
    pub gold: i64,
    pub troops_produced: i64,
    /// Troops actually added; the rest overflowed the cap and were lost.
    pub troops_gained: i64,
}

/// Collect one turn of output from every player-held city.
///
/// Gold from each city is scaled by `1 + politics/100` and floored. Troops are
/// capped at the current `max_troops`; the cap itself is recalculated afterwards.
pub fn production(state: &mut GameState) -> ProductionReport {
    let politics_multiplier = 1.0 + f64::from(state.player.attributes.politics) / 100.0;
    let mut report = ProductionReport::default();
    for city in state.player_cities() {
        report.cities += 1;
        report.gold += (city.gold_production as f64 * politics_multiplier).floor() as i64;
        report.troops_produced += city.troop_production;
    }
    state.player.add_gold(report.gold);
    report.troops_gained = state.player.gain_troops_capped(report.troops_produced);
    recalculate_troop_cap(state);
    report
}

/// Rederive the player's and allied generals' troop caps.
pub fn recalculate_troop_cap(state: &mut GameState) {
    let player = &mut state.player;
    player.max_troops = troop_cap(player.attributes.leadership, player.cities_controlled);
    for general in state
        .generals
        .iter_mut()
        .filter(|g| g.status == GeneralStatus::Ally)
    {
        general.max_troops = ally_troop_cap(general.attributes.leadership);
    }
}

#[derive(Debug, Default)]
pub struct ProductionPhase;

impl TurnPhase for ProductionPhase {
    fn name(&self) -> &str {
        "production"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        let report = production(ctx.state);
        if report.cities == 0 {
            return Ok(Vec::new());
        }
        let mut text = format!(
            "Your {} cities produce {} gold and {} troops.",
            report.cities, report.gold, report.troops_produced
        );
        let lost = report.troops_produced - report.troops_gained;
        if lost > 0 {
            text.push_str(&format!(" {lost} recruits are turned away for lack of supplies."));
        }
        Ok(vec![TurnMessage::new(MessageCategory::Production, text)])
    }
}

// ---------------------------------------------------------------------------
// Upkeep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpkeepReport {
    pub cost: i64,
    pub paid: i64,
    pub shortfall: i64,
    pub troops_lost: i64,
}

/// Charge `cities * 20` gold. A shortfall zeroes the treasury and costs twice
/// the missing gold in troops.
pub fn upkeep(state: &mut GameState) -> UpkeepReport {
    let player = &mut state.player;
    let cost = upkeep_cost(player.cities_controlled);
    player.maintenance_cost = cost;
    if player.gold >= cost {
        player.gold -= cost;
        return UpkeepReport {
            cost,
            paid: cost,
            ..UpkeepReport::default()
        };
    }
    let paid = player.gold;
    let shortfall = cost - paid;
    player.gold = 0;
    let troops_lost = player.lose_troops(shortfall * 2);
    UpkeepReport {
        cost,
        paid,
        shortfall,
        troops_lost,
    }
}

#[derive(Debug, Default)]
pub struct UpkeepPhase;

impl TurnPhase for UpkeepPhase {
    fn name(&self) -> &str {
        "upkeep"
    }

    fn run(&mut self, ctx: &mut PhaseContext) -> Result<Vec<TurnMessage>, PhaseError> {
        let report = upkeep(ctx.state);
        if report.cost == 0 {
            return Ok(Vec::new());
        }
        let text = if report.shortfall == 0 {
            format!("Paid {} gold in upkeep.", report.cost)
        } else {
            format!(
                "The treasury is {} gold short of the {} gold upkeep. {} troops desert.",
                report.shortfall, report.cost, report.troops_lost
            )
        };
        Ok(vec![TurnMessage::new(MessageCategory::Upkeep, text)])
    }
}

//! The campaign facade: owns one live game and exposes the command, query
//! and report surfaces a front end drives it through.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::CampaignConfig;
use crate::content::Catalog;
use crate::model::{
    GameOutcome, GamePhase, GameState, LoggedMessage, MessageCategory, TurnMessage,
};
use crate::scheduler::{ManualScheduler, Tick, TokioScheduler, TurnScheduler};
use crate::sim::draft::{DraftStep, SkillDraft, StarConversion};
use crate::sim::opening::open_campaign;
use crate::sim::timing::{display_offsets, next_turn_delay};
use crate::sim::{TurnOutput, TurnRunner};

/// Undrained reports kept before the oldest are dropped. The message log
/// keeps every message regardless.
pub const MAX_PENDING_REPORTS: usize = 64;

/// One batch of messages ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// 0 for the opening report.
    pub turn: u32,
    pub messages: Vec<TurnMessage>,
    /// When each message should display, relative to the batch.
    pub display_offsets: Vec<Duration>,
    /// Delay until the next turn, or `None` if nothing was scheduled.
    pub next_delay: Option<Duration>,
    pub outcome: Option<GameOutcome>,
    pub fault: Option<String>,
}

pub struct Campaign<S: TurnScheduler> {
    catalog: Catalog,
    config: CampaignConfig,
    state: GameState,
    draft: Option<SkillDraft>,
    runner: TurnRunner,
    scheduler: S,
    rng: SmallRng,
    running: bool,
    reports: VecDeque<TurnReport>,
}

impl<S: TurnScheduler> Campaign<S> {
    /// A new campaign in the draft phase, drawing from OS entropy.
    pub fn new(catalog: Catalog, config: CampaignConfig, scheduler: S) -> Self {
        Self::with_rng(catalog, config, scheduler, SmallRng::from_os_rng())
    }

    pub fn with_rng(
        catalog: Catalog,
        config: CampaignConfig,
        scheduler: S,
        rng: SmallRng,
    ) -> Self {
        let state = catalog.instantiate(&config);
        let mut campaign = Self {
            catalog,
            config,
            state,
            draft: None,
            runner: TurnRunner::default_pipeline(),
            scheduler,
            rng,
            running: false,
            reports: VecDeque::new(),
        };
        campaign.start_new_game();
        campaign
    }

    /// Replace the turn pipeline.
    pub fn with_runner(mut self, runner: TurnRunner) -> Self {
        self.runner = runner;
        self
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Discard the current game and open a fresh draft.
    pub fn start_new_game(&mut self) {
        self.scheduler.cancel_pending();
        self.running = false;
        self.reports.clear();
        self.state = self.catalog.instantiate(&self.config);
        let draft = SkillDraft::start(&self.config, &self.catalog, &mut self.rng);
        let complete = draft.is_complete();
        self.draft = Some(draft);
        tracing::info!(player = %self.config.player_name, "new campaign started");
        if complete {
            // A draft with no rounds closes at once.
            self.skip_round();
        }
    }

    /// Buy an offered skill. Returns false, changing nothing, if the skill is
    /// not on offer, costs more than the remaining stars, or no draft is open.
    pub fn select_skill(&mut self, skill_id: &str) -> bool {
        if self.state.phase != GamePhase::SkillSelection {
            tracing::warn!(skill = skill_id, phase = %self.state.phase, "no draft in progress");
            return false;
        }
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        match draft.select(&mut self.state, &self.catalog, skill_id, &mut self.rng) {
            Ok(step) => {
                self.after_draft_step(step);
                true
            }
            Err(err) => {
                tracing::warn!(skill = skill_id, error = %err, "skill selection rejected");
                false
            }
        }
    }

    pub fn skip_round(&mut self) {
        if self.state.phase != GamePhase::SkillSelection {
            tracing::warn!(phase = %self.state.phase, "no draft in progress");
            return;
        }
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let result = if draft.is_complete() {
            draft.finish(&mut self.state, &mut self.rng)
        } else {
            draft.skip(&mut self.state, &self.catalog, &mut self.rng)
        };
        match result {
            Ok(step) => self.after_draft_step(step),
            Err(err) => tracing::warn!(error = %err, "skip rejected"),
        }
    }

    pub fn pause(&mut self) {
        if self.state.phase != GamePhase::Playing || !self.running {
            return;
        }
        self.running = false;
        self.scheduler.cancel_pending();
        tracing::info!(turn = self.state.current_turn, "campaign paused");
    }

    /// Resume a paused campaign. The next turn runs immediately.
    pub fn resume(&mut self) {
        if self.state.phase != GamePhase::Playing || self.running {
            return;
        }
        self.running = true;
        tracing::info!(turn = self.state.current_turn, "campaign resumed");
        self.execute_turn();
    }

    pub fn toggle_pause(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Set the speed multiplier, clamped to `[0.5, 4]`. Applies from the next
    /// scheduled turn.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.state.settings.set_speed(multiplier);
        tracing::info!(speed = self.state.settings.game_speed, "game speed set");
    }

    // -----------------------------------------------------------------------
    // Turn control
    // -----------------------------------------------------------------------

    /// Run one turn now and schedule the next.
    ///
    /// Does nothing unless the campaign is playing and not paused. Any timer
    /// already pending is replaced, so at most one turn is ever in flight.
    pub fn execute_turn(&mut self) -> Option<TurnReport> {
        if self.state.phase != GamePhase::Playing || !self.running {
            return None;
        }
        self.scheduler.cancel_pending();
        let output = self
            .runner
            .run_turn(&mut self.state, &self.catalog, &mut self.rng);
        Some(self.publish(output))
    }

    fn publish(&mut self, output: TurnOutput) -> TurnReport {
        let speed = self.state.settings.game_speed;
        let offsets = display_offsets(&self.config.timing, output.messages.len(), speed);
        let next_delay = if output.outcome.is_some() {
            self.running = false;
            self.scheduler.cancel_pending();
            None
        } else {
            let delay = next_turn_delay(
                &self.config.timing,
                &self.state,
                output.messages.len(),
                &mut self.rng,
            );
            self.scheduler.schedule_next(delay);
            Some(delay)
        };
        let report = TurnReport {
            turn: output.turn,
            messages: output.messages,
            display_offsets: offsets,
            next_delay,
            outcome: output.outcome,
            fault: output.fault,
        };
        if self.reports.len() == MAX_PENDING_REPORTS {
            if let Some(dropped) = self.reports.pop_front() {
                tracing::debug!(turn = dropped.turn, "undrained report dropped");
            }
        }
        self.reports.push_back(report.clone());
        report
    }

    fn after_draft_step(&mut self, step: DraftStep) {
        if let DraftStep::Complete(conversion) = step {
            self.begin_play(&conversion);
        }
    }

    /// Open the campaign and schedule the first turn.
    fn begin_play(&mut self, conversion: &StarConversion) {
        let mut messages = Vec::new();
        if conversion.points > 0 {
            let mut text = format!(
                "{} leftover stars become {} attribute points.",
                conversion.stars, conversion.points
            );
            if let Some((attr, amount)) = conversion.bonus {
                text.push_str(&format!(" Bonus: {attr} +{amount}."));
            }
            messages.push(TurnMessage::new(MessageCategory::Opening, text));
        }
        match open_campaign(&mut self.state, &self.catalog, &self.config, &mut self.rng) {
            Ok(lines) => messages.extend(lines),
            Err(err) => tracing::error!(error = %err, "campaign opening failed"),
        }
        self.state.log_messages(0, &messages);
        self.running = true;
        self.publish(TurnOutput {
            turn: 0,
            messages,
            outcome: None,
            fault: None,
        });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The draft, while one is open.
    pub fn draft(&self) -> Option<&SkillDraft> {
        self.draft
            .as_ref()
            .filter(|_| self.state.phase == GamePhase::SkillSelection)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Every message emitted so far, tagged with its turn.
    pub fn message_log(&self) -> &[LoggedMessage] {
        &self.state.message_log
    }

    /// Take the reports produced since the last drain, oldest first. At most
    /// [`MAX_PENDING_REPORTS`] are held.
    pub fn drain_reports(&mut self) -> Vec<TurnReport> {
        self.reports.drain(..).collect()
    }
}

impl Campaign<ManualScheduler> {
    /// Let the pending timer elapse and run the turn it was waiting for.
    pub fn advance(&mut self) -> Option<TurnReport> {
        if !self.scheduler.fire() {
            return None;
        }
        self.execute_turn()
    }

    /// Advance until the game ends or `max_turns` turns have run.
    pub fn run_until_end(&mut self, max_turns: u32) -> Option<GameOutcome> {
        for _ in 0..max_turns {
            match self.advance() {
                Some(report) if report.outcome.is_some() => return report.outcome,
                Some(_) => {}
                None => break,
            }
        }
        self.state.outcome
    }
}

impl Campaign<TokioScheduler> {
    /// Run the turn a timer tick was armed for. Stale ticks are ignored.
    pub fn on_tick(&mut self, tick: Tick) -> Option<TurnReport> {
        if !self.scheduler.accept(tick) {
            return None;
        }
        self.execute_turn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{assert_consistent, seeded_campaign, test_catalog};

    #[test]
    fn starts_in_the_draft() {
        let campaign = seeded_campaign(1);
        assert_eq!(campaign.phase(), GamePhase::SkillSelection);
        let draft = campaign.draft().unwrap();
        assert_eq!(draft.round, 1);
        assert_eq!(draft.remaining_stars, 10);
        assert!(campaign.scheduler().pending().is_none());
    }

    #[test]
    fn finishing_the_draft_opens_the_campaign() {
        let mut campaign = seeded_campaign(2);
        for _ in 0..3 {
            campaign.skip_round();
        }
        assert_eq!(campaign.phase(), GamePhase::Playing);
        assert!(campaign.draft().is_none());
        assert!(campaign.is_running());

        let reports = campaign.drain_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].turn, 0);
        assert!(reports[0].messages.iter().all(|m| m.category == MessageCategory::Opening));
        assert_eq!(campaign.scheduler().pending(), reports[0].next_delay);
        assert_eq!(campaign.state().player_cities().count(), 1);
    }

    #[test]
    fn commands_outside_their_phase_are_ignored() {
        let mut campaign = seeded_campaign(3);
        assert!(campaign.execute_turn().is_none());
        campaign.pause();
        campaign.resume();
        assert_eq!(campaign.state().current_turn, 0);

        for _ in 0..3 {
            campaign.skip_round();
        }
        let id = campaign.catalog().skills[0].id.clone();
        assert!(!campaign.select_skill(&id));
        campaign.skip_round();
        assert_eq!(campaign.phase(), GamePhase::Playing);
    }

    #[test]
    fn every_fired_timer_runs_one_turn() {
        let mut campaign = seeded_campaign(5);
        for _ in 0..3 {
            campaign.skip_round();
        }
        campaign.run_until_end(25);
        let state = campaign.state();
        assert_eq!(campaign.scheduler().fired(), state.current_turn);
        assert_consistent(state);
        let headers = campaign
            .message_log()
            .iter()
            .filter(|m| m.message.category == MessageCategory::Turn)
            .count();
        assert_eq!(headers as u32, state.current_turn);
    }

    #[test]
    fn same_seed_same_campaign() {
        let play = |seed| {
            let mut campaign = seeded_campaign(seed);
            let id = campaign.draft().unwrap().offered[0].id.clone();
            assert!(campaign.select_skill(&id));
            campaign.skip_round();
            campaign.skip_round();
            campaign.run_until_end(15);
            campaign.message_log().to_vec()
        };
        assert_eq!(play(8), play(8));
    }

    #[test]
    fn game_over_stops_the_clock() {
        let mut campaign = seeded_campaign(6).with_runner(TurnRunner::new(Vec::new()));
        for _ in 0..3 {
            campaign.skip_round();
        }
        campaign.state.player.troops = 0;
        campaign.state.player.cities_controlled = 0;
        let report = campaign.advance().unwrap();
        assert_eq!(report.outcome, Some(GameOutcome::Defeat));
        assert_eq!(report.next_delay, None);
        assert_eq!(campaign.phase(), GamePhase::GameOver);
        assert!(!campaign.is_running());
        assert!(campaign.scheduler().pending().is_none());
        assert!(campaign.advance().is_none());
        campaign.resume();
        assert_eq!(campaign.state().current_turn, 1);
    }

    #[test]
    fn undrained_reports_are_bounded() {
        let mut campaign = seeded_campaign(9).with_runner(TurnRunner::new(Vec::new()));
        for _ in 0..3 {
            campaign.skip_round();
        }
        let turns = MAX_PENDING_REPORTS as u32 + 36;
        for _ in 0..turns {
            campaign.advance().unwrap();
        }
        let reports = campaign.drain_reports();
        assert_eq!(reports.len(), MAX_PENDING_REPORTS);
        assert_eq!(reports.last().unwrap().turn, turns);
        assert_eq!(reports[0].turn, turns + 1 - MAX_PENDING_REPORTS as u32);
        assert!(campaign.drain_reports().is_empty());
        // The opening is still in the log.
        assert_eq!(campaign.message_log()[0].turn, 0);
    }

    #[test]
    fn new_game_discards_the_old_one() {
        let mut campaign = seeded_campaign(7);
        for _ in 0..3 {
            campaign.skip_round();
        }
        campaign.advance();
        campaign.start_new_game();
        assert_eq!(campaign.phase(), GamePhase::SkillSelection);
        assert_eq!(campaign.state().current_turn, 0);
        assert!(campaign.message_log().is_empty());
        assert!(campaign.drain_reports().is_empty());
        assert!(campaign.scheduler().pending().is_none());
    }

    #[test]
    fn zero_round_draft_goes_straight_to_play() {
        let config = CampaignConfig {
            draft_rounds: 0,
            ..CampaignConfig::default()
        };
        let campaign = Campaign::with_rng(
            test_catalog(),
            config,
            ManualScheduler::new(),
            SmallRng::seed_from_u64(4),
        );
        assert_eq!(campaign.phase(), GamePhase::Playing);
    }
}

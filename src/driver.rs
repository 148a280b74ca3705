//! Live driver: runs a campaign on a tokio task, fed by front-end commands
//! and its own turn timer.

use tokio::sync::mpsc::{Receiver, UnboundedReceiver, UnboundedSender};

use crate::campaign::{Campaign, TurnReport};
use crate::scheduler::{Tick, TokioScheduler, TurnScheduler};

/// Commands a front end sends to a live campaign.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectSkill(String),
    SkipRound,
    Pause,
    Resume,
    TogglePause,
    /// Speed multiplier; clamped by the campaign.
    SetSpeed(f64),
    NewGame,
    /// Stop the driver. Any pending turn is cancelled.
    Shutdown,
}

fn apply<S: TurnScheduler>(campaign: &mut Campaign<S>, command: Command) {
    match command {
        Command::SelectSkill(id) => {
            campaign.select_skill(&id);
        }
        Command::SkipRound => campaign.skip_round(),
        Command::Pause => campaign.pause(),
        Command::Resume => campaign.resume(),
        Command::TogglePause => campaign.toggle_pause(),
        Command::SetSpeed(speed) => campaign.set_speed(speed),
        Command::NewGame => campaign.start_new_game(),
        Command::Shutdown => {}
    }
}

/// Drive `campaign` until a [`Command::Shutdown`] arrives or the command
/// channel closes. Every report the campaign produces is forwarded on
/// `reports`; a closed report channel is not an error.
pub async fn run_live(
    campaign: &mut Campaign<TokioScheduler>,
    mut ticks: UnboundedReceiver<Tick>,
    mut commands: Receiver<Command>,
    reports: UnboundedSender<TurnReport>,
) {
    tracing::info!("live driver started");
    forward(campaign, &reports);
    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => {
                        tracing::debug!(?command, "command received");
                        apply(campaign, command);
                    }
                }
            }
            Some(tick) = ticks.recv() => {
                campaign.on_tick(tick);
            }
        }
        forward(campaign, &reports);
    }
    campaign.pause();
    tracing::info!(turn = campaign.state().current_turn, "live driver stopped");
}

fn forward<S: TurnScheduler>(campaign: &mut Campaign<S>, reports: &UnboundedSender<TurnReport>) {
    for report in campaign.drain_reports() {
        if reports.send(report).is_err() {
            tracing::debug!("report receiver dropped");
        }
    }
}

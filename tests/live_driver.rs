mod common;

use std::time::Duration;

use common::seeded;
use destiny_campaign::config::CampaignConfig;
use destiny_campaign::TurnReport;
use destiny_campaign::content::Catalog;
use destiny_campaign::driver::{Command, run_live};
use destiny_campaign::model::GamePhase;
use destiny_campaign::scheduler::{TokioScheduler, TurnScheduler};
use tokio::sync::mpsc;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn turns_arrive_on_their_own_timer() {
    let (scheduler, ticks) = TokioScheduler::new();
    let catalog = Catalog::builtin().unwrap();
    let mut campaign = seeded(catalog, CampaignConfig::default(), scheduler, 1);
    let (command_tx, command_rx) = mpsc::channel(8);
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<TurnReport>();

    let script = async move {
        let start = Instant::now();
        for _ in 0..3 {
            command_tx.send(Command::SkipRound).await.unwrap();
        }
        let opening = report_rx.recv().await.unwrap();
        assert_eq!(opening.turn, 0);
        let first = report_rx.recv().await.unwrap();
        assert_eq!(first.turn, 1);
        assert!(start.elapsed() >= opening.next_delay.unwrap());
        let second = report_rx.recv().await.unwrap();
        assert_eq!(second.turn, 2);
        command_tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(run_live(&mut campaign, ticks, command_rx, report_tx), script);

    assert_eq!(campaign.phase(), GamePhase::Playing);
    assert_eq!(campaign.state().current_turn, 2);
    assert!(campaign.scheduler().pending().is_none());
}

#[tokio::test(start_paused = true)]
async fn paused_campaign_waits_for_resume() {
    let (scheduler, ticks) = TokioScheduler::new();
    let config = CampaignConfig {
        draft_rounds: 0,
        ..CampaignConfig::default()
    };
    let catalog = Catalog::builtin().unwrap();
    let mut campaign = seeded(catalog, config, scheduler, 2);
    let (command_tx, command_rx) = mpsc::channel(8);
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<TurnReport>();

    let script = async move {
        let opening = report_rx.recv().await.unwrap();
        assert_eq!(opening.turn, 0);
        command_tx.send(Command::Pause).await.unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(report_rx.try_recv().is_err());

        command_tx.send(Command::SetSpeed(4.0)).await.unwrap();
        command_tx.send(Command::Resume).await.unwrap();
        let resumed = report_rx.recv().await.unwrap();
        assert_eq!(resumed.turn, 1);
        assert_eq!(resumed.display_offsets[0], Duration::from_millis(50));
        // Dropping the sender stops the driver.
    };
    tokio::join!(run_live(&mut campaign, ticks, command_rx, report_tx), script);

    assert_eq!(campaign.state().current_turn, 1);
    assert!(!campaign.is_running());
}

#[tokio::test(start_paused = true)]
async fn new_game_mid_play_drops_the_pending_turn() {
    let (scheduler, ticks) = TokioScheduler::new();
    let config = CampaignConfig {
        draft_rounds: 0,
        ..CampaignConfig::default()
    };
    let catalog = Catalog::builtin().unwrap();
    let mut campaign = seeded(catalog, config, scheduler, 3);
    let (command_tx, command_rx) = mpsc::channel(8);
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<TurnReport>();

    let script = async move {
        let opening = report_rx.recv().await.unwrap();
        assert_eq!(opening.turn, 0);
        command_tx.send(Command::NewGame).await.unwrap();
        // A zero-round draft reopens play straight away.
        let reopened = report_rx.recv().await.unwrap();
        assert_eq!(reopened.turn, 0);
        let first = report_rx.recv().await.unwrap();
        assert_eq!(first.turn, 1);
        command_tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(run_live(&mut campaign, ticks, command_rx, report_tx), script);
    assert_eq!(campaign.state().current_turn, 1);
}

//! Timers that pace a campaign's turns.
//!
//! A scheduler holds at most one pending turn. Scheduling replaces whatever
//! was pending, and cancelling clears it. Nothing here runs a turn; the owner
//! of the scheduler does that when the timer fires.

use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

pub trait TurnScheduler {
    /// Arm the timer for the next turn, replacing any pending one.
    fn schedule_next(&mut self, delay: Duration);
    fn cancel_pending(&mut self);
    /// Delay of the pending timer, if armed.
    fn pending(&self) -> Option<Duration>;
}

/// A virtual clock fired by hand. Used by tests and batch runs.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    elapsed: Duration,
    fired: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the pending timer elapse. Returns false if nothing was pending.
    pub fn fire(&mut self) -> bool {
        match self.pending.take() {
            Some(delay) => {
                self.elapsed += delay;
                self.fired += 1;
                true
            }
            None => false,
        }
    }

    /// Virtual time spent waiting on fired timers.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }
}

impl TurnScheduler for ManualScheduler {
    fn schedule_next(&mut self, delay: Duration) {
        self.pending = Some(delay);
    }

    fn cancel_pending(&mut self) {
        self.pending = None;
    }

    fn pending(&self) -> Option<Duration> {
        self.pending
    }
}

/// A timer tick, stamped with the generation that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

/// Real-time scheduler backed by tokio sleep tasks.
///
/// Each armed timer is a spawned task that sleeps and then posts a [`Tick`].
/// Rearming or cancelling aborts the task and bumps the generation, so a tick
/// that was already queued is rejected by [`TokioScheduler::accept`]. Must be
/// used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    ticks: UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
    generation: u64,
    pending: Option<Duration>,
}

impl TokioScheduler {
    /// Build a scheduler and the receiver its ticks arrive on.
    pub fn new() -> (Self, UnboundedReceiver<Tick>) {
        let (ticks, receiver) = unbounded_channel();
        let scheduler = Self {
            ticks,
            task: None,
            generation: 0,
            pending: None,
        };
        (scheduler, receiver)
    }

    /// Whether `tick` belongs to the currently armed timer. Accepting it
    /// disarms the timer.
    pub fn accept(&mut self, tick: Tick) -> bool {
        if self.pending.is_none() || tick.generation != self.generation {
            tracing::debug!(
                tick = tick.generation,
                current = self.generation,
                "stale tick dropped"
            );
            return false;
        }
        self.pending = None;
        self.task = None;
        true
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        self.pending = None;
    }
}

impl TurnScheduler for TokioScheduler {
    fn schedule_next(&mut self, delay: Duration) {
        self.disarm();
        let tick = Tick {
            generation: self.generation,
        };
        let sender = self.ticks.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone only when the campaign has shut down.
            let _ = sender.send(tick);
        }));
        self.pending = Some(delay);
    }

    fn cancel_pending(&mut self) {
        self.disarm();
    }

    fn pending(&self) -> Option<Duration> {
        self.pending
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

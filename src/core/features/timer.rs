//! Countdown timer
//!
//! The countdown state lives in a `watch` channel: the tick task and the
//! owning component both mutate it through `send_modify`, and observers
//! subscribe to it for display updates and completion.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::shared::emit::EventEmitter;
use crate::shared::events::AppEvent;

/// Preset durations offered by the timer, in minutes
pub const TIMER_PRESETS_MINUTES: [u64; 6] = [1, 5, 10, 15, 30, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Set when the countdown reaches zero; cleared by set/reset
    pub completed: bool,
}

impl TimerStatus {
    fn with_total(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
            completed: false,
        }
    }

    /// Percentage of the countdown already elapsed (0-100)
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        100.0 - (self.remaining_seconds as f64 / self.total_seconds as f64 * 100.0)
    }
}

enum TickOutcome {
    Counting,
    Completed,
    Idle,
}

/// Advance the countdown by one second
fn step(status: &mut TimerStatus) -> TickOutcome {
    if status.remaining_seconds == 0 {
        status.running = false;
        return TickOutcome::Idle;
    }
    status.remaining_seconds -= 1;
    if status.remaining_seconds == 0 {
        status.running = false;
        status.completed = true;
        return TickOutcome::Completed;
    }
    TickOutcome::Counting
}

fn announce_completion(events: &EventEmitter) {
    tracing::info!("[Timer] Timer completed");
    events.emit(AppEvent::TimerCompleted);
}

pub struct CountdownTimer {
    tick: Duration,
    status: Arc<watch::Sender<TimerStatus>>,
    events: EventEmitter,
    ticker: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new(tick: Duration, total_seconds: u64, events: EventEmitter) -> Self {
        let (status, _) = watch::channel(TimerStatus::with_total(total_seconds));
        Self {
            tick: tick.max(Duration::from_millis(1)),
            status: Arc::new(status),
            events,
            ticker: None,
        }
    }

    pub fn status(&self) -> TimerStatus {
        *self.status.borrow()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.status().remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.status().total_seconds
    }

    pub fn is_running(&self) -> bool {
        self.status().running
    }

    pub fn progress(&self) -> f64 {
        self.status().progress()
    }

    /// Countdown state updates, including completion
    pub fn subscribe(&self) -> watch::Receiver<TimerStatus> {
        self.status.subscribe()
    }

    /// Set a new duration; a running countdown keeps running from it
    pub fn set(&mut self, total_seconds: u64) {
        self.status.send_modify(|s| {
            s.total_seconds = total_seconds;
            s.remaining_seconds = total_seconds;
            s.completed = false;
        });
        tracing::debug!("[Timer] Set to {} s", total_seconds);
    }

    pub fn set_hms(&mut self, hours: u64, minutes: u64, seconds: u64) {
        self.set(
            hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(seconds),
        );
    }

    pub fn apply_preset(&mut self, minutes: u64) {
        self.set(minutes.saturating_mul(60));
    }

    /// Start counting down; with nothing left this resets instead
    pub async fn start(&mut self) {
        let status = self.status();
        if status.running {
            return;
        }
        if status.remaining_seconds == 0 {
            self.reset().await;
            return;
        }

        self.status.send_modify(|s| {
            s.running = true;
            s.completed = false;
        });

        let shared = Arc::clone(&self.status);
        let events = self.events.clone();
        let tick = self.tick;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick fires immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut outcome = TickOutcome::Idle;
                shared.send_modify(|s| outcome = step(s));
                match outcome {
                    TickOutcome::Counting => {}
                    TickOutcome::Completed => {
                        announce_completion(&events);
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        }));
        tracing::debug!("[Timer] Started with {} s remaining", status.remaining_seconds);
    }

    pub async fn pause(&mut self) {
        self.stop_ticker().await;
        self.status.send_if_modified(|s| {
            let was_running = s.running;
            s.running = false;
            was_running
        });
    }

    /// Stop and restore the full duration
    pub async fn reset(&mut self) {
        self.stop_ticker().await;
        self.status.send_modify(|s| {
            *s = TimerStatus::with_total(s.total_seconds);
        });
        tracing::debug!("[Timer] Reset");
    }

    /// Count down one second by hand; returns true when this completed the timer
    pub fn tick(&mut self) -> bool {
        let mut outcome = TickOutcome::Idle;
        self.status.send_modify(|s| outcome = step(s));
        let completed = matches!(outcome, TickOutcome::Completed);
        if completed {
            announce_completion(&self.events);
        }
        completed
    }

    async fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

/// Split seconds into (hours, minutes, seconds)
pub fn split_hms(total_seconds: u64) -> (u64, u64, u64) {
    (total_seconds / 3600, (total_seconds % 3600) / 60, total_seconds % 60)
}

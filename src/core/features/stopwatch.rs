//! Stopwatch with lap recording
//!
//! Elapsed time is derived from a start instant, so it is exact regardless of
//! tick cadence. While running, a background task publishes the elapsed time
//! every tick for observers. The task is always stopped (and awaited) before
//! pause or reset mutate anything, so a late tick can never overwrite a reset.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    /// 1-based, in recording order
    pub number: usize,
    /// Total elapsed time when the lap was taken
    pub time_ms: u64,
}

pub struct Stopwatch {
    tick: Duration,
    accumulated: Duration,
    started_at: Option<Instant>,
    laps: Vec<Lap>,
    published: Arc<watch::Sender<Duration>>,
    ticker: Option<JoinHandle<()>>,
}

impl Stopwatch {
    pub fn new(tick: Duration) -> Self {
        let (published, _) = watch::channel(Duration::ZERO);
        Self {
            tick: tick.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            started_at: None,
            laps: Vec::new(),
            published: Arc::new(published),
            ticker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + started_at.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Laps, newest first
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Elapsed time as refreshed by the ticker
    pub fn subscribe(&self) -> watch::Receiver<Duration> {
        self.published.subscribe()
    }

    /// Start or resume; no-op while running
    ///
    /// The ticker needs a tokio runtime. Without one the stopwatch still
    /// measures time, it just does not publish ticks.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let started_at = Instant::now();
        self.started_at = Some(started_at);

        let accumulated = self.accumulated;
        let published = Arc::clone(&self.published);
        let tick = self.tick;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.ticker = Some(handle.spawn(async move {
                    let mut interval = tokio::time::interval(tick);
                    loop {
                        interval.tick().await;
                        published.send_replace(accumulated + started_at.elapsed());
                    }
                }));
            }
            Err(_) => {
                tracing::warn!("[Stopwatch] No async runtime, running without ticker");
            }
        }
        tracing::debug!("[Stopwatch] Started at {} ms", accumulated.as_millis());
    }

    pub async fn pause(&mut self) {
        self.stop_ticker().await;
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
            self.published.send_replace(self.accumulated);
            tracing::debug!("[Stopwatch] Paused at {} ms", self.accumulated.as_millis());
        }
    }

    pub async fn reset(&mut self) {
        self.stop_ticker().await;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.laps.clear();
        self.published.send_replace(Duration::ZERO);
        tracing::debug!("[Stopwatch] Reset");
    }

    /// Record a lap; only while running
    pub fn lap(&mut self) -> Option<Lap> {
        if !self.is_running() {
            return None;
        }
        let lap = Lap {
            number: self.laps.len() + 1,
            time_ms: self.elapsed_ms(),
        };
        self.laps.insert(0, lap);
        Some(lap)
    }

    pub fn laps_text(&self) -> String {
        let mut text = String::from("Lap Times:\n");
        for lap in &self.laps {
            text.push_str(&format!("Lap {}: {}\n", lap.number, format_lap(lap.time_ms)));
        }
        text
    }

    async fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            // Wait until the task is really gone
            let _ = handle.await;
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

/// `m:ss.mmm`, or `h:mm:ss.mmm` once an hour has passed
pub fn format_lap(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else {
        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    }
}

//! Tick source.
//!
//! # Responsibilities
//! - Wake every probe interval, the first round one interval after start
//! - Skip the round outside working time
//! - Push each target's name into that target's liveness channel
//!
//! # Design Decisions
//! - Never blocks on a busy supervisor: a full channel drops the tick
//! - Targets are ticked in configuration order

use std::collections::HashMap;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, MissedTickBehavior};

use crate::observability::metrics;
use crate::schedule::calendar::WorkingCalendar;

/// Capacity of each liveness channel. One pending tick is enough.
const LIVENESS_CAPACITY: usize = 1;

pub struct Ticker {
    interval: Duration,
    calendar: WorkingCalendar,
    order: Vec<String>,
    channels: HashMap<String, mpsc::Sender<String>>,
}

impl Ticker {
    pub fn new(interval: Duration, calendar: WorkingCalendar) -> Self {
        Self {
            interval,
            calendar,
            order: Vec::new(),
            channels: HashMap::new(),
        }
    }

    /// Create the liveness channel for `name`.
    pub fn register(&mut self, name: &str) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(LIVENESS_CAPACITY);
        if self.channels.insert(name.to_string(), tx).is_none() {
            self.order.push(name.to_string());
        }
        rx
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            targets = self.order.len(),
            "Ticker starting"
        );

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.fan_out(Local::now().naive_local());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Ticker received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Send one tick to every target if `now` is working time.
    ///
    /// Returns the number of ticks delivered.
    pub fn fan_out(&self, now: NaiveDateTime) -> usize {
        if !self.calendar.is_working_time(now) {
            tracing::trace!(%now, "Outside working time, skipping ticks");
            metrics::record_tick(true);
            return 0;
        }
        metrics::record_tick(false);

        let mut delivered = 0;
        for name in &self.order {
            let Some(tx) = self.channels.get(name) else {
                continue;
            };
            match tx.try_send(name.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(service = %name, "Watchdog busy, tick dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(service = %name, "Watchdog stopped, tick dropped");
                }
            }
        }
        delivered
    }
}

//! Fixed-interval schedulers for Fablehold.
//!
//! The world runs three independent loops: monster AI every 50 ms, the
//! monster spawner every 3 s and the herb spawner every 5 s. Each loop
//! owns one [`TickScheduler`] configured with its period. Schedulers
//! measure how long the work took and warn when a tick eats into its
//! budget. A tick that fires late reschedules a full period from the
//! moment it fired, so a stall never produces a burst of catch-up ticks.
//!
//! # Idle mode
//!
//! A config without a period never fires: [`TickScheduler::wait_for_tick`]
//! pends forever. Tests use it to switch a loop off.
//!
//! # Integration
//!
//! Schedulers sit inside the simulation actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = ai.wait_for_tick() => {
//!             let out = world.run_ai(now_ms);
//!             ai.record_tick_end();
//!         }
//!     }
//! }
//! ```
//!
//! `wait_for_tick` only mutates the scheduler after its sleep completes,
//! so losing a `select!` race never skips or double-counts a tick.

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Full configuration for one scheduler.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Name used in log lines (`"ai"`, `"monster-spawn"`, ...).
    pub label: &'static str,
    /// Time between ticks. `None` = idle (never fires).
    pub period: Option<Duration>,
    /// Budget warning threshold (0.0–1.0). Default: 0.80.
    pub budget_warn_threshold: f64,
    /// Budget critical threshold (0.0–1.0). Default: 1.0.
    pub budget_critical_threshold: f64,
    /// Upper bound of the random delay added to the first tick only.
    pub initial_jitter: Duration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            label: "tick",
            period: None,
            budget_warn_threshold: 0.80,
            budget_critical_threshold: 1.0,
            initial_jitter: Duration::ZERO,
        }
    }
}

impl TickConfig {
    /// Shortest accepted period (128 Hz).
    pub const MIN_PERIOD: Duration = Duration::from_micros(7_813);

    /// A config that ticks once per `period`.
    pub fn every(period: Duration) -> Self {
        Self {
            period: Some(period),
            ..Default::default()
        }
    }

    /// A config that never fires.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Sets the log label.
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called by [`TickScheduler::new`]. Periods shorter than
    /// [`Self::MIN_PERIOD`] are raised to it, thresholds are clamped to
    /// `0.0..=1.0` and the warn threshold never exceeds the critical one.
    pub fn validated(mut self) -> Self {
        if let Some(period) = self.period.filter(|p| *p < Self::MIN_PERIOD) {
            warn!(
                label = self.label,
                period_us = period.as_micros() as u64,
                "tick period below minimum, clamping"
            );
            self.period = Some(Self::MIN_PERIOD);
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self.budget_critical_threshold = self.budget_critical_threshold.clamp(0.0, 1.0);
        if self.budget_warn_threshold > self.budget_critical_threshold {
            self.budget_warn_threshold = self.budget_critical_threshold;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// The configured period.
    pub dt: Duration,
    /// `true` if this tick fired more than 10% of a period late.
    pub overrun: bool,
    /// How many whole periods were skipped (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval tick scheduler.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    next_tick: Option<TokioInstant>,
    tick_start: Option<Instant>,
}

impl TickScheduler {
    /// Creates a scheduler whose first tick is one period (plus jitter)
    /// from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();

        let next_tick = config.period.map(|period| {
            // Sub-microsecond bounds round down to no jitter at all.
            let max_us = config.initial_jitter.as_micros() as u64;
            let jitter = if max_us == 0 {
                Duration::ZERO
            } else {
                Duration::from_micros(rand::rng().random_range(0..max_us))
            };
            TokioInstant::now() + period + jitter
        });

        match config.period {
            Some(period) => debug!(
                label = config.label,
                period_ms = period.as_secs_f64() * 1000.0,
                "tick scheduler created"
            ),
            None => debug!(label = config.label, "tick scheduler created idle"),
        }

        Self {
            config,
            tick_count: 0,
            next_tick,
            tick_start: None,
        }
    }

    /// Creates a scheduler ticking once per `period` with default settings.
    pub fn every(period: Duration) -> Self {
        Self::new(TickConfig::every(period))
    }

    /// Waits until the next tick is due.
    ///
    /// Pends forever when idle; `tokio::select!` keeps serving its other
    /// branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let (next, period) = match (self.next_tick, self.config.period) {
            (Some(next), Some(period)) => (next, period),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = TokioInstant::now();
        self.tick_count += 1;
        self.tick_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > period / 10;
        let ticks_skipped = if overrun {
            (late_by.as_nanos() / period.as_nanos()) as u64
        } else {
            0
        };
        if ticks_skipped > 0 {
            warn!(
                label = self.config.label,
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "tick overrun, skipping ahead"
            );
        }
        self.next_tick = Some(now + period);

        trace!(label = self.config.label, tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: period,
            overrun,
            ticks_skipped,
        }
    }

    /// Records that the work for the current tick has finished.
    ///
    /// Without this call budget warnings stay silent.
    pub fn record_tick_end(&mut self) {
        let Some(start) = self.tick_start.take() else {
            return;
        };
        let elapsed = start.elapsed();

        if let Some(budget) = self.config.period {
            let utilization = elapsed.as_secs_f64() / budget.as_secs_f64();

            if utilization >= self.config.budget_critical_threshold {
                warn!(
                    label = self.config.label,
                    tick = self.tick_count,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    "tick exceeded budget"
                );
            } else if utilization >= self.config.budget_warn_threshold {
                warn!(
                    label = self.config.label,
                    tick = self.tick_count,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    budget_ms = budget.as_secs_f64() * 1000.0,
                    "tick approaching budget limit"
                );
            }
        }
    }

    /// Whether this scheduler has no period and never fires.
    pub fn is_idle(&self) -> bool {
        self.config.period.is_none()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn period(&self) -> Option<Duration> {
        self.config.period
    }

    pub fn label(&self) -> &'static str {
        self.config.label
    }
}

//! Integration tests for the fixed-interval tick scheduler.
//!
//! Runs on a paused Tokio clock so `sleep_until` resolves as soon as the
//! runtime has nothing else to do.

use std::time::Duration;

use fablehold_tick::{TickConfig, TickScheduler};

// =========================================================================
// Helpers
// =========================================================================

fn ai_config() -> TickConfig {
    TickConfig::every(Duration::from_millis(50)).labeled("ai")
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_config_is_idle() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.period, None);
    assert_eq!(cfg.initial_jitter, Duration::ZERO);
}

#[test]
fn test_validated_clamps_tiny_period() {
    let cfg = TickConfig::every(Duration::from_micros(10)).validated();
    assert_eq!(cfg.period, Some(TickConfig::MIN_PERIOD));
}

#[test]
fn test_validated_keeps_warn_below_critical() {
    let cfg = TickConfig {
        budget_warn_threshold: 0.9,
        budget_critical_threshold: 0.5,
        ..ai_config()
    }
    .validated();
    assert_eq!(cfg.budget_warn_threshold, 0.5);
}

#[test]
fn test_long_periods_are_accepted() {
    let cfg = TickConfig::every(Duration::from_secs(8)).validated();
    assert_eq!(cfg.period, Some(Duration::from_secs(8)));
}

// =========================================================================
// Scheduler creation and accessors
// =========================================================================

#[test]
fn test_scheduler_initial_state() {
    let s = TickScheduler::new(ai_config());
    assert_eq!(s.tick_count(), 0);
    assert_eq!(s.label(), "ai");
    assert!(!s.is_idle());
    assert_eq!(s.period(), Some(Duration::from_millis(50)));
}

#[test]
fn test_scheduler_idle() {
    let s = TickScheduler::new(TickConfig::idle());
    assert!(s.is_idle());
    assert_eq!(s.period(), None);
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_for_tick_fires_after_one_period() {
    let mut s = TickScheduler::new(ai_config());
    let start = tokio::time::Instant::now();

    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert_eq!(info.dt, Duration::from_millis(50));
    assert!(!info.overrun);
    assert_eq!(start.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_multiple_ticks_increment_monotonically() {
    let mut s = TickScheduler::new(ai_config());
    for expected in 1..=5 {
        let info = s.wait_for_tick().await;
        assert_eq!(info.tick, expected);
    }
    assert_eq!(s.tick_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_spawner_period_cadence() {
    let mut s = TickScheduler::every(Duration::from_secs(5));
    let start = tokio::time::Instant::now();

    s.wait_for_tick().await;
    s.wait_for_tick().await;
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_jitter_delays_first_tick_within_bound() {
    let config = TickConfig {
        initial_jitter: Duration::from_millis(5),
        ..ai_config()
    };
    let mut s = TickScheduler::new(config);
    let start = tokio::time::Instant::now();

    s.wait_for_tick().await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(55));
}

#[tokio::test(start_paused = true)]
async fn test_sub_microsecond_jitter_is_ignored() {
    let config = TickConfig {
        initial_jitter: Duration::from_nanos(500),
        ..ai_config()
    };
    let mut s = TickScheduler::new(config);
    let start = tokio::time::Instant::now();

    s.wait_for_tick().await;
    assert_eq!(start.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_idle_never_fires() {
    let mut s = TickScheduler::new(TickConfig::idle());
    let result = tokio::time::timeout(Duration::from_secs(60), s.wait_for_tick()).await;
    assert!(result.is_err(), "idle scheduler should pend forever");
}

// =========================================================================
// Overruns
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_late_tick_reschedules_from_now() {
    let mut s = TickScheduler::new(ai_config());

    // Stall for three periods before polling.
    tokio::time::advance(Duration::from_millis(200)).await;
    let info = s.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 3);

    let before = tokio::time::Instant::now();
    s.wait_for_tick().await;
    assert_eq!(before.elapsed(), Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_slightly_late_tick_is_not_an_overrun() {
    let mut s = TickScheduler::new(ai_config());

    tokio::time::advance(Duration::from_millis(53)).await;
    let info = s.wait_for_tick().await;
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
}

// =========================================================================
// Budget
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_record_tick_end_without_wait_is_noop() {
    let mut s = TickScheduler::new(ai_config());
    s.record_tick_end();
    assert_eq!(s.tick_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_record_tick_end_over_budget_keeps_cadence() {
    let mut s = TickScheduler::new(TickConfig {
        budget_warn_threshold: 0.0,
        budget_critical_threshold: 0.0,
        ..ai_config()
    });

    s.wait_for_tick().await;
    std::thread::sleep(Duration::from_micros(200));
    s.record_tick_end();

    let before = tokio::time::Instant::now();
    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 2);
    assert_eq!(before.elapsed(), Duration::from_millis(50));
}

// =========================================================================
// select! loop pattern
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_independent_loops_in_one_select() {
    let mut ai = TickScheduler::new(ai_config());
    let mut spawn =
        TickScheduler::new(TickConfig::every(Duration::from_millis(500)).labeled("spawn"));
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(1);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_010)).await;
        tx.send("stop").await.ok();
    });

    let (mut ai_ticks, mut spawn_ticks) = (0u64, 0u64);
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "stop");
                break;
            }
            _ = ai.wait_for_tick() => {
                ai_ticks += 1;
                ai.record_tick_end();
            }
            _ = spawn.wait_for_tick() => {
                spawn_ticks += 1;
                spawn.record_tick_end();
            }
        }
    }

    assert_eq!(ai_ticks, 20);
    assert_eq!(spawn_ticks, 2);
}

//! Hunger bar monitoring with threshold-triggered feeding

use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

use super::{perform_feed, FinishGuard, WorkerContext, WorkerError};
use crate::vision::{DetectionError, HungerSensor};

/// Sample the hunger bar and feed whenever it is at or below the threshold
///
/// Sleeps are not subdivided: the stop condition is checked once per cycle,
/// after the cool-down or the regular interval. Failed readings are
/// reported and retried after a back-off; they never trigger a feed.
pub fn run(ctx: WorkerContext, sensor: Arc<dyn HungerSensor>) {
    let _finish = FinishGuard::new(&ctx);
    info!("Hunger monitor worker {} started", ctx.id);
    ctx.dispatcher.post_status("Hunger monitoring started");

    while !ctx.should_stop() {
        if let Err(e) = monitor_cycle(&ctx, sensor.as_ref()) {
            ctx.dispatcher
                .post_error(format!("Error in hunger monitoring: {}", e));
            thread::sleep(ctx.timing.error_backoff());
        }
    }

    ctx.dispatcher.post_status("Hunger monitor stopped");
}

/// One sample-compare-feed cycle, including its trailing sleep
fn monitor_cycle(ctx: &WorkerContext, sensor: &dyn HungerSensor) -> Result<(), WorkerError> {
    let (region, threshold) = {
        let config = ctx.config.read();
        (config.hunger_region, config.hunger_threshold)
    };
    let region = region.ok_or(DetectionError::MissingRegion)?;

    let percent = sensor.sample(&region)? * 100.0;
    ctx.dispatcher.post_hunger(percent);
    ctx.dispatcher
        .post_status(format!("Hunger detected: {:.1}%", percent));

    if percent <= threshold {
        ctx.dispatcher
            .post_status(format!("Hunger low ({:.1}%), feeding...", percent));
        match perform_feed(ctx) {
            Ok(point) => {
                debug!("Monitor feed clicked {}", point);
                ctx.dispatcher
                    .post_status(format!("Feed complete. Hunger: {:.1}%", percent));
            }
            Err(e) => ctx.dispatcher.post_error(format!("Feed failed - {}", e)),
        }
        thread::sleep(ctx.timing.feed_cooldown());
    } else {
        thread::sleep(ctx.timing.monitor_interval());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ScreenRegion;
    use crate::config::TimingConfig;
    use crate::input::ScreenPoint;
    use crate::shared::{AutomationConfig, WorkerEvent, WorkerKind};
    use crate::workers::test_support::*;
    use std::time::Duration;

    fn monitor_config() -> AutomationConfig {
        AutomationConfig {
            hunger_region: Some(ScreenRegion::new(10, 10, 100, 8)),
            hunger_threshold: 10.0,
            feed_trigger: Some(ScreenPoint::new(400, 300)),
            ..AutomationConfig::default()
        }
    }

    fn fast_timing() -> TimingConfig {
        TimingConfig {
            monitor_interval_ms: 30,
            feed_cooldown_ms: 300,
            error_backoff_ms: 50,
            ..TimingConfig::default()
        }
    }

    #[test]
    fn test_low_reading_feeds_once_per_sample_with_cooldown() {
        let clicker = Arc::new(RecordingClicker::default());
        let sensor = Arc::new(ScriptedSensor::reading(0.05));
        let (ctx, rx) = context(WorkerKind::Feed, monitor_config(), clicker.clone(), fast_timing());
        let flags = ctx.flags.clone();

        let worker_sensor: Arc<dyn HungerSensor> = sensor.clone();
        let handle = thread::spawn(move || run(ctx, worker_sensor));
        assert!(wait_until(Duration::from_secs(3), || clicker.count() >= 2));
        flags.set_stop_all(true);
        handle.join().unwrap();

        // Exactly one click per below-threshold sample
        assert_eq!(clicker.count(), sensor.count());

        let clicks = clicker.clicks.lock();
        for pair in clicks.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(300));
        }
        drop(clicks);

        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert!(events.contains(&WorkerEvent::HungerReading { percent: 5.0 }));
        assert!(events.contains(&WorkerEvent::FeedPerformed));
        assert!(!flags.feed_slot.is_live());
    }

    #[test]
    fn test_reading_above_threshold_never_feeds() {
        let clicker = Arc::new(RecordingClicker::default());
        let sensor = Arc::new(ScriptedSensor::reading(0.5));
        let (ctx, rx) = context(WorkerKind::Feed, monitor_config(), clicker.clone(), fast_timing());
        let flags = ctx.flags.clone();

        let worker_sensor: Arc<dyn HungerSensor> = sensor.clone();
        let handle = thread::spawn(move || run(ctx, worker_sensor));
        assert!(wait_until(Duration::from_secs(2), || sensor.count() >= 3));
        flags.set_stop_all(true);
        handle.join().unwrap();

        assert_eq!(clicker.count(), 0);
        assert!(status_messages(&rx).contains(&"Hunger detected: 50.0%".to_string()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let clicker = Arc::new(RecordingClicker::default());
        let sensor = Arc::new(ScriptedSensor::reading(0.25));
        let mut config = monitor_config();
        config.hunger_threshold = 25.0;
        let (ctx, _rx) = context(WorkerKind::Feed, config, clicker.clone(), fast_timing());
        let flags = ctx.flags.clone();

        let handle = thread::spawn(move || run(ctx, sensor));
        assert!(wait_until(Duration::from_secs(2), || clicker.count() >= 1));
        flags.set_stop_all(true);
        handle.join().unwrap();
    }

    #[test]
    fn test_failed_reading_is_reported_and_never_feeds() {
        let clicker = Arc::new(RecordingClicker::default());
        let sensor = Arc::new(ScriptedSensor::failing());
        let (ctx, rx) = context(WorkerKind::Feed, monitor_config(), clicker.clone(), fast_timing());
        let flags = ctx.flags.clone();

        let worker_sensor: Arc<dyn HungerSensor> = sensor.clone();
        let handle = thread::spawn(move || run(ctx, worker_sensor));
        assert!(wait_until(Duration::from_secs(2), || sensor.count() >= 3));
        flags.set_stop_all(true);
        handle.join().unwrap();

        assert_eq!(clicker.count(), 0);
        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert!(!events
            .iter()
            .any(|e| matches!(e, WorkerEvent::HungerReading { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            WorkerEvent::Status { message, .. } if message.starts_with("Error in hunger monitoring: ")
        )));
    }
}

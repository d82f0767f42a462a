//! Bounded-duration repeated clicking

use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use super::{FinishGuard, WorkerContext, WorkerError};

/// Click spacing and total length of one chop run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChopPace {
    pub interval: Duration,
    pub duration: Duration,
}

/// How a chop run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChopOutcome {
    /// Duration elapsed
    Finished,
    /// Stop-all or the chop toggle was observed
    Stopped,
}

impl WorkerContext {
    fn chop_should_stop(&self) -> bool {
        self.should_stop() || !self.flags.chop_running()
    }
}

/// Click the chop trigger at the configured rate until the duration elapses
///
/// The finish path always runs, panics included: the slot is released and
/// exactly one `ChopFinished` event is posted.
pub fn run(ctx: WorkerContext, pace: ChopPace) {
    let _finish = FinishGuard::new(&ctx);
    info!("Auto-chop worker {} started ({:?})", ctx.id, pace);

    match chop_loop(&ctx, pace) {
        Ok(ChopOutcome::Finished) => ctx.dispatcher.post_status("Auto-chop finished"),
        Ok(ChopOutcome::Stopped) => ctx.dispatcher.post_status("Auto-chop stopped"),
        Err(e) => ctx.dispatcher.post_error(format!("Error in auto-chop: {}", e)),
    }
}

fn chop_loop(ctx: &WorkerContext, pace: ChopPace) -> Result<ChopOutcome, WorkerError> {
    let (point, rate, duration) = {
        let config = ctx.config.read();
        (
            config.chop_trigger,
            config.chop_click_rate,
            config.chop_duration_secs,
        )
    };
    let point = point.ok_or(WorkerError::ChopTriggerMissing)?;
    let end = Instant::now() + pace.duration;

    ctx.dispatcher.post_status(format!(
        "Auto-chop started: {} clicks/sec for {}s",
        rate, duration
    ));

    while Instant::now() < end {
        if ctx.chop_should_stop() {
            return Ok(ChopOutcome::Stopped);
        }
        ctx.clicker.click(point)?;
        thread::sleep(pace.interval);
    }

    // A stop that lands during the final sleep still counts as a stop
    if ctx.chop_should_stop() {
        return Ok(ChopOutcome::Stopped);
    }
    Ok(ChopOutcome::Finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::input::ScreenPoint;
    use crate::shared::{AutomationConfig, WorkerEvent, WorkerKind};
    use crate::workers::secs_to_duration;
    use crate::workers::test_support::*;
    use std::sync::Arc;

    fn chop_config(rate: f32, duration: f32) -> AutomationConfig {
        AutomationConfig {
            chop_trigger: Some(ScreenPoint::new(640, 360)),
            chop_click_rate: rate,
            chop_duration_secs: duration,
            ..AutomationConfig::default()
        }
    }

    fn run_configured(ctx: WorkerContext) {
        let pace = {
            let config = ctx.config.read();
            ChopPace {
                interval: secs_to_duration(1.0 / config.chop_click_rate).unwrap(),
                duration: secs_to_duration(config.chop_duration_secs).unwrap(),
            }
        };
        run(ctx, pace);
    }

    fn finished_events(events: &[WorkerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, WorkerEvent::ChopFinished { .. }))
            .count()
    }

    #[test]
    fn test_runs_for_duration_then_finishes_once() {
        let clicker = Arc::new(RecordingClicker::default());
        let (ctx, rx) = context(
            WorkerKind::Chop,
            chop_config(2.0, 1.0),
            clicker.clone(),
            TimingConfig::default(),
        );
        ctx.flags.set_chop_running(true);
        let flags = ctx.flags.clone();
        let id = ctx.id;

        let started = Instant::now();
        run_configured(ctx);
        let elapsed = started.elapsed();

        // Duration plus at most one click interval
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1600));

        let clicks = clicker.clicks.lock();
        assert!((2..=3).contains(&clicks.len()));
        let spacing = clicks[1].1 - clicks[0].1;
        assert!(spacing >= Duration::from_millis(450));
        drop(clicks);

        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(finished_events(&events), 1);
        assert_eq!(events.last(), Some(&WorkerEvent::ChopFinished { worker: id }));
        assert!(events.contains(&WorkerEvent::Status {
            level: crate::shared::StatusLevel::Info,
            message: "Auto-chop finished".to_string(),
        }));
        assert!(!flags.chop_slot.is_live());
    }

    #[test]
    fn test_toggle_off_stops_within_one_interval() {
        let clicker = Arc::new(RecordingClicker::default());
        let (ctx, rx) = context(
            WorkerKind::Chop,
            chop_config(10.0, 30.0),
            clicker.clone(),
            TimingConfig::default(),
        );
        ctx.flags.set_chop_running(true);
        let flags = ctx.flags.clone();

        let handle = thread::spawn(move || run_configured(ctx));
        assert!(wait_until(Duration::from_secs(2), || clicker.count() >= 2));
        let stopped_at = Instant::now();
        flags.set_chop_running(false);
        handle.join().unwrap();

        assert!(stopped_at.elapsed() < Duration::from_millis(400));
        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(finished_events(&events), 1);
        assert!(status_messages_from(&events).contains(&"Auto-chop stopped".to_string()));
    }

    #[test]
    fn test_click_failure_abandons_run_and_still_finishes() {
        let clicker = Arc::new(RecordingClicker::failing());
        let (ctx, rx) = context(
            WorkerKind::Chop,
            chop_config(5.0, 10.0),
            clicker,
            TimingConfig::default(),
        );
        ctx.flags.set_chop_running(true);

        let started = Instant::now();
        run_configured(ctx);
        assert!(started.elapsed() < Duration::from_secs(1));

        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(finished_events(&events), 1);
        assert!(status_messages_from(&events)
            .iter()
            .any(|m| m.starts_with("Error in auto-chop: ")));
    }

    #[test]
    fn test_missing_trigger_reports_and_finishes() {
        let clicker = Arc::new(RecordingClicker::default());
        let (ctx, rx) = context(
            WorkerKind::Chop,
            AutomationConfig::default(),
            clicker.clone(),
            TimingConfig::default(),
        );
        ctx.flags.set_chop_running(true);

        run_configured(ctx);

        assert_eq!(clicker.count(), 0);
        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(finished_events(&events), 1);
        assert!(status_messages_from(&events)
            .contains(&"Error in auto-chop: chop trigger not set".to_string()));
    }

    #[test]
    fn test_panicking_click_still_finishes_once() {
        let (ctx, rx) = context(
            WorkerKind::Chop,
            chop_config(10.0, 30.0),
            Arc::new(PanickingClicker),
            TimingConfig::default(),
        );
        ctx.flags.set_chop_running(true);
        let flags = ctx.flags.clone();
        let id = ctx.id;

        let handle = thread::spawn(move || run_configured(ctx));
        assert!(handle.join().is_err());

        assert!(!flags.chop_slot.is_live());
        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(finished_events(&events), 1);
        assert_eq!(events.last(), Some(&WorkerEvent::ChopFinished { worker: id }));
        assert!(status_messages_from(&events)
            .iter()
            .any(|m| m.ends_with("stopped unexpectedly")));
    }

    fn status_messages_from(events: &[WorkerEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                WorkerEvent::Status { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

//! Timer-driven feeding

use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use super::{perform_feed, secs_to_duration, FinishGuard, WorkerContext};

/// Timer interval for `minutes`; None if it is not representable
pub fn interval_from_minutes(minutes: f32) -> Option<Duration> {
    secs_to_duration(minutes * 60.0)
}

/// Feed every `interval` until stopped
///
/// The wait is split into `timer_poll` increments so a stop is honored
/// within one increment. A stop observed mid-wait exits without feeding.
pub fn run(ctx: WorkerContext, interval: Duration) {
    let _finish = FinishGuard::new(&ctx);
    let minutes = ctx.config.read().timer_interval_minutes;

    info!("Timer feed worker {} started ({:?} interval)", ctx.id, interval);
    ctx.dispatcher
        .post_status(format!("Timer mode: waiting {} minutes", minutes));

    while !ctx.should_stop() {
        if !ctx.wait_unless_stopped(interval, ctx.timing.timer_poll()) {
            break;
        }

        ctx.dispatcher.post_status("Performing feed action...");
        match perform_feed(&ctx) {
            Ok(point) => {
                debug!("Timer feed clicked {}", point);
                ctx.dispatcher
                    .post_status(format!("Feed complete. Next feed in {} minutes", minutes));
            }
            Err(e) => ctx.dispatcher.post_error(format!("Feed failed - {}", e)),
        }

        // Keeps a near-zero interval from spinning
        thread::sleep(ctx.timing.feed_cycle_pause());
    }

    ctx.dispatcher.post_status("Timer worker stopped");
}

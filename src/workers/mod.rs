//! Background automation routines
//!
//! Each routine runs on its own named thread and loops until its stop
//! condition is observed. Cancellation is cooperative: loops poll the
//! shared flags at their sleep boundaries, so the worst-case stop latency
//! equals the longest uninterrupted sleep of the routine:
//!
//! | routine        | longest sleep              |
//! |----------------|----------------------------|
//! | timer feed     | one poll increment (1 s)   |
//! | hunger monitor | feed cool-down (2 s)       |
//! | auto chop      | one click interval         |

pub mod auto_chop;
pub mod hunger_monitor;
pub mod timer_feed;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::config::TimingConfig;
use crate::input::{ClickError, PointerClicker, ScreenPoint};
use crate::shared::{ControlFlags, SharedConfig, UiDispatcher, WorkerId, WorkerKind};
use crate::vision::DetectionError;

/// Failures inside a worker cycle; reported, never fatal to the process
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("feed trigger not set")]
    FeedTriggerMissing,
    #[error("chop trigger not set")]
    ChopTriggerMissing,
    #[error(transparent)]
    Click(#[from] ClickError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

/// Everything a worker needs, handed over at spawn time
#[derive(Clone)]
pub struct WorkerContext {
    pub id: WorkerId,
    pub kind: WorkerKind,
    pub flags: Arc<ControlFlags>,
    pub config: SharedConfig,
    pub clicker: Arc<dyn PointerClicker>,
    pub dispatcher: UiDispatcher,
    pub timing: TimingConfig,
}

impl WorkerContext {
    /// Stop-all was requested, or this worker no longer owns its slot
    ///
    /// The slot check retires a worker whose handle was dropped after a
    /// timed-out join, so it cannot linger after the flags are reset.
    pub fn should_stop(&self) -> bool {
        self.flags.stop_requested() || !self.flags.slot(self.kind).is_held_by(self.id)
    }

    /// Sleep for `total`, checking the stop condition every `step`
    ///
    /// Returns false as soon as a stop is observed.
    pub fn wait_unless_stopped(&self, total: Duration, step: Duration) -> bool {
        let step = step.max(Duration::from_millis(1));
        let deadline = Instant::now() + total;
        loop {
            if self.should_stop() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(step.min(deadline - now));
        }
    }

    /// Release this worker's slot unless it has been handed to another worker
    pub fn release_slot(&self) {
        if self.flags.slot(self.kind).clear_if(self.id) {
            debug!("Worker {} released its {:?} slot", self.id, self.kind);
        }
    }
}

/// Runs a worker's finish path on drop, so it also runs when the worker panics
///
/// Releases the slot and, for chop workers, posts the single `ChopFinished`.
pub(crate) struct FinishGuard<'a> {
    ctx: &'a WorkerContext,
}

impl<'a> FinishGuard<'a> {
    pub(crate) fn new(ctx: &'a WorkerContext) -> Self {
        Self { ctx }
    }
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        let ctx = self.ctx;
        if thread::panicking() {
            ctx.dispatcher.post_error(format!(
                "{:?} worker {} stopped unexpectedly",
                ctx.kind, ctx.id
            ));
        }
        ctx.release_slot();
        if ctx.kind == WorkerKind::Chop {
            ctx.dispatcher.post_chop_finished(ctx.id);
        }
    }
}

/// Float seconds as a `Duration`; None when negative, NaN or too large
pub fn secs_to_duration(secs: f32) -> Option<Duration> {
    Duration::try_from_secs_f32(secs).ok()
}

/// The feed action: one click at the configured feed trigger
pub fn perform_feed(ctx: &WorkerContext) -> Result<ScreenPoint, WorkerError> {
    let point = ctx
        .config
        .read()
        .feed_trigger
        .ok_or(WorkerError::FeedTriggerMissing)?;
    ctx.clicker.click(point)?;
    ctx.dispatcher.post_feed_performed();
    Ok(point)
}

/// Spawn a named worker thread
pub fn spawn_worker<F>(name: &str, body: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(body)
}

/// Result of a bounded join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Thread exited within the timeout
    Joined,
    /// Thread exited by panicking
    Panicked,
    /// Thread still running; it is abandoned
    TimedOut,
}

/// Join `handle`, giving up after `timeout`
pub fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration) -> JoinOutcome {
    const POLL: Duration = Duration::from_millis(10);

    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return JoinOutcome::TimedOut;
        }
        thread::sleep(POLL);
    }

    match handle.join() {
        Ok(()) => JoinOutcome::Joined,
        Err(_) => JoinOutcome::Panicked,
    }
}

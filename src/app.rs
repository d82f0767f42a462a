//! Automation Coordinator
//!
//! Starts and stops the worker routines, enforces one feed worker and one
//! chop worker at a time, and applies worker events to UI-visible state.
//! Every method here runs on the UI thread.

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capture::ScreenRegion;
use crate::config::{AppConfig, FeedMode, TimingConfig};
use crate::input::{PointerClicker, ScreenPoint};
use crate::shared::{
    AutomationConfig, ControlFlags, HungerDisplay, RuntimeState, SharedConfig, UiDispatcher,
    WorkerEvent, WorkerId, WorkerKind,
};
use crate::vision::{DetectionError, HungerSensor};
use crate::workers::auto_chop::{self, ChopPace};
use crate::workers::{
    hunger_monitor, join_with_timeout, secs_to_duration, spawn_worker, timer_feed, JoinOutcome,
    WorkerContext,
};

/// Why a coordinator request was rejected
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("A feed worker is already running. Please stop it first.")]
    FeedAlreadyRunning,
    #[error("Auto-chop is already running. Please stop it first.")]
    ChopAlreadyRunning,
    #[error("Feed trigger coordinate is required. Please record a feed trigger first.")]
    FeedTriggerMissing,
    #[error("Chop trigger coordinate is required. Please record a chop trigger first.")]
    ChopTriggerMissing,
    #[error("No hunger region selected. Please record a hunger region first.")]
    HungerRegionMissing,
    #[error("Region {0} is too small")]
    InvalidRegion(ScreenRegion),
    #[error("Hunger threshold must be between 0 and 100 (got {0})")]
    ThresholdOutOfRange(f32),
    #[error("Timer interval must be greater than 0.")]
    NonPositiveInterval,
    #[error("Chop click rate must be greater than 0.")]
    NonPositiveRate,
    #[error("Chop duration must be greater than 0.")]
    NonPositiveDuration,
    #[error("{what} of {value} is too large")]
    ValueTooLarge { what: &'static str, value: f32 },
    #[error("Feed mode cannot change while a feed worker is running")]
    FeedModeLocked,
    #[error("Error detecting hunger: {0}")]
    Detection(#[from] DetectionError),
    #[error("Failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl AutomationError {
    /// Heading for the modal notice
    pub fn title(&self) -> &'static str {
        match self {
            Self::FeedAlreadyRunning | Self::ChopAlreadyRunning | Self::FeedModeLocked => {
                "Worker Already Running"
            }
            Self::FeedTriggerMissing | Self::ChopTriggerMissing | Self::HungerRegionMissing => {
                "Missing Configuration"
            }
            Self::Detection(_) => "Detection Failed",
            Self::Spawn(_) => "Worker Error",
            _ => "Invalid Configuration",
        }
    }
}

/// Strictly positive; false for NaN
fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn timer_interval(minutes: f32) -> Result<Duration, AutomationError> {
    if !is_positive(minutes) {
        return Err(AutomationError::NonPositiveInterval);
    }
    timer_feed::interval_from_minutes(minutes).ok_or(AutomationError::ValueTooLarge {
        what: "Timer interval",
        value: minutes,
    })
}

fn click_interval(rate: f32) -> Result<Duration, AutomationError> {
    if !is_positive(rate) {
        return Err(AutomationError::NonPositiveRate);
    }
    // A tiny rate means an unrepresentably long click interval
    secs_to_duration(1.0 / rate).ok_or(AutomationError::ValueTooLarge {
        what: "Click interval for rate",
        value: rate,
    })
}

fn chop_duration(seconds: f32) -> Result<Duration, AutomationError> {
    if !is_positive(seconds) {
        return Err(AutomationError::NonPositiveDuration);
    }
    secs_to_duration(seconds).ok_or(AutomationError::ValueTooLarge {
        what: "Chop duration",
        value: seconds,
    })
}

/// What `start_feed` will spawn
enum FeedPlan {
    Timer(Duration),
    Monitor,
}

/// Handle of a spawned worker thread
struct RunningWorker {
    id: WorkerId,
    handle: std::thread::JoinHandle<()>,
}

/// Join results of a stop-all request; `None` where no worker was present
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StopReport {
    pub feed: Option<JoinOutcome>,
    pub chop: Option<JoinOutcome>,
}

/// One-shot hunger reading taken from the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungerCheck {
    pub percent: f32,
    /// The reading is at or below the threshold, so the monitor would feed
    pub below_threshold: bool,
}

/// Control surface over the automation workers
pub struct AutomationCoordinator {
    config: SharedConfig,
    flags: Arc<ControlFlags>,
    runtime: RuntimeState,
    clicker: Arc<dyn PointerClicker>,
    sensor: Arc<dyn HungerSensor>,
    timing: TimingConfig,
    dispatcher: UiDispatcher,
    events: Receiver<WorkerEvent>,
    feed_worker: Option<RunningWorker>,
    chop_worker: Option<RunningWorker>,
    debug_mode: bool,
}

impl AutomationCoordinator {
    pub fn new(
        app_config: &AppConfig,
        clicker: Arc<dyn PointerClicker>,
        sensor: Arc<dyn HungerSensor>,
    ) -> Self {
        let (dispatcher, events) = UiDispatcher::channel();
        Self {
            config: Arc::new(RwLock::new(AutomationConfig::from_defaults(
                &app_config.automation,
            ))),
            flags: Arc::new(ControlFlags::new()),
            runtime: RuntimeState::default(),
            clicker,
            sensor,
            timing: app_config.timing,
            dispatcher,
            events,
            feed_worker: None,
            chop_worker: None,
            debug_mode: false,
        }
    }

    /// Snapshot of the automation settings
    pub fn config(&self) -> AutomationConfig {
        self.config.read().clone()
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    pub fn flags(&self) -> &ControlFlags {
        &self.flags
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    pub fn is_feed_running(&self) -> bool {
        self.flags.feed_slot.is_live()
    }

    pub fn is_chop_running(&self) -> bool {
        self.flags.chop_slot.is_live()
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    /// Replace the status bar text
    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.runtime.status_message = message;
    }

    pub fn set_error_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.runtime.status_message = message;
    }

    /// Route a rejected request to the status bar and hand it back
    fn reject<T>(&mut self, error: AutomationError) -> Result<T, AutomationError> {
        self.set_error_status(error.to_string());
        Err(error)
    }

    // ---- settings -------------------------------------------------------

    pub fn set_feed_mode(&mut self, mode: FeedMode) -> Result<(), AutomationError> {
        if self.is_feed_running() {
            return self.reject(AutomationError::FeedModeLocked);
        }
        self.config.write().feed_mode = mode;
        self.set_status(format!("Feed mode changed to: {}", mode.label()));
        Ok(())
    }

    pub fn set_timer_interval(&mut self, minutes: f32) -> Result<(), AutomationError> {
        if let Err(e) = timer_interval(minutes) {
            return self.reject(e);
        }
        self.config.write().timer_interval_minutes = minutes;
        self.set_status(format!("Timer interval set to: {} minutes", minutes));
        Ok(())
    }

    pub fn set_hunger_threshold(&mut self, percent: f32) -> Result<(), AutomationError> {
        if !(0.0..=100.0).contains(&percent) {
            return self.reject(AutomationError::ThresholdOutOfRange(percent));
        }
        self.config.write().hunger_threshold = percent;
        self.set_status(format!("Hunger threshold set to: {}%", percent));
        Ok(())
    }

    pub fn set_chop_click_rate(&mut self, rate: f32) -> Result<(), AutomationError> {
        if let Err(e) = click_interval(rate) {
            return self.reject(e);
        }
        self.config.write().chop_click_rate = rate;
        self.set_status(format!("Chop click rate set to: {} clicks/sec", rate));
        Ok(())
    }

    pub fn set_chop_duration(&mut self, seconds: f32) -> Result<(), AutomationError> {
        if let Err(e) = chop_duration(seconds) {
            return self.reject(e);
        }
        self.config.write().chop_duration_secs = seconds;
        self.set_status(format!("Chop duration set to: {} seconds", seconds));
        Ok(())
    }

    pub fn set_hunger_region(&mut self, region: ScreenRegion) -> Result<(), AutomationError> {
        if !region.is_valid() {
            return self.reject(AutomationError::InvalidRegion(region));
        }
        self.config.write().hunger_region = Some(region);
        self.set_status(format!("Hunger region recorded: {}", region));
        Ok(())
    }

    pub fn set_feed_trigger(&mut self, point: ScreenPoint) {
        self.config.write().feed_trigger = Some(point);
        self.set_status(format!("Feed trigger recorded: {}", point));
    }

    pub fn set_chop_trigger(&mut self, point: ScreenPoint) {
        self.config.write().chop_trigger = Some(point);
        self.set_status(format!("Chop trigger recorded: {}", point));
    }

    /// Status for an aborted overlay selection, e.g. "Feed trigger"
    pub fn selection_cancelled(&mut self, what: &str) {
        self.set_status(format!("{} selection cancelled", what));
    }

    // ---- worker control -------------------------------------------------

    fn worker_context(&self, id: WorkerId, kind: WorkerKind) -> WorkerContext {
        WorkerContext {
            id,
            kind,
            flags: self.flags.clone(),
            config: self.config.clone(),
            clicker: self.clicker.clone(),
            dispatcher: self.dispatcher.clone(),
            timing: self.timing,
        }
    }

    fn validate_feed(&self) -> Result<(AutomationConfig, FeedPlan), AutomationError> {
        if self.is_feed_running() {
            return Err(AutomationError::FeedAlreadyRunning);
        }
        let config = self.config();
        if config.feed_trigger.is_none() {
            return Err(AutomationError::FeedTriggerMissing);
        }
        let plan = match config.feed_mode {
            FeedMode::Timer => FeedPlan::Timer(timer_interval(config.timer_interval_minutes)?),
            FeedMode::MonitorBar => {
                match config.hunger_region {
                    None => return Err(AutomationError::HungerRegionMissing),
                    Some(region) if !region.is_valid() => {
                        return Err(AutomationError::InvalidRegion(region))
                    }
                    Some(_) => {}
                }
                if !(0.0..=100.0).contains(&config.hunger_threshold) {
                    return Err(AutomationError::ThresholdOutOfRange(config.hunger_threshold));
                }
                FeedPlan::Monitor
            }
        };
        Ok((config, plan))
    }

    /// Start the feed worker matching the current feed mode
    pub fn start_feed(&mut self) -> Result<(), AutomationError> {
        let (config, plan) = match self.validate_feed() {
            Ok(validated) => validated,
            Err(e) => return self.reject(e),
        };

        let id = WorkerId::next();
        self.flags.feed_slot.claim(id);
        self.flags.set_stop_all(false);

        let ctx = self.worker_context(id, WorkerKind::Feed);
        let spawned = match plan {
            FeedPlan::Timer(interval) => {
                spawn_worker("timer-feed", move || timer_feed::run(ctx, interval))
            }
            FeedPlan::Monitor => {
                let sensor = self.sensor.clone();
                spawn_worker("hunger-monitor", move || hunger_monitor::run(ctx, sensor))
            }
        };
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.flags.feed_slot.clear_if(id);
                return self.reject(e.into());
            }
        };
        self.feed_worker = Some(RunningWorker { id, handle });

        match config.feed_mode {
            FeedMode::Timer => self.set_status(format!(
                "Timer mode started: feeding every {} minutes",
                config.timer_interval_minutes
            )),
            FeedMode::MonitorBar => self.set_status(format!(
                "Hunger monitoring started: feeding when hunger <= {}%",
                config.hunger_threshold
            )),
        }
        Ok(())
    }

    fn validate_chop(&self) -> Result<ChopPace, AutomationError> {
        if self.is_chop_running() {
            return Err(AutomationError::ChopAlreadyRunning);
        }
        let config = self.config.read();
        if config.chop_trigger.is_none() {
            return Err(AutomationError::ChopTriggerMissing);
        }
        Ok(ChopPace {
            interval: click_interval(config.chop_click_rate)?,
            duration: chop_duration(config.chop_duration_secs)?,
        })
    }

    /// Start the auto-chop worker
    pub fn start_chop(&mut self) -> Result<(), AutomationError> {
        let pace = match self.validate_chop() {
            Ok(pace) => pace,
            Err(e) => return self.reject(e),
        };

        let id = WorkerId::next();
        self.flags.chop_slot.claim(id);
        self.flags.set_chop_running(true);
        self.flags.set_stop_all(false);

        let ctx = self.worker_context(id, WorkerKind::Chop);
        match spawn_worker("auto-chop", move || auto_chop::run(ctx, pace)) {
            Ok(handle) => self.chop_worker = Some(RunningWorker { id, handle }),
            Err(e) => {
                self.flags.chop_slot.clear_if(id);
                self.flags.set_chop_running(false);
                return self.reject(e.into());
            }
        }

        self.runtime.chop_button_active = true;
        self.set_status("Preparing to auto-chop...");
        Ok(())
    }

    /// Ask the chop worker to stop; returns immediately
    ///
    /// This also raises stop-all, so a running feed worker stops too.
    pub fn request_chop_stop(&mut self) {
        self.flags.set_chop_running(false);
        self.flags.set_stop_all(true);
        self.set_status("Stopping auto-chop...");
    }

    /// The chop start/stop button
    pub fn toggle_chop(&mut self) -> Result<(), AutomationError> {
        if self.flags.chop_running() {
            self.request_chop_stop();
            Ok(())
        } else {
            self.start_chop()
        }
    }

    /// Stop every worker, wait a bounded time for each, and reset the flags
    ///
    /// A worker still alive after its join timeout is abandoned; it retires
    /// itself on its next check because its slot no longer names it.
    pub fn stop_all_workers(&mut self) -> StopReport {
        let has_worker = self.feed_worker.is_some()
            || self.chop_worker.is_some()
            || self.is_feed_running()
            || self.is_chop_running();

        if !has_worker {
            self.reset_flags();
            self.set_status("No worker thread running");
            return StopReport::default();
        }

        self.flags.set_stop_all(true);
        self.flags.set_chop_running(false);
        self.set_status("Stopping all workers...");

        let timeout = self.timing.join_timeout();
        let mut report = StopReport::default();
        if let Some(worker) = self.feed_worker.take() {
            report.feed = Some(Self::join_worker(worker, "feed", timeout));
        }
        if let Some(worker) = self.chop_worker.take() {
            report.chop = Some(Self::join_worker(worker, "chop", timeout));
        }

        self.reset_flags();
        self.runtime.chop_button_active = false;
        self.set_status("Ready");
        report
    }

    fn join_worker(worker: RunningWorker, label: &str, timeout: Duration) -> JoinOutcome {
        let outcome = join_with_timeout(worker.handle, timeout);
        match outcome {
            JoinOutcome::Joined => debug!("Joined {} worker {}", label, worker.id),
            JoinOutcome::Panicked => warn!("{} worker {} panicked", label, worker.id),
            JoinOutcome::TimedOut => warn!(
                "{} worker {} did not exit within {:?}; abandoning it",
                label, worker.id, timeout
            ),
        }
        outcome
    }

    fn reset_flags(&self) {
        self.flags.feed_slot.reset();
        self.flags.chop_slot.reset();
        self.flags.set_stop_all(false);
        self.flags.set_chop_running(false);
    }

    // ---- readings -------------------------------------------------------

    /// Take one hunger reading now, on the calling thread
    pub fn test_hunger_bar(&mut self) -> Result<HungerCheck, AutomationError> {
        let (region, threshold) = {
            let config = self.config.read();
            (config.hunger_region, config.hunger_threshold)
        };
        let Some(region) = region else {
            return self.reject(AutomationError::HungerRegionMissing);
        };

        match self.sensor.sample(&region) {
            Ok(fraction) => {
                let percent = fraction * 100.0;
                let below_threshold = percent <= threshold;
                self.runtime.current_hunger = HungerDisplay::Percent(percent);
                if self.debug_mode {
                    let side = if below_threshold { "BELOW" } else { "ABOVE" };
                    self.set_status(format!(
                        "Hunger: {:.1}% ({} threshold of {}%)",
                        percent, side, threshold
                    ));
                } else {
                    self.set_status(format!("Hunger detected: {:.1}%", percent));
                }
                Ok(HungerCheck { percent, below_threshold })
            }
            Err(e) => {
                self.runtime.current_hunger = HungerDisplay::Error;
                self.reject(e.into())
            }
        }
    }

    // ---- event pump -----------------------------------------------------

    /// Drain worker events and apply them; call once per UI frame
    pub fn pump_events(&mut self) -> Vec<WorkerEvent> {
        let events: Vec<WorkerEvent> = self.events.try_iter().collect();
        for event in &events {
            match event {
                WorkerEvent::Status { message, .. } => {
                    self.runtime.status_message = message.clone();
                }
                WorkerEvent::HungerReading { percent } => {
                    self.runtime.current_hunger = HungerDisplay::Percent(*percent);
                }
                WorkerEvent::FeedPerformed => {
                    self.runtime.feeds_performed += 1;
                }
                WorkerEvent::ChopFinished { worker } => self.on_chop_finished(*worker),
            }
        }
        self.reap_feed_worker();
        events
    }

    fn on_chop_finished(&mut self, worker: WorkerId) {
        self.flags.chop_slot.clear_if(worker);

        if self.is_chop_running() {
            // A newer chop run owns the toggle
            debug!("Ignoring finish of superseded chop worker {}", worker);
            return;
        }

        if self.chop_worker.as_ref().is_some_and(|w| w.id == worker) {
            // Posting the event is the worker's last action; detach
            self.chop_worker = None;
        }
        self.flags.set_chop_running(false);
        self.runtime.chop_button_active = false;
        self.set_status("Auto-chop idle");
    }

    /// Drop the feed handle once its worker has released the slot
    fn reap_feed_worker(&mut self) {
        let exited = self
            .feed_worker
            .as_ref()
            .is_some_and(|w| !self.flags.feed_slot.is_held_by(w.id) && w.handle.is_finished());
        if exited {
            if let Some(worker) = self.feed_worker.take() {
                Self::join_worker(worker, "feed", self.timing.join_timeout());
            }
        }
    }
}

impl Drop for AutomationCoordinator {
    fn drop(&mut self) {
        // Workers are abandoned at exit; just tell them to stop
        self.flags.set_stop_all(true);
        self.flags.set_chop_running(false);
    }
}

//! Automation state shared between the UI thread and worker threads
//!
//! Write discipline:
//! - `AutomationConfig` is edited only by the coordinator on the UI thread;
//!   workers read it.
//! - `stop_all` and `chop_running` are written only by the coordinator;
//!   workers poll them.
//! - Worker slots have two writers: the coordinator claims and resets them,
//!   a worker clears its own slot on exit. The worker side always uses
//!   compare-and-clear so it cannot wipe a newer worker's claim.
//! - `RuntimeState` is owned by the coordinator and only touched on the UI
//!   thread; workers reach it through the dispatch queue.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::capture::ScreenRegion;
use crate::config::{AutomationDefaults, FeedMode};
use crate::input::ScreenPoint;

/// Configuration record read by the worker routines
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationConfig {
    /// Capture rectangle of the hunger bar
    pub hunger_region: Option<ScreenRegion>,
    /// Feed when observed hunger is at or below this percentage
    pub hunger_threshold: f32,
    pub feed_mode: FeedMode,
    /// Click target of the feed action
    pub feed_trigger: Option<ScreenPoint>,
    pub timer_interval_minutes: f32,
    pub chop_trigger: Option<ScreenPoint>,
    /// Clicks per second
    pub chop_click_rate: f32,
    pub chop_duration_secs: f32,
}

impl AutomationConfig {
    pub fn from_defaults(defaults: &AutomationDefaults) -> Self {
        Self {
            hunger_region: None,
            hunger_threshold: defaults.hunger_threshold,
            feed_mode: defaults.feed_mode,
            feed_trigger: None,
            timer_interval_minutes: defaults.timer_interval_minutes,
            chop_trigger: None,
            chop_click_rate: defaults.chop_click_rate,
            chop_duration_secs: defaults.chop_duration_secs,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self::from_defaults(&AutomationDefaults::default())
    }
}

/// Configuration handle passed to workers at spawn time
pub type SharedConfig = Arc<RwLock<AutomationConfig>>;

/// Identity of one worker lifetime; never reused within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Marks which worker currently owns a routine; 0 means no live worker
#[derive(Debug, Default)]
pub struct WorkerSlot(AtomicU64);

impl WorkerSlot {
    const EMPTY: u64 = 0;

    /// Record `id` as the live worker
    pub fn claim(&self, id: WorkerId) {
        self.0.store(id.get(), Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst) != Self::EMPTY
    }

    /// Whether `id` is still the live worker
    pub fn is_held_by(&self, id: WorkerId) -> bool {
        self.0.load(Ordering::SeqCst) == id.get()
    }

    /// Clear the slot only if it still names `id`; returns whether it did
    pub fn clear_if(&self, id: WorkerId) -> bool {
        self.0
            .compare_exchange(id.get(), Self::EMPTY, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Unconditional reset, used by the coordinator after a bounded join
    pub fn reset(&self) {
        self.0.store(Self::EMPTY, Ordering::SeqCst);
    }
}

/// Which routine family a worker belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Feed,
    Chop,
}

/// Cooperative cancellation flags and worker slots
#[derive(Debug, Default)]
pub struct ControlFlags {
    stop_all: AtomicBool,
    chop_running: AtomicBool,
    pub feed_slot: WorkerSlot,
    pub chop_slot: WorkerSlot,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_all.load(Ordering::SeqCst)
    }

    pub fn set_stop_all(&self, value: bool) {
        self.stop_all.store(value, Ordering::SeqCst);
    }

    pub fn chop_running(&self) -> bool {
        self.chop_running.load(Ordering::SeqCst)
    }

    pub fn set_chop_running(&self, value: bool) {
        self.chop_running.store(value, Ordering::SeqCst);
    }

    pub fn slot(&self, kind: WorkerKind) -> &WorkerSlot {
        match kind {
            WorkerKind::Feed => &self.feed_slot,
            WorkerKind::Chop => &self.chop_slot,
        }
    }

    /// Flags at rest: nothing stopping, nothing running
    pub fn is_at_rest(&self) -> bool {
        !self.stop_requested()
            && !self.chop_running()
            && !self.feed_slot.is_live()
            && !self.chop_slot.is_live()
    }
}

/// Last hunger value shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HungerDisplay {
    #[default]
    Unknown,
    Percent(f32),
    Error,
}

impl HungerDisplay {
    pub fn label(&self) -> String {
        match self {
            HungerDisplay::Unknown => "--".to_string(),
            HungerDisplay::Percent(p) => format!("{:.1}%", p),
            HungerDisplay::Error => "Error".to_string(),
        }
    }
}

/// UI-visible state, mutated on the UI thread only
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// Status bar text
    pub status_message: String,
    pub current_hunger: HungerDisplay,
    /// Label of the chop start/stop toggle
    pub chop_button_active: bool,
    /// Feed clicks performed this session
    pub feeds_performed: u32,
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self {
            status_message: "Ready".to_string(),
            current_hunger: HungerDisplay::Unknown,
            chop_button_active: false,
            feeds_performed: 0,
        }
    }
}

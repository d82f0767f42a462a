//! Shared state and messaging between the UI thread and worker threads
//!
//! This module provides the automation record, the cooperative control
//! flags, and the dispatch queue that carries worker updates to the UI.

pub mod state;
pub mod messages;

pub use state::{
    AutomationConfig, ControlFlags, HungerDisplay, RuntimeState, SharedConfig, WorkerId,
    WorkerKind, WorkerSlot,
};
pub use messages::{StatusLevel, UiDispatcher, WorkerEvent};

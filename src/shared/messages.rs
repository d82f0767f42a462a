//! Worker-to-UI dispatch queue
//!
//! Workers never touch UI-visible state. They post events here and the
//! coordinator applies them when the UI thread drains the queue.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use crate::shared::state::WorkerId;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Messages sent from workers to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// Text for the status bar
    Status { level: StatusLevel, message: String },
    /// Latest hunger reading in percent
    HungerReading { percent: f32 },
    /// A feed click went through
    FeedPerformed,
    /// A chop worker has run its finish path
    ChopFinished { worker: WorkerId },
}

/// Thread-safe handle workers use to post events onto the UI thread
#[derive(Clone)]
pub struct UiDispatcher {
    tx: Sender<WorkerEvent>,
    repaint: Arc<OnceLock<egui::Context>>,
}

impl std::fmt::Debug for UiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDispatcher")
            .field("pending", &self.tx.len())
            .field("repaint", &self.repaint.get().map(|_| "<egui context>"))
            .finish()
    }
}

impl UiDispatcher {
    /// Create a dispatcher and the receiving end drained by the UI thread
    pub fn channel() -> (Self, Receiver<WorkerEvent>) {
        let (tx, rx) = unbounded();
        let dispatcher = Self {
            tx,
            repaint: Arc::new(OnceLock::new()),
        };
        (dispatcher, rx)
    }

    /// Wake this egui context whenever an event is posted
    pub fn attach_repaint(&self, ctx: &egui::Context) {
        let _ = self.repaint.set(ctx.clone());
    }

    fn post(&self, event: WorkerEvent) {
        // The receiver only goes away at shutdown; late events are dropped
        let _ = self.tx.send(event);
        if let Some(ctx) = self.repaint.get() {
            ctx.request_repaint();
        }
    }

    /// Post a status message, also logged at info level
    pub fn post_status(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.post(WorkerEvent::Status {
            level: StatusLevel::Info,
            message,
        });
    }

    /// Post an error status message, also logged at warn level
    pub fn post_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.post(WorkerEvent::Status {
            level: StatusLevel::Error,
            message,
        });
    }

    pub fn post_hunger(&self, percent: f32) {
        self.post(WorkerEvent::HungerReading { percent });
    }

    pub fn post_feed_performed(&self) {
        self.post(WorkerEvent::FeedPerformed);
    }

    pub fn post_chop_finished(&self, worker: WorkerId) {
        self.post(WorkerEvent::ChopFinished { worker });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (dispatcher, rx) = UiDispatcher::channel();
        let worker = WorkerId::next();

        dispatcher.post_status("Hunger monitoring started");
        dispatcher.post_hunger(42.0);
        dispatcher.post_error("Feed failed");
        dispatcher.post_chop_finished(worker);

        let events: Vec<WorkerEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                WorkerEvent::Status {
                    level: StatusLevel::Info,
                    message: "Hunger monitoring started".to_string()
                },
                WorkerEvent::HungerReading { percent: 42.0 },
                WorkerEvent::Status {
                    level: StatusLevel::Error,
                    message: "Feed failed".to_string()
                },
                WorkerEvent::ChopFinished { worker },
            ]
        );
    }

    #[test]
    fn test_post_from_other_thread() {
        let (dispatcher, rx) = UiDispatcher::channel();
        let handle = std::thread::spawn(move || dispatcher.post_feed_performed());
        handle.join().unwrap();
        assert_eq!(rx.try_recv(), Ok(WorkerEvent::FeedPerformed));
    }

    #[test]
    fn test_post_after_receiver_dropped_is_harmless() {
        let (dispatcher, rx) = UiDispatcher::channel();
        drop(rx);
        dispatcher.post_status("late");
    }
}

//! Dashboard view state management

use crate::app::AutomationError;
use crate::overlay::{SelectionOverlay, SelectionTarget};
use crate::shared::AutomationConfig;

/// Current view in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Feed,
    Chop,
    Settings,
}

impl DashboardView {
    pub const ALL: [DashboardView; 3] = [
        DashboardView::Feed,
        DashboardView::Chop,
        DashboardView::Settings,
    ];

    /// Get the display name for this view
    pub fn name(&self) -> &'static str {
        match self {
            DashboardView::Feed => "Auto-Feed",
            DashboardView::Chop => "Auto-Chop",
            DashboardView::Settings => "Settings",
        }
    }

    /// Get the icon character for this view
    pub fn icon(&self) -> &'static str {
        match self {
            DashboardView::Feed => "F",
            DashboardView::Chop => "C",
            DashboardView::Settings => "S",
        }
    }
}

/// Blocking notice shown over the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalNotice {
    pub title: String,
    pub message: String,
}

impl ModalNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&AutomationError> for ModalNotice {
    fn from(error: &AutomationError) -> Self {
        Self::new(error.title(), error.to_string())
    }
}

/// Something a view asks the dashboard to do after rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    /// Open the selection overlay
    Select(SelectionTarget),
    /// Show a blocking notice
    Notice(ModalNotice),
}

/// Parse a numeric text field; None if it is not a finite number
pub fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Text buffers of the feed view's editable fields
#[derive(Debug, Clone, PartialEq)]
pub struct FeedViewState {
    pub interval_text: String,
    pub threshold_text: String,
}

/// Text buffers of the chop view's editable fields
#[derive(Debug, Clone, PartialEq)]
pub struct ChopViewState {
    pub rate_text: String,
    pub duration_text: String,
}

/// All dashboard-local state
pub struct DashboardState {
    pub current_view: DashboardView,
    pub feed: FeedViewState,
    pub chop: ChopViewState,
    /// Active selection overlay, if any
    pub selection: Option<SelectionOverlay>,
    /// Pending modal notice; blocks the rest of the UI while set
    pub notice: Option<ModalNotice>,
}

impl DashboardState {
    pub fn new(config: &AutomationConfig) -> Self {
        Self {
            current_view: DashboardView::default(),
            feed: FeedViewState {
                interval_text: config.timer_interval_minutes.to_string(),
                threshold_text: config.hunger_threshold.to_string(),
            },
            chop: ChopViewState {
                rate_text: config.chop_click_rate.to_string(),
                duration_text: config.chop_duration_secs.to_string(),
            },
            selection: None,
            notice: None,
        }
    }

    /// Queue a view request
    pub fn handle(&mut self, request: UiRequest) {
        match request {
            UiRequest::Select(target) => {
                self.selection = Some(SelectionOverlay::new(target));
            }
            UiRequest::Notice(notice) => self.notice = Some(notice),
        }
    }

    /// Whether regular widgets should accept input
    pub fn is_interactive(&self) -> bool {
        self.notice.is_none() && self.selection.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("-1"), Some(-1.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_state_mirrors_config() {
        let state = DashboardState::new(&AutomationConfig::default());
        assert_eq!(state.current_view, DashboardView::Feed);
        assert_eq!(state.feed.interval_text, "5");
        assert_eq!(state.feed.threshold_text, "10");
        assert_eq!(state.chop.rate_text, "1");
        assert_eq!(state.chop.duration_text, "20");
        assert!(state.is_interactive());
    }

    #[test]
    fn test_requests_block_interaction() {
        let mut state = DashboardState::new(&AutomationConfig::default());

        state.handle(UiRequest::Notice(ModalNotice::from(
            &AutomationError::ChopTriggerMissing,
        )));
        assert!(!state.is_interactive());
        assert_eq!(
            state.notice.as_ref().map(|n| n.title.as_str()),
            Some("Missing Configuration")
        );

        state.notice = None;
        state.handle(UiRequest::Select(SelectionTarget::FeedTrigger));
        assert!(!state.is_interactive());
        assert_eq!(
            state.selection.as_ref().map(|s| s.target()),
            Some(SelectionTarget::FeedTrigger)
        );
    }

    #[test]
    fn test_view_names_unique() {
        let names: std::collections::HashSet<_> =
            DashboardView::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), DashboardView::ALL.len());
    }
}

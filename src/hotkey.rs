//! Global hotkeys for stop-all and the chop toggle

use anyhow::{anyhow, Result};
use global_hotkey::{hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{info, warn};

use crate::config::HotkeyConfig;

/// What a registered hotkey asks the coordinator to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    StopAll,
    ToggleChop,
}

impl HotkeyAction {
    pub fn label(&self) -> &'static str {
        match self {
            HotkeyAction::StopAll => "stop all",
            HotkeyAction::ToggleChop => "toggle auto-chop",
        }
    }
}

/// Parses a hotkey string like "F12", "Ctrl+Shift+S", "Win+F1" into a HotKey
pub fn parse_hotkey(hotkey_str: &str) -> Result<HotKey> {
    let normalized = hotkey_str
        .split('+')
        .map(|part| match part.trim().to_uppercase().as_str() {
            "WIN" | "META" => "SUPER".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("+");

    normalized
        .parse::<HotKey>()
        .map_err(|e| anyhow!("Invalid hotkey '{}': {}", hotkey_str, e))
}

/// Registered hotkey with the action it triggers
struct Binding {
    hotkey: HotKey,
    action: HotkeyAction,
    label: String,
}

/// Owns the OS-level hotkey registrations
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    bindings: Vec<Binding>,
}

impl HotkeyManager {
    /// Create the manager and register every configured hotkey
    ///
    /// A hotkey that fails to parse or register is skipped with a warning.
    pub fn new(config: &HotkeyConfig) -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow!("Failed to create hotkey manager: {:?}", e))?;

        let mut this = Self {
            manager,
            bindings: Vec::new(),
        };
        this.register(config.stop_all.as_deref(), HotkeyAction::StopAll);
        this.register(config.toggle_chop.as_deref(), HotkeyAction::ToggleChop);
        Ok(this)
    }

    fn register(&mut self, hotkey_str: Option<&str>, action: HotkeyAction) {
        let Some(hotkey_str) = hotkey_str else {
            return;
        };

        let hotkey = match parse_hotkey(hotkey_str) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                warn!("Skipping {} hotkey: {}", action.label(), e);
                return;
            }
        };

        match self.manager.register(hotkey) {
            Ok(()) => {
                info!("Registered {} hotkey: {}", action.label(), hotkey_str);
                self.bindings.push(Binding {
                    hotkey,
                    action,
                    label: hotkey_str.to_string(),
                });
            }
            Err(e) => warn!(
                "Failed to register {} hotkey '{}': {:?}",
                action.label(),
                hotkey_str,
                e
            ),
        }
    }

    /// Registered hotkeys as (label, action) pairs
    pub fn registered(&self) -> impl Iterator<Item = (&str, HotkeyAction)> {
        self.bindings.iter().map(|b| (b.label.as_str(), b.action))
    }

    /// Drain pending key presses into actions
    pub fn poll(&self) -> Vec<HotkeyAction> {
        let mut actions = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some(action) = action_for(&self.bindings, event.id) {
                info!("Hotkey pressed: {}", action.label());
                actions.push(action);
            }
        }
        actions
    }
}

fn action_for(bindings: &[Binding], id: u32) -> Option<HotkeyAction> {
    bindings
        .iter()
        .find(|b| b.hotkey.id() == id)
        .map(|b| b.action)
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        for binding in self.bindings.drain(..) {
            let _ = self.manager.unregister(binding.hotkey);
        }
    }
}

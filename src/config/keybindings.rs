use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageKeybindings {
    pub analyze: KeyBinding,
    pub scroll_up: KeyBinding,
    pub scroll_down: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    /// Press the dialog's action button.
    pub activate: KeyBinding,
    /// Hide the dialog without pressing the action button.
    pub dismiss: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub page: PageKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

impl Default for PageKeybindings {
    fn default() -> Self {
        Self {
            analyze: vec![Key::char('a'), Key::new(KeyCode::Enter)].into(),
            scroll_up: vec![Key::char('k'), Key::new(KeyCode::Up)].into(),
            scroll_down: vec![Key::char('j'), Key::new(KeyCode::Down)].into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            activate: vec![Key::new(KeyCode::Enter), Key::char(' ')].into(),
            dismiss: Key::new(KeyCode::Esc).into(),
        }
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::keybindings::KeybindingsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Analyze,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Activate,
    Dismiss,
}

/// Maps key events to the actions configured for them.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Suspend => kb.suspend.matches(event),
        }
    }

    pub fn matches_page(&self, event: &KeyEvent, action: PageAction) -> bool {
        let kb = &self.keybindings.page;
        match action {
            PageAction::Analyze => kb.analyze.matches(event),
            PageAction::ScrollUp => kb.scroll_up.matches(event),
            PageAction::ScrollDown => kb.scroll_down.matches(event),
        }
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Activate => kb.activate.matches(event),
            DialogAction::Dismiss => kb.dismiss.matches(event),
        }
    }

    pub fn display_page(&self, action: PageAction) -> String {
        let kb = &self.keybindings.page;
        match action {
            PageAction::Analyze => kb.analyze.display(),
            PageAction::ScrollUp => kb.scroll_up.display(),
            PageAction::ScrollDown => kb.scroll_down.display(),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Suspend => kb.suspend.display(),
        }
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Activate => kb.activate.display(),
            DialogAction::Dismiss => kb.dismiss.display(),
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_dialog_bindings() {
        let resolver = KeyResolver::default();
        assert!(resolver.matches_dialog(&key(KeyCode::Enter), DialogAction::Activate));
        assert!(resolver.matches_dialog(&key(KeyCode::Char(' ')), DialogAction::Activate));
        assert!(resolver.matches_dialog(&key(KeyCode::Esc), DialogAction::Dismiss));
        assert!(!resolver.matches_dialog(&key(KeyCode::Esc), DialogAction::Activate));
    }

    #[test]
    fn test_default_global_bindings() {
        let resolver = KeyResolver::default();
        assert!(resolver.matches_global(&key(KeyCode::Char('q')), GlobalAction::Quit));
        assert!(resolver.matches_global(
            &KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL),
            GlobalAction::Suspend
        ));
        assert_eq!(resolver.display_global(GlobalAction::Suspend), "ctrl+z");
        assert_eq!(resolver.display_page(PageAction::ScrollDown), "j/Down");
    }
}

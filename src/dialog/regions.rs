//! The three content regions of the analysis dialog.

use crate::ui::Spinner;

/// Heading rendered in the dialog border.
pub struct TitleRegion {
    text: String,
}

impl TitleRegion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// What the body region currently shows.
pub enum BodyContent {
    Empty,
    Loading(Spinner),
    Paragraphs(Vec<String>),
}

impl BodyContent {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    pub fn paragraphs(&self) -> &[String] {
        match self {
            Self::Paragraphs(paragraphs) => paragraphs,
            Self::Empty | Self::Loading(_) => &[],
        }
    }
}

pub struct BodyRegion {
    content: BodyContent,
}

impl BodyRegion {
    pub fn new(paragraphs: Vec<String>) -> Self {
        let content = if paragraphs.is_empty() {
            BodyContent::Empty
        } else {
            BodyContent::Paragraphs(paragraphs)
        };
        Self { content }
    }

    pub const fn content(&self) -> &BodyContent {
        &self.content
    }

    pub const fn content_mut(&mut self) -> &mut BodyContent {
        &mut self.content
    }

    /// Replace everything in the body.
    pub fn set_content(&mut self, content: BodyContent) {
        self.content = content;
    }
}

/// Identifies a listener attached to an [`ActionButton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a click listener asks of the dialog once it has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerOutcome {
    Continue,
    CloseDialog,
}

pub type Listener = Box<dyn FnMut() -> ListenerOutcome>;

/// Clickable button at the bottom of the dialog.
pub struct ActionButton {
    id: String,
    label: String,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl ActionButton {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn add_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run every attached listener in attachment order.
    pub fn click(&mut self) -> Vec<ListenerOutcome> {
        self.listeners
            .iter_mut()
            .map(|(_, listener)| listener())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_click_runs_listeners_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut button = ActionButton::new("action", "Close");

        let first = Rc::clone(&calls);
        button.add_listener(Box::new(move || {
            first.borrow_mut().push("first");
            ListenerOutcome::Continue
        }));
        let second = Rc::clone(&calls);
        button.add_listener(Box::new(move || {
            second.borrow_mut().push("second");
            ListenerOutcome::CloseDialog
        }));

        let outcomes = button.click();
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
        assert_eq!(
            outcomes,
            vec![ListenerOutcome::Continue, ListenerOutcome::CloseDialog]
        );
    }

    #[test]
    fn test_remove_listener() {
        let mut button = ActionButton::new("action", "Close");
        let id = button.add_listener(Box::new(|| ListenerOutcome::Continue));
        assert_eq!(button.listener_count(), 1);
        assert!(button.remove_listener(id));
        assert!(!button.remove_listener(id));
        assert_eq!(button.listener_count(), 0);
        assert!(button.click().is_empty());
    }

    #[test]
    fn test_body_region_starts_empty_without_markup() {
        let body = BodyRegion::new(Vec::new());
        assert!(matches!(body.content(), BodyContent::Empty));

        let body = BodyRegion::new(vec!["Hello".to_string()]);
        assert_eq!(body.content().paragraphs(), ["Hello".to_string()]);
    }
}

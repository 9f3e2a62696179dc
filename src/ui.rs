pub mod components;
pub mod widgets;

mod history;
mod status_bar;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{TextInput, TextInputEvent};
pub use history::{HistoryEntry, HistoryView};
pub use status_bar::StatusBar;
pub use widgets::Spinner;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled but produced no message, the input will not be propagated further
/// - `Event(E)` - The input was handled and produced a message, the input will not be propagated further
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> EventResult<E> {
    /// Returns true if the input was consumed (either with or without an event).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components handle input events and emit generic outputs. They know
/// nothing about analyses.
///
/// # Examples
///
/// - `TextInput` - Single-line URL prompt
/// - `HistoryView` - Scrollable list of finished analyses
/// - `DialogController` - The analysis dialog overlay
pub trait Component {
    /// The output type produced by this component.
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ok(EventResult::...)` where:
    /// - `Ignored` - key was not handled, parent should process it
    /// - `Consumed` - key was handled but produced no output
    /// - `Event(output)` - key was handled and produced an output
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

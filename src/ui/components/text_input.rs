use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    Submitted(String),
    Cancelled,
}

/// Single-line input popup. The cursor counts characters, not bytes.
pub struct TextInput {
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor);
        self.value.insert(index, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.char_count() {
            let index = self.byte_index(self.cursor);
            self.value.remove(index);
        }
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.trim().to_string()).into(),
            (KeyCode::Esc, _) => TextInputEvent::Cancelled.into(),

            (KeyCode::Backspace, _) => {
                self.delete_char_before_cursor();
                EventResult::Consumed
            }
            (KeyCode::Delete, _) => {
                self.delete_char_at_cursor();
                EventResult::Consumed
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_count();
                EventResult::Consumed
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear_line();
                EventResult::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                EventResult::Consumed
            }

            _ => EventResult::Consumed, // Consume all keys to prevent propagation
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(50), Constraint::Length(3));
        frame.render_widget(Clear, popup_area);

        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        let line = match &self.placeholder {
            Some(placeholder) if self.value.is_empty() => Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled(placeholder.clone(), Style::default().fg(theme.overlay0())),
            ]),
            _ => {
                let split = self.byte_index(self.cursor);
                let (before, after) = self.value.split_at(split);
                let mut rest = after.chars();
                let under_cursor = rest.next().unwrap_or(' ');
                Line::from(vec![
                    Span::styled(before.to_string(), input_style),
                    Span::styled(under_cursor.to_string(), cursor_style),
                    Span::styled(rest.collect::<String>(), input_style),
                ])
            }
        };

        let block = Block::default()
            .title(format!(" {} (Enter to confirm, Esc to cancel) ", self.label))
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.lavender()))
            .style(Style::default().bg(theme.base()));

        frame.render_widget(Paragraph::new(line).block(block), popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut TextInput, code: KeyCode) -> EventResult<TextInputEvent> {
        input
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_submit_trims_value() {
        let mut input = TextInput::new("URL");
        type_str(&mut input, " https://example.com ");
        assert_eq!(
            press(&mut input, KeyCode::Enter),
            EventResult::Event(TextInputEvent::Submitted("https://example.com".to_string()))
        );
    }

    #[test]
    fn test_editing_handles_multibyte_chars() {
        let mut input = TextInput::new("URL");
        type_str(&mut input, "héllo");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "hllo");
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "hlo");
        press(&mut input, KeyCode::End);
        type_str(&mut input, "ü");
        assert_eq!(input.value(), "hloü");
    }

    #[test]
    fn test_escape_cancels() {
        let mut input = TextInput::new("URL");
        assert_eq!(
            press(&mut input, KeyCode::Esc),
            EventResult::Event(TextInputEvent::Cancelled)
        );
    }
}

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, PageAction};
use crate::dialog::ScrollLock;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Completed(String),
    Failed { url: String, code: Option<u16> },
    Aborted(String),
}

/// The page behind the dialog: a scrollable log of past analyses.
///
/// Scrolling is ignored while the page's [`ScrollLock`] is held.
pub struct HistoryView {
    entries: Vec<HistoryEntry>,
    offset: usize,
    scroll_lock: ScrollLock,
    resolver: Arc<KeyResolver>,
}

impl HistoryView {
    pub const fn new(scroll_lock: ScrollLock, resolver: Arc<KeyResolver>) -> Self {
        Self {
            entries: Vec::new(),
            offset: 0,
            scroll_lock,
            resolver,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn entry_line(entry: &HistoryEntry, theme: &Theme) -> Line<'static> {
        let (icon, color, text) = match entry {
            HistoryEntry::Completed(url) => ("✓", theme.green(), url.clone()),
            HistoryEntry::Failed { url, code: Some(code) } => {
                ("✗", theme.red(), format!("{url} ({code})"))
            }
            HistoryEntry::Failed { url, code: None } => ("✗", theme.red(), url.clone()),
            HistoryEntry::Aborted(url) => ("-", theme.overlay1(), url.clone()),
        };
        Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(text, Style::default().fg(theme.text())),
        ])
    }
}

impl Component for HistoryView {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let up = self.resolver.matches_page(&key, PageAction::ScrollUp);
        let down = self.resolver.matches_page(&key, PageAction::ScrollDown);
        if !up && !down {
            return Ok(EventResult::Ignored);
        }
        if self.scroll_lock.is_locked() {
            return Ok(EventResult::Consumed);
        }

        let last = self.entries.len().saturating_sub(1);
        self.offset = if up {
            self.offset.saturating_sub(1)
        } else {
            (self.offset + 1).min(last)
        };
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Analyses ")
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.surface1()));

        let lines: Vec<Line> = if self.entries.is_empty() {
            vec![Line::from(Span::styled(
                format!(
                    " Press {} to analyse a page",
                    self.resolver.display_page(PageAction::Analyze)
                ),
                Style::default().fg(theme.overlay1()),
            ))]
        } else {
            self.entries
                .iter()
                .skip(self.offset)
                .map(|entry| Self::entry_line(entry, theme))
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn view(lock: &ScrollLock) -> HistoryView {
        let mut view = HistoryView::new(lock.clone(), Arc::new(KeyResolver::default()));
        for i in 0..3 {
            view.push(HistoryEntry::Completed(format!("https://{i}.example")));
        }
        view
    }

    fn press(view: &mut HistoryView, c: char) -> EventResult<()> {
        view.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_scroll_is_clamped() {
        let lock = ScrollLock::new();
        let mut view = view(&lock);

        press(&mut view, 'k');
        assert_eq!(view.offset(), 0);
        for _ in 0..5 {
            press(&mut view, 'j');
        }
        assert_eq!(view.offset(), 2);
    }

    #[test]
    fn test_scroll_lock_freezes_offset() {
        let lock = ScrollLock::new();
        let mut view = view(&lock);

        lock.lock();
        assert_eq!(press(&mut view, 'j'), EventResult::Consumed);
        assert_eq!(view.offset(), 0);

        lock.unlock();
        press(&mut view, 'j');
        assert_eq!(view.offset(), 1);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let lock = ScrollLock::new();
        let mut view = view(&lock);
        assert_eq!(press(&mut view, 'x'), EventResult::Ignored);
    }
}

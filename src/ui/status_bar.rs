use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::{DialogAction, GlobalAction, KeyResolver, PageAction};

/// One-line keybinding hints at the bottom of the screen.
pub struct StatusBar {
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { resolver }
    }

    fn hints(&self, dialog_open: bool) -> Vec<(String, &'static str)> {
        let r = &self.resolver;
        if dialog_open {
            vec![
                (r.display_dialog(DialogAction::Activate), "press button"),
                (r.display_dialog(DialogAction::Dismiss), "hide"),
            ]
        } else {
            vec![
                (r.display_page(PageAction::Analyze), "analyse"),
                (r.display_page(PageAction::ScrollDown), "down"),
                (r.display_page(PageAction::ScrollUp), "up"),
                (r.display_global(GlobalAction::Suspend), "suspend"),
                (r.display_global(GlobalAction::Quit), "quit"),
            ]
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, dialog_open: bool) {
        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.overlay1());

        let spans: Vec<Span> = self
            .hints(dialog_open)
            .into_iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(format!(" <{key}>"), key_style),
                    Span::styled(format!(" {desc} "), desc_style),
                ]
            })
            .collect();

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

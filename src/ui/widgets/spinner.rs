use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::Theme;
use crate::ui::Component;

/// Loading indicator shown while an analysis runs.
pub struct Spinner {
    throbber_state: ThrobberState,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            throbber_state: ThrobberState::default(),
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Spinner {
    type Output = ();

    fn handle_tick(&mut self) {
        self.throbber_state.calc_next();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.lavender()))
            .style(Style::default().fg(theme.subtext1()));

        // The throbber itself uses 1-character width
        let area = area.centered(Constraint::Length(1), Constraint::Length(1));

        frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
    }
}

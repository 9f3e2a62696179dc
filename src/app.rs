use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::Theme;
use crate::analysis::{AnalysisApi, AnalysisOutcome, SimulatedAnalysis};
use crate::catalog::ErrorCatalog;
use crate::config::{AppConfig, GlobalAction, KeyResolver, PageAction};
use crate::dialog::{DialogController, Document};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, EventResult, HistoryEntry, HistoryView, Result, StatusBar, TextInput,
    TextInputEvent,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

enum Step {
    Event(Option<Event>),
    Outcome(AnalysisOutcome),
}

pub struct App {
    controller: DialogController,
    history: HistoryView,
    prompt: Option<TextInput>,
    status_bar: StatusBar,
    api: Arc<dyn AnalysisApi>,
    outcome_rx: UnboundedReceiver<AnalysisOutcome>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    in_flight: Option<String>,
    initial_url: Option<String>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(config: &AppConfig, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let api = Arc::new(SimulatedAnalysis::new(config.analysis.clone(), outcome_tx));
        Self::with_backend(config, resolver, theme, api, outcome_rx)
    }

    pub fn with_backend(
        config: &AppConfig,
        resolver: Arc<KeyResolver>,
        theme: Theme,
        api: Arc<dyn AnalysisApi>,
        outcome_rx: UnboundedReceiver<AnalysisOutcome>,
    ) -> Self {
        let messages = Arc::new(config.messages.clone());
        let catalog = Arc::new(ErrorCatalog::from_messages(&messages));
        let mut document = Document::new().with_surface(config.dialog.markup());

        let mut controller = DialogController::new(
            messages,
            catalog,
            Arc::clone(&api),
            Arc::clone(&resolver),
        );
        if controller.init(&mut document, &config.dialog).is_err() {
            warn!("Continuing without the analysis dialog");
        }

        Self {
            controller,
            history: HistoryView::new(document.scroll_lock(), Arc::clone(&resolver)),
            prompt: None,
            status_bar: StatusBar::new(Arc::clone(&resolver)),
            api,
            outcome_rx,
            resolver,
            theme,
            in_flight: None,
            initial_url: None,
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Analyse `url` as soon as the terminal is ready.
    pub fn analyse_on_start(&mut self, url: impl Into<String>) {
        self.initial_url = Some(url.into());
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            let step = tokio::select! {
                event = tui.next_event() => Step::Event(event),
                Some(outcome) = self.outcome_rx.recv() => Step::Outcome(outcome),
            };
            match step {
                Step::Event(Some(event)) => self.handle_event(&mut tui, event)?,
                Step::Event(None) => break,
                Step::Outcome(outcome) => self.handle_outcome(outcome),
            }

            if self.should_suspend {
                tui.suspend()?;
                self.should_suspend = false;
                tui.enter()?;
                tui.clear()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Init => {
                if let Some(url) = self.initial_url.take() {
                    self.start_analysis(&url);
                }
            }
            Event::Quit => self.should_quit = true,
            Event::Error(message) => warn!(%message, "Terminal error"),
            Event::Tick => self.controller.handle_tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key)?,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
            return Ok(());
        }

        if self.controller.handle_key(key)?.is_consumed() {
            return Ok(());
        }

        if let Some(prompt) = &mut self.prompt {
            match prompt.handle_key(key)? {
                EventResult::Event(TextInputEvent::Submitted(url)) => {
                    self.prompt = None;
                    if !url.is_empty() {
                        self.start_analysis(&url);
                    }
                }
                EventResult::Event(TextInputEvent::Cancelled) => self.prompt = None,
                EventResult::Consumed | EventResult::Ignored => {}
            }
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_page(&key, PageAction::Analyze) {
            self.prompt = Some(TextInput::new("Page URL").with_placeholder("https://"));
        } else {
            self.history.handle_key(key)?;
        }
        Ok(())
    }

    fn start_analysis(&mut self, url: &str) {
        self.api.start_analysis(url);
        self.in_flight = Some(url.to_string());
        if !self.controller.open_pending_analysis(url) {
            debug!("Analysis dialog unavailable");
        }
    }

    fn handle_outcome(&mut self, outcome: AnalysisOutcome) {
        let url = match &outcome {
            AnalysisOutcome::Completed { url }
            | AnalysisOutcome::Failed { url, .. }
            | AnalysisOutcome::Aborted { url } => url.clone(),
        };
        let current = self.in_flight.as_deref() == Some(url.as_str());
        if current {
            self.in_flight = None;
        }

        match outcome {
            AnalysisOutcome::Completed { url } => {
                info!(%url, "Analysis completed");
                if current {
                    self.controller.close();
                }
                self.history.push(HistoryEntry::Completed(url));
            }
            AnalysisOutcome::Failed { url, code, details } => {
                info!(%url, ?code, "Analysis failed");
                if current {
                    self.controller.open_error_message(code, details);
                }
                self.history.push(HistoryEntry::Failed { url, code });
            }
            AnalysisOutcome::Aborted { url } => {
                info!(%url, "Analysis aborted");
                self.history.push(HistoryEntry::Aborted(url));
            }
        }
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let area = frame.area();
            let [main, status] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

            self.history.render(frame, main, &self.theme);
            self.status_bar
                .render(frame, status, &self.theme, self.controller.is_visible());
            if let Some(prompt) = &mut self.prompt {
                prompt.render(frame, main, &self.theme);
            }
            self.controller.render(frame, area, &self.theme);
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::template::Details;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AnalysisApi for RecordingApi {
        fn start_analysis(&self, url: &str) {
            self.calls.lock().unwrap().push(format!("start {url}"));
        }

        fn abort_analysis(&self) {
            self.calls.lock().unwrap().push("abort".to_string());
        }
    }

    fn app() -> (App, Arc<RecordingApi>) {
        let api = Arc::new(RecordingApi::default());
        let (_tx, rx) = mpsc::unbounded_channel();
        let app = App::with_backend(
            &AppConfig::default(),
            Arc::new(KeyResolver::default()),
            Theme::default(),
            api.clone(),
            rx,
        );
        (app, api)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_url(app: &mut App, url: &str) {
        press(app, KeyCode::Char('a'));
        for c in url.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_submitting_url_opens_pending_dialog() {
        let (mut app, api) = app();
        type_url(&mut app, "https://example.com");

        assert_eq!(api.calls(), vec!["start https://example.com"]);
        assert!(app.controller.is_visible());
        assert!(app.prompt.is_none());
        assert!(app.controller.body().unwrap().is_loading());
    }

    #[test]
    fn test_typing_q_in_prompt_does_not_quit() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_cancel_button_aborts_once() {
        let (mut app, api) = app();
        type_url(&mut app, "https://one.example");
        app.controller.close();
        type_url(&mut app, "https://two.example");

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            api.calls(),
            vec!["start https://one.example", "start https://two.example", "abort"]
        );
        assert!(!app.controller.is_visible());
    }

    #[test]
    fn test_failure_shows_error_dialog() {
        let (mut app, _) = app();
        type_url(&mut app, "https://example.com");

        app.handle_outcome(AnalysisOutcome::Failed {
            url: "https://example.com".to_string(),
            code: Some(429),
            details: Some(
                Details::new()
                    .with("daily_limit_per_host", "10")
                    .with("host", "example.com"),
            ),
        });

        assert!(app.controller.is_visible());
        let paragraphs = app.controller.body().unwrap().paragraphs();
        assert!(paragraphs[1].contains("10 analyses per day for example.com"));
        assert_eq!(
            app.history.entries(),
            [HistoryEntry::Failed {
                url: "https://example.com".to_string(),
                code: Some(429)
            }]
        );
    }

    #[test]
    fn test_completion_closes_dialog() {
        let (mut app, _) = app();
        type_url(&mut app, "https://example.com");
        app.handle_outcome(AnalysisOutcome::Completed {
            url: "https://example.com".to_string(),
        });
        assert!(!app.controller.is_visible());
        assert!(app.in_flight.is_none());
    }

    #[test]
    fn test_stale_outcome_leaves_dialog_alone() {
        let (mut app, _) = app();
        type_url(&mut app, "https://one.example");
        app.controller.close();
        type_url(&mut app, "https://two.example");

        app.handle_outcome(AnalysisOutcome::Completed {
            url: "https://one.example".to_string(),
        });
        assert!(app.controller.is_visible());
        assert_eq!(app.in_flight.as_deref(), Some("https://two.example"));
    }
}

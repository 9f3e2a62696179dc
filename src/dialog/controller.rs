use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::{debug, error, warn};

use crate::Theme;
use crate::analysis::AnalysisApi;
use crate::catalog::ErrorCatalog;
use crate::config::{DialogAction, KeyResolver, Messages};
use crate::dialog::document::{DialogHandle, Document, SurfaceLayout};
use crate::dialog::primitive::DialogLifecycle;
use crate::dialog::regions::{
    ActionButton, BodyContent, BodyRegion, Listener, ListenerId, ListenerOutcome,
};
use crate::template::{Details, replace_key_in};
use crate::ui::{Component, EventResult, Result, Spinner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
}

/// What the dialog was last asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVariant {
    Pending {
        url: String,
    },
    Error {
        code: Option<u16>,
        details: Option<Details>,
    },
}

/// The listener this controller attached to the action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub target: String,
    pub listener: ListenerId,
}

/// Presents a running analysis, or why it failed, in a modal dialog.
///
/// The controller does nothing until [`init`](Self::init) binds it to a
/// dialog surface. Until then every operation logs and returns `false`.
pub struct DialogController {
    messages: Arc<Messages>,
    catalog: Arc<ErrorCatalog>,
    api: Arc<dyn AnalysisApi>,
    resolver: Arc<KeyResolver>,
    handle: Option<DialogHandle>,
    content: Option<ContentVariant>,
    binding: Option<ActionBinding>,
}

fn ready(handle: &mut Option<DialogHandle>) -> Option<&mut DialogHandle> {
    if handle.is_none() {
        error!("Analysis dialog not initialized");
    }
    handle.as_mut()
}

/// Detach the previous listener, if any, and attach `listener`.
fn rebind(button: &mut ActionButton, binding: &mut Option<ActionBinding>, listener: Listener) {
    if let Some(previous) = binding.take() {
        if previous.target != button.id() {
            warn!(target_id = %previous.target, "Previous action listener bound elsewhere");
        } else if !button.remove_listener(previous.listener) {
            warn!("Previous action listener was already detached");
        }
    }
    let listener = button.add_listener(listener);
    *binding = Some(ActionBinding {
        target: button.id().to_string(),
        listener,
    });
}

impl DialogController {
    pub fn new(
        messages: Arc<Messages>,
        catalog: Arc<ErrorCatalog>,
        api: Arc<dyn AnalysisApi>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            messages,
            catalog,
            api,
            resolver,
            handle: None,
            content: None,
            binding: None,
        }
    }

    /// Bind to the surface described by `layout` and take it out of the page.
    ///
    /// Showing the dialog locks the page's scrolling, hiding it unlocks it.
    /// Binding twice keeps the first surface.
    pub fn init(&mut self, document: &mut Document, layout: &SurfaceLayout) -> color_eyre::Result<()> {
        if let Some(handle) = &self.handle {
            warn!(
                bound = handle.dialog.id(),
                requested = %layout.surface_id,
                "Analysis dialog already initialized, ignoring"
            );
            return Ok(());
        }

        let mut handle = document.take_surface(layout).inspect_err(|err| {
            error!(%err, "Failed to initialize analysis dialog");
        })?;

        let (lock, unlock) = (document.scroll_lock(), document.scroll_lock());
        handle
            .dialog
            .on(DialogLifecycle::Show, move || lock.lock())
            .on(DialogLifecycle::Hide, move || unlock.unlock());

        debug!(surface = %layout.surface_id, "Analysis dialog initialized");
        self.handle = Some(handle);
        Ok(())
    }

    pub const fn state(&self) -> ControllerState {
        if self.handle.is_some() {
            ControllerState::Ready
        } else {
            ControllerState::Uninitialized
        }
    }

    /// Show a spinner for `url`; the action button aborts the analysis.
    pub fn open_pending_analysis(&mut self, url: &str) -> bool {
        let Some(handle) = ready(&mut self.handle) else {
            return false;
        };

        handle.title.set_text(replace_key_in(
            &self.messages.analysis_in_progress_for,
            "URL",
            url,
        ));
        handle
            .body
            .set_content(BodyContent::Loading(Spinner::new()));
        handle.action.set_label(&self.messages.cancel_analysis);

        let api = Arc::clone(&self.api);
        rebind(
            &mut handle.action,
            &mut self.binding,
            Box::new(move || {
                api.abort_analysis();
                ListenerOutcome::CloseDialog
            }),
        );

        self.content = Some(ContentVariant::Pending {
            url: url.to_string(),
        });
        handle.dialog.show();
        true
    }

    /// Show why the analysis failed; the action button closes the dialog.
    pub fn open_error_message(&mut self, code: Option<u16>, details: Option<Details>) -> bool {
        let Some(handle) = ready(&mut self.handle) else {
            return false;
        };

        handle.title.set_text(&self.messages.analysis_error_title);
        let message = self.catalog.resolve(code, details.as_ref());
        handle.body.set_content(BodyContent::Paragraphs(vec![
            self.messages.analysis_error_intro.clone(),
            message,
        ]));
        handle.action.set_label(&self.messages.close);
        rebind(
            &mut handle.action,
            &mut self.binding,
            Box::new(|| ListenerOutcome::CloseDialog),
        );

        self.content = Some(ContentVariant::Error { code, details });
        handle.dialog.show();
        true
    }

    /// Hide the dialog. The rendered content stays as it is.
    pub fn close(&mut self) -> bool {
        let Some(handle) = ready(&mut self.handle) else {
            return false;
        };
        handle.dialog.hide();
        true
    }

    /// Show the dialog again with whatever it last rendered.
    pub fn show(&mut self) -> bool {
        let Some(handle) = ready(&mut self.handle) else {
            return false;
        };
        handle.dialog.show();
        true
    }

    /// Press the action button.
    pub fn click_action(&mut self) -> bool {
        let Some(handle) = ready(&mut self.handle) else {
            return false;
        };
        let outcomes = handle.action.click();
        if outcomes.contains(&ListenerOutcome::CloseDialog) {
            handle.dialog.hide();
        }
        true
    }

    pub fn is_visible(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.dialog.is_visible())
    }

    pub const fn content(&self) -> Option<&ContentVariant> {
        self.content.as_ref()
    }

    pub const fn binding(&self) -> Option<&ActionBinding> {
        self.binding.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.title.text())
    }

    pub fn body(&self) -> Option<&BodyContent> {
        self.handle.as_ref().map(|h| h.body.content())
    }

    pub fn action_label(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.action.label())
    }

    pub fn action_listener_count(&self) -> usize {
        self.handle
            .as_ref()
            .map_or(0, |h| h.action.listener_count())
    }
}

fn render_body(frame: &mut Frame, area: Rect, body: &mut BodyRegion, theme: &Theme) {
    match body.content_mut() {
        BodyContent::Empty => {}
        BodyContent::Loading(spinner) => spinner.render(frame, area, theme),
        BodyContent::Paragraphs(paragraphs) => {
            let text_style = Style::default().fg(theme.text());
            let mut lines = Vec::with_capacity(paragraphs.len() * 2);
            for (i, paragraph) in paragraphs.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(paragraph.clone(), text_style)));
            }
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
    }
}

impl Component for DialogController {
    type Output = ();

    /// Traps focus while visible: every key is consumed.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.is_visible() {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_dialog(&key, DialogAction::Activate) {
            self.click_action();
        } else if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            self.close();
        }
        Ok(EventResult::Consumed)
    }

    fn handle_tick(&mut self) {
        if let Some(BodyContent::Loading(spinner)) =
            self.handle.as_mut().map(|h| h.body.content_mut())
        {
            spinner.handle_tick();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if !handle.dialog.is_visible() {
            return;
        }

        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Length(10));
        frame.render_widget(Clear, popup_area);

        let is_error = matches!(self.content, Some(ContentVariant::Error { .. }));
        let accent = if is_error { theme.red() } else { theme.mauve() };

        let block = Block::default()
            .title(format!(" {} ", handle.title.text()))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.base()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [body_area, action_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        render_body(frame, body_area, &mut handle.body, theme);

        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default()
            .fg(theme.text())
            .bg(theme.surface1())
            .add_modifier(Modifier::BOLD);
        let action = Line::from(vec![
            Span::styled(
                format!("[{}]", self.resolver.display_dialog(DialogAction::Activate)),
                key_style,
            ),
            Span::raw(" "),
            Span::styled(format!(" {} ", handle.action.label()), label_style),
        ]);
        frame.render_widget(
            Paragraph::new(action).alignment(Alignment::Center),
            action_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::catalog::ErrorCode;
    use crate::dialog::document::SurfaceMarkup;

    #[derive(Default)]
    struct RecordingApi {
        aborts: AtomicUsize,
    }

    impl AnalysisApi for RecordingApi {
        fn start_analysis(&self, _url: &str) {}

        fn abort_analysis(&self) {
            self.aborts.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn messages() -> Messages {
        Messages {
            analysis_in_progress_for: "Analysing {{URL}}".to_string(),
            cancel_analysis: "Cancel".to_string(),
            analysis_error_title: "Analysis failed".to_string(),
            analysis_error_intro: "Sorry.".to_string(),
            analysis_error_default_message: "Unknown error".to_string(),
            close: "Close".to_string(),
            ..Messages::default()
        }
    }

    fn catalog() -> ErrorCatalog {
        ErrorCatalog::new(
            [
                (ErrorCode::TooManyRequests, "Limit reached for {{HOST}}".to_string()),
                (ErrorCode::GatewayTimeout, "Timed out".to_string()),
            ],
            "Unknown error",
        )
    }

    fn controller(api: &Arc<RecordingApi>) -> DialogController {
        let api: Arc<dyn AnalysisApi> = api.clone();
        DialogController::new(
            Arc::new(messages()),
            Arc::new(catalog()),
            api,
            Arc::new(KeyResolver::default()),
        )
    }

    fn document() -> Document {
        Document::new().with_surface(SurfaceLayout::default().markup())
    }

    fn ready_controller(api: &Arc<RecordingApi>) -> (DialogController, Document) {
        let mut document = document();
        let mut controller = controller(api);
        controller
            .init(&mut document, &SurfaceLayout::default())
            .unwrap();
        (controller, document)
    }

    #[test]
    fn test_operations_before_init_return_false() {
        let api = Arc::new(RecordingApi::default());
        let mut controller = controller(&api);

        assert_eq!(controller.state(), ControllerState::Uninitialized);
        assert!(!controller.open_pending_analysis("https://example.com"));
        assert!(!controller.open_error_message(Some(429), None));
        assert!(!controller.close());
        assert!(!controller.show());
        assert!(!controller.click_action());

        assert!(controller.content().is_none());
        assert!(controller.binding().is_none());
        assert!(controller.title().is_none());
        assert!(!controller.is_visible());
        assert_eq!(api.aborts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_init_leaves_controller_inert() {
        let api = Arc::new(RecordingApi::default());
        let mut controller = controller(&api);
        let mut document = Document::new()
            .with_surface(SurfaceMarkup::new("analysis-dialog").heading("title", ""));

        assert!(
            controller
                .init(&mut document, &SurfaceLayout::default())
                .is_err()
        );
        assert_eq!(controller.state(), ControllerState::Uninitialized);
        assert!(!controller.open_pending_analysis("https://example.com"));
        assert!(document.surface("analysis-dialog").is_some());
    }

    #[test]
    fn test_second_init_keeps_first_surface() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);
        let mut other = document();

        assert!(
            controller
                .init(&mut other, &SurfaceLayout::default())
                .is_ok()
        );
        assert!(other.surface("analysis-dialog").is_some());
        assert_eq!(controller.state(), ControllerState::Ready);
    }

    #[test]
    fn test_open_pending_renders_spinner_and_cancel() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, document) = ready_controller(&api);

        assert!(controller.open_pending_analysis("https://example.com"));
        assert!(controller.is_visible());
        assert!(document.scroll_lock().is_locked());
        assert_eq!(controller.title(), Some("Analysing https://example.com"));
        assert!(controller.body().unwrap().is_loading());
        assert_eq!(controller.action_label(), Some("Cancel"));
        assert_eq!(
            controller.content(),
            Some(&ContentVariant::Pending {
                url: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_cancel_aborts_then_closes() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, document) = ready_controller(&api);

        controller.open_pending_analysis("https://example.com");
        assert!(controller.click_action());

        assert_eq!(api.aborts.load(Ordering::SeqCst), 1);
        assert!(!controller.is_visible());
        assert!(!document.scroll_lock().is_locked());
    }

    #[test]
    fn test_repeated_pending_keeps_a_single_listener() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);

        controller.open_pending_analysis("https://one.example");
        controller.open_pending_analysis("https://two.example");
        assert_eq!(controller.action_listener_count(), 1);

        controller.click_action();
        assert_eq!(api.aborts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_after_pending_replaces_everything() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);

        controller.open_pending_analysis("https://example.com");
        let details = Details::new().with("HOST", "example.com");
        assert!(controller.open_error_message(Some(429), Some(details.clone())));

        assert_eq!(controller.title(), Some("Analysis failed"));
        let body = controller.body().unwrap();
        assert!(!body.is_loading());
        assert_eq!(
            body.paragraphs(),
            ["Sorry.".to_string(), "Limit reached for example.com".to_string()]
        );
        assert_eq!(controller.action_label(), Some("Close"));
        assert_eq!(controller.action_listener_count(), 1);
        assert_eq!(
            controller.content(),
            Some(&ContentVariant::Error {
                code: Some(429),
                details: Some(details)
            })
        );

        // Closing must not abort: the pending listener is gone.
        controller.click_action();
        assert_eq!(api.aborts.load(Ordering::SeqCst), 0);
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_error_without_code_uses_default_message() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);

        controller.open_error_message(None, None);
        assert_eq!(
            controller.body().unwrap().paragraphs()[1],
            "Unknown error".to_string()
        );

        controller.open_error_message(Some(418), None);
        assert_eq!(
            controller.body().unwrap().paragraphs()[1],
            "Unknown error".to_string()
        );
    }

    #[test]
    fn test_close_keeps_last_content() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);

        controller.open_error_message(Some(504), None);
        assert!(controller.close());
        assert!(!controller.is_visible());
        assert!(matches!(
            controller.content(),
            Some(ContentVariant::Error { code: Some(504), .. })
        ));

        assert!(controller.show());
        assert!(controller.is_visible());
        assert_eq!(controller.title(), Some("Analysis failed"));
        assert_eq!(
            controller.body().unwrap().paragraphs()[1],
            "Timed out".to_string()
        );
    }

    #[test]
    fn test_keys_are_trapped_while_visible() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            controller.handle_key(key(KeyCode::Char('x'))).unwrap(),
            EventResult::Ignored
        );

        controller.open_pending_analysis("https://example.com");
        assert_eq!(
            controller.handle_key(key(KeyCode::Char('x'))).unwrap(),
            EventResult::Consumed
        );
        assert!(controller.is_visible());

        controller.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!controller.is_visible());
        assert_eq!(api.aborts.load(Ordering::SeqCst), 0);

        controller.show();
        controller.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!controller.is_visible());
        assert_eq!(api.aborts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_render_shows_error_content() {
        let api = Arc::new(RecordingApi::default());
        let (mut controller, _) = ready_controller(&api);
        controller.open_error_message(Some(504), None);

        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                controller.render(frame, area, &theme);
            })
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(rendered.contains("Analysis failed"));
        assert!(rendered.contains("Timed out"));
        assert!(rendered.contains("Close"));
    }
}

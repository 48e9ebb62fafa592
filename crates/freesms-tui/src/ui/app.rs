use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use freesms_core::settings::Settings;
use freesms_core::theme::{Element, Theme};
use freesms_core::widget::{CredentialsWidget, Notifier};
use ratatui::prelude::{Constraint, CrosstermBackend, Direction, Layout, Terminal};
use ratatui::widgets::{Block, Borders};
use tokio::sync::{mpsc, Mutex};

use super::{footer::render_footer, form::render_form, header::render_header};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    EditingUserId,
    EditingApiKey,
}

/// What the widget is currently doing, shown in the header. At most one
/// action is in flight; input is ignored while busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Idle,
    Saving,
    Testing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormSelection {
    #[default]
    UserId,
    ApiKey,
    Save,
    Test,
}

impl FormSelection {
    pub fn next(&self) -> Self {
        match self {
            Self::UserId => Self::ApiKey,
            Self::ApiKey => Self::Save,
            Self::Save => Self::Test,
            Self::Test => Self::UserId, // Loop back to the top
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::UserId => Self::Test, // Loop back to the bottom
            Self::ApiKey => Self::UserId,
            Self::Save => Self::ApiKey,
            Self::Test => Self::Save,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    fn new(kind: ToastKind, message: String) -> Self {
        Self {
            kind,
            message,
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() > TOAST_LIFETIME
    }
}

/// Completions and notifications sent back from spawned widget actions.
enum UiEvent {
    Toast(ToastKind, String),
    ActionFinished,
}

/// Bridges the widget's success notifications onto the toast line.
struct ChannelNotifier {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        let _ = self
            .tx
            .send(UiEvent::Toast(ToastKind::Success, message.to_string()));
    }
}

pub struct App {
    should_quit: bool,
    theme: Theme,
    settings: Settings,
    mode: AppMode,
    selection: FormSelection,
    status: ActionStatus,
    widget: Arc<Mutex<CredentialsWidget>>,
    /// Last seen widget fields, for drawing while an action holds the
    /// widget lock.
    user_id: String,
    api_key: String,
    edit_buffer: String,
    toast: Option<Toast>,
    events_tx: mpsc::UnboundedSender<UiEvent>,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl App {
    pub fn new(settings: Settings, widget: CredentialsWidget) -> Self {
        let theme = Theme::new(settings.theme);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let user_id = widget.user_id.clone();
        let api_key = widget.api_key.clone();
        Self {
            should_quit: false,
            theme,
            settings,
            mode: AppMode::Normal,
            selection: FormSelection::default(),
            status: ActionStatus::Idle,
            widget: Arc::new(Mutex::new(widget)),
            user_id,
            api_key,
            edit_buffer: String::new(),
            toast: None,
            events_tx,
            events_rx,
        }
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.drain_events();
            self.expire_toast();
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                UiEvent::Toast(kind, message) => {
                    self.toast = Some(Toast::new(kind, message));
                }
                UiEvent::ActionFinished => {
                    self.status = ActionStatus::Idle;
                    self.refresh_fields();
                }
            }
        }
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::expired) {
            self.toast = None;
        }
    }

    fn refresh_fields(&mut self) {
        if let Ok(widget) = self.widget.try_lock() {
            self.user_id = widget.user_id.clone();
            self.api_key = widget.api_key.clone();
        }
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.size();
            let background = Block::new()
                .borders(Borders::NONE)
                .style(self.theme.style(Element::Background));
            frame.render_widget(background, area);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(area);

            render_header(
                frame,
                chunks[0],
                &self.theme,
                self.status,
                &self.user_id,
                &self.api_key,
            );
            render_form(
                frame,
                chunks[1],
                &self.theme,
                self.mode,
                self.selection,
                self.status,
                &self.user_id,
                &self.api_key,
                &self.edit_buffer,
            );
            render_footer(frame, chunks[2], &self.theme, self.mode, self.toast.as_ref());
        })?;
        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match self.mode {
                        AppMode::Normal => self.handle_normal_key(key.code),
                        AppMode::EditingUserId | AppMode::EditingApiKey => {
                            self.handle_editing_key(key.code)
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        if self.status != ActionStatus::Idle {
            // an action is in flight; only quitting is allowed
            if code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => self.start_save(),
            KeyCode::Char('t') => self.start_test(),
            KeyCode::Char('d') => {
                self.theme.toggle();
                self.settings.theme = self.theme.variant();
                self.settings.save().unwrap_or_default();
            }
            KeyCode::Up => self.selection = self.selection.previous(),
            KeyCode::Down | KeyCode::Tab => self.selection = self.selection.next(),
            KeyCode::Enter => match self.selection {
                FormSelection::UserId => {
                    self.edit_buffer = self.user_id.clone();
                    self.mode = AppMode::EditingUserId;
                }
                FormSelection::ApiKey => {
                    self.edit_buffer = self.api_key.clone();
                    self.mode = AppMode::EditingApiKey;
                }
                FormSelection::Save => self.start_save(),
                FormSelection::Test => self.start_test(),
            },
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.edit_buffer.push(c),
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Esc => {
                self.edit_buffer.clear();
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
    }

    fn commit_edit(&mut self) {
        // uncontended: actions are blocked while editing
        if let Ok(mut widget) = self.widget.try_lock() {
            match self.mode {
                AppMode::EditingUserId => widget.user_id = self.edit_buffer.clone(),
                AppMode::EditingApiKey => widget.api_key = self.edit_buffer.clone(),
                AppMode::Normal => {}
            }
        }
        self.edit_buffer.clear();
        self.mode = AppMode::Normal;
        self.refresh_fields();
    }

    fn start_save(&mut self) {
        self.status = ActionStatus::Saving;
        let widget = self.widget.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let notifier = ChannelNotifier { tx: tx.clone() };
            let result = widget.lock().await.save(&notifier).await;
            if let Err(err) = result {
                let _ = tx.send(UiEvent::Toast(ToastKind::Error, err.to_string()));
            }
            let _ = tx.send(UiEvent::ActionFinished);
        });
    }

    fn start_test(&mut self) {
        self.status = ActionStatus::Testing;
        let widget = self.widget.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let notifier = ChannelNotifier { tx: tx.clone() };
            let result = widget.lock().await.test(&notifier).await;
            if let Err(err) = result {
                let _ = tx.send(UiEvent::Toast(ToastKind::Error, err.to_string()));
            }
            let _ = tx.send(UiEvent::ActionFinished);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_cycles_forward_through_the_form() {
        let mut selection = FormSelection::default();
        let mut seen = vec![selection];
        for _ in 0..3 {
            selection = selection.next();
            seen.push(selection);
        }

        assert_eq!(
            seen,
            vec![
                FormSelection::UserId,
                FormSelection::ApiKey,
                FormSelection::Save,
                FormSelection::Test,
            ]
        );
        assert_eq!(selection.next(), FormSelection::UserId);
    }

    #[test]
    fn selection_cycles_backward_through_the_form() {
        assert_eq!(FormSelection::UserId.previous(), FormSelection::Test);
        assert_eq!(FormSelection::Test.previous(), FormSelection::Save);
    }

    #[test]
    fn notifier_success_becomes_a_success_toast() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier { tx };

        notifier.success("saved");

        match rx.try_recv() {
            Ok(UiEvent::Toast(ToastKind::Success, message)) => assert_eq!(message, "saved"),
            _ => panic!("expected a success toast"),
        }
    }

    #[test]
    fn fresh_toasts_are_not_expired() {
        let toast = Toast::new(ToastKind::Success, "hello".to_string());
        assert!(!toast.expired());
    }
}

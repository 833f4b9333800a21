pub mod clipboard;
mod component;
mod components;
mod cross_term;
mod event_ext;
mod heroes;
pub mod logging;
pub mod settings;
mod widgets;

use crate::demo::clipboard::ClipboardAccess;
use crate::demo::component::Component;
use crate::demo::components::{Button, HistoryPanel, InputDialog, InputField, PageView};
use crate::demo::event_ext::EventExt;
use crate::demo::widgets::Alert;
use crossterm::event::{Event, KeyCode};
use history_router::engine::memory::{MemoryRouter, MemoryTitle, MemoryViewport};
use history_router::engine::{NavigationOptions, RestoredState};
use history_router::{
    NavigationCoordinator, RoutingEngine, TitleService, ViewportScroller,
};
use log::info;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use serde_json::Value;
use std::fmt::Display;
use std::io;
use tokio_util::sync::CancellationToken;

pub type DemoCoordinator = NavigationCoordinator<MemoryRouter, MemoryTitle, MemoryViewport>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Push,
    Replace,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Title,
    Url,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Ok,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Back,
    Forward,
    /// Browser-style traversal to an entry picked from the history list.
    Restore { id: u64, url: String },
    OpenDialog(DialogKind),
    FollowLink { url: String },
    PushState { title: String, url: String, state: Value },
    ReplaceState { title: String, url: String, state: Value },
    Scroll(f64),
    CopyUrl,
    ShowAlert(String, String),
    Quit,
}

impl Message {
    fn show_error<M: Into<String>, E: Display>(message: M, error: E) -> Message {
        Message::ShowAlert(message.into(), error.to_string())
    }

    /// Turns the values of a submitted dialog into the matching message.
    pub fn submit(kind: DialogKind, title: &str, url: &str, state: &str) -> Message {
        let state = if state.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(state) {
                Ok(state) => state,
                Err(e) => return Message::show_error("Invalid state", e),
            }
        };
        let (title, url) = (title.to_string(), url.to_string());
        match kind {
            DialogKind::Push => Message::PushState { title, url, state },
            DialogKind::Replace => Message::ReplaceState { title, url, state },
            DialogKind::Link => Message::FollowLink { url },
        }
    }
}

pub struct HistoryApp {
    coordinator: DemoCoordinator,
    router: MemoryRouter,
    title: MemoryTitle,
    viewport: MemoryViewport,
    clipboard: Box<dyn ClipboardAccess>,
    history_panel: HistoryPanel,
    page: PageView,
    dialog: Option<(DialogKind, InputDialog<DialogField, DialogButton>)>,
    alert: Option<(String, String)>,
    pub is_finished: bool,
}

impl HistoryApp {
    pub fn new(
        coordinator: DemoCoordinator,
        router: MemoryRouter,
        title: MemoryTitle,
        viewport: MemoryViewport,
        clipboard: Box<dyn ClipboardAccess>,
    ) -> Self {
        let mut app = HistoryApp {
            coordinator,
            router,
            title,
            viewport,
            clipboard,
            history_panel: HistoryPanel::default(),
            page: PageView::default(),
            dialog: None,
            alert: None,
            is_finished: false,
        };
        app.refresh();
        app
    }

    pub async fn run(&mut self, message: Option<Message>) -> io::Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, message).await;
        ratatui::restore();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        message: Option<Message>,
    ) -> io::Result<()> {
        terminal.clear()?;
        if let Some(message) = message {
            self.dispatch(message).await;
        }

        let cancellation_token = CancellationToken::new();
        let mut events = cross_term::receive_cross_term_events(cancellation_token.clone());
        while !self.is_finished {
            terminal.draw(|frame| self.view(frame))?;
            let Some(event) = events.recv().await else {
                break;
            };
            if let Some(message) = self.handle_event(&event) {
                self.dispatch(message).await;
            }
        }
        cancellation_token.cancel();
        Ok(())
    }

    async fn dispatch(&mut self, mut message: Message) {
        while let Some(next) = self.update(message).await {
            message = next;
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.history_panel
            .set_entries(self.coordinator.entries(), self.coordinator.current_index());
        let position = self.viewport.scroll_position();
        self.page.set_page(
            &self.coordinator.active_url(),
            &self.title.title(),
            position.x,
            position.y,
        );
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        let current = self.coordinator.current_entry();
        let (title, url) = current
            .map(|entry| (entry.title.clone(), entry.url.clone()))
            .unwrap_or_default();
        let fields = match kind {
            DialogKind::Link => vec![InputField::new(DialogField::Url, "Url", url)],
            DialogKind::Push | DialogKind::Replace => vec![
                InputField::new(DialogField::Title, "Title", title),
                InputField::new(DialogField::Url, "Url", url),
                InputField::new(DialogField::State, "State (json)", ""),
            ],
        };
        let dialog_title = match kind {
            DialogKind::Push => "Push state",
            DialogKind::Replace => "Replace state",
            DialogKind::Link => "Follow link",
        };
        let buttons = vec![
            Button::new(DialogButton::Ok, "Ok"),
            Button::new(DialogButton::Cancel, "Cancel"),
        ];
        self.dialog = Some((kind, InputDialog::new(dialog_title, fields, buttons)));
    }

    fn handle_dialog_event(&mut self, event: &Event) -> Option<Message> {
        let (kind, dialog) = self.dialog.as_mut()?;
        let pressed = dialog.handle_event(event);
        if dialog.is_dismissed() {
            self.dialog = None;
            return None;
        }
        match pressed? {
            DialogButton::Cancel => {
                self.dialog = None;
                None
            }
            DialogButton::Ok => {
                let value = |field| dialog.value(field).unwrap_or_default().to_string();
                let message = Message::submit(
                    *kind,
                    &value(DialogField::Title),
                    &value(DialogField::Url),
                    &value(DialogField::State),
                );
                self.dialog = None;
                Some(message)
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<Message> {
        if event.is_stop() {
            return Some(Message::Quit);
        }

        if self.alert.is_some() {
            if event.is_enter() || event.is_escape() {
                self.alert = None;
            }
            return None;
        }

        if self.dialog.is_some() {
            return self.handle_dialog_event(event);
        }

        match event.key_code()? {
            KeyCode::Left => Some(Message::Back),
            KeyCode::Right => Some(Message::Forward),
            KeyCode::Char('l') => Some(Message::OpenDialog(DialogKind::Link)),
            KeyCode::Char('p') => Some(Message::OpenDialog(DialogKind::Push)),
            KeyCode::Char('r') => Some(Message::OpenDialog(DialogKind::Replace)),
            KeyCode::Char('y') => Some(Message::CopyUrl),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => self
                .page
                .handle_event(event)
                .or_else(|| self.history_panel.handle_event(event)),
        }
    }

    pub async fn update(&mut self, message: Message) -> Option<Message> {
        match message {
            Message::Back => self
                .coordinator
                .back()
                .await
                .err()
                .map(|e| Message::show_error("Back failed", e)),
            Message::Forward => self
                .coordinator
                .forward()
                .await
                .err()
                .map(|e| Message::show_error("Forward failed", e)),
            Message::Restore { id, url } => {
                let state = self
                    .coordinator
                    .entries()
                    .iter()
                    .find(|entry| entry.id == id)
                    .map(|entry| entry.state.clone());
                self.router.pop_state(
                    RestoredState {
                        navigation_id: id,
                        state,
                    },
                    &url,
                );
                self.coordinator.process_pending_events().await;
                None
            }
            Message::OpenDialog(kind) => {
                self.open_dialog(kind);
                None
            }
            Message::FollowLink { url } => {
                let result = self
                    .router
                    .navigate_by_url(&url, NavigationOptions::default())
                    .await;
                self.coordinator.process_pending_events().await;
                result
                    .err()
                    .map(|e| Message::show_error(format!("Failed to open {}", url), e))
            }
            Message::PushState { title, url, state } => self
                .coordinator
                .push_state(state, title, url)
                .await
                .err()
                .map(|e| Message::show_error("Push failed", e)),
            Message::ReplaceState { title, url, state } => self
                .coordinator
                .replace_state(state, title, url)
                .await
                .err()
                .map(|e| Message::show_error("Replace failed", e)),
            Message::Scroll(dy) => {
                self.viewport.scroll_by(0.0, dy);
                None
            }
            Message::CopyUrl => {
                let url = self.coordinator.active_url();
                match self.clipboard.set_text(url.clone()) {
                    Ok(()) => {
                        info!("Copied {} to the clipboard", url);
                        None
                    }
                    Err(e) => Some(Message::show_error("Failed to copy url", e)),
                }
            }
            Message::ShowAlert(title, message) => {
                self.alert = Some((title, message));
                None
            }
            Message::Quit => {
                self.is_finished = true;
                None
            }
        }
    }

    fn header(&self) -> Paragraph {
        let back = if self.coordinator.can_go_back() { "<←>" } else { "   " };
        let forward = if self.coordinator.can_go_forward() { "<→>" } else { "   " };
        Paragraph::new(Line::from(vec![
            Span::from(format!("{} {}", back, self.coordinator.previous_url())),
            Span::from("  |  "),
            Span::from(self.coordinator.active_url()).bold(),
            Span::from("  |  "),
            Span::from(format!("{} {}", self.coordinator.next_url(), forward)),
        ]))
    }

    fn instructions(&self) -> Paragraph {
        Paragraph::new(Line::from(
            " Link<l>  Push<p>  Replace<r>  Scroll<j/k>  Copy url<y>  Quit<q>",
        ))
            .dark_gray()
    }

    pub fn view(&self, frame: &mut Frame) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
            .areas(frame.area());
        let [page_area, history_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);

        frame.render_widget(self.header(), header_area);
        self.page.view(frame, page_area);
        self.history_panel.view(frame, history_area);
        frame.render_widget(self.instructions(), footer_area);

        if let Some((_, dialog)) = &self.dialog {
            let area = frame.area();
            dialog.view(frame, area);
        }
        if let Some((title, message)) = &self.alert {
            frame.render_widget(Alert::new(title, message), frame.area());
        }
    }
}

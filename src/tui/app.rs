//! Application state and event loop.
//!
//! One logical thread: terminal events, fetch completions and identity
//! changes interleave through a single `select!`. All remote work runs as
//! spawned tasks that post an action carrying their request's sequence
//! token; the owning controller discards anything stale, so the newest
//! issued fetch is always the one reflected on screen.

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::error;
use uuid::Uuid;

use crate::config::Settings;
use crate::services::{ApiClient, UserProvider};
use crate::tui::action::Action;
use crate::tui::component::Component;
use crate::tui::components::{InsightsView, TransactionsView};
use crate::tui::controller::{FetchSpec, QuerySpec};
use crate::tui::keybindings::KeyMap;
use crate::tui::theme::Theme;

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transactions,
    Insights,
}

impl Tab {
    fn next(self) -> Self {
        match self {
            Tab::Transactions => Tab::Insights,
            Tab::Insights => Tab::Transactions,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Transactions => "Transactions",
            Tab::Insights => "Insights",
        }
    }
}

pub struct App {
    api: ApiClient,
    users: UserProvider,
    keymap: KeyMap,
    theme: Theme,
    tab: Tab,
    transactions: TransactionsView,
    insights: InsightsView,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(settings: &Settings, api: ApiClient, preferred_user: Option<Uuid>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let theme = Theme::by_name(&settings.theme);
        Self {
            api,
            users: UserProvider::new(preferred_user),
            keymap: KeyMap::default(),
            theme: theme.clone(),
            tab: Tab::Transactions,
            transactions: TransactionsView::new(settings.rows_per_page, theme.clone()),
            insights: InsightsView::new(theme),
            action_tx,
            action_rx,
            status: None,
            should_quit: false,
        }
    }

    /// Run until quit. Draw, then wait for the next input, completion,
    /// identity change or tick.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut events = EventStream::new();
        let mut user_rx = self.users.subscribe();
        let mut tick = tokio::time::interval(std::time::Duration::from_millis(200));

        self.spawn_users_fetch();

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if let Err(err) = self.handle_key(key) {
                                error!("key handling failed: {err}");
                            }
                        }
                        Some(Ok(_)) => {} // resize etc.: next draw picks it up
                        Some(Err(err)) => error!("terminal event error: {err}"),
                        None => break,
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
                changed = user_rx.changed() => {
                    if changed.is_ok() {
                        self.on_user_changed();
                    }
                }
                _ = tick.tick() => {} // redraw for spinners
            }
        }
        Ok(())
    }

    /// Route a key press: text-capturing surfaces first, then the key map.
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Ctrl+c quits from anywhere, including text fields.
        if key.code == crossterm::event::KeyCode::Char('c')
            && key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return Ok(());
        }
        if self.tab == Tab::Transactions && self.transactions.filter_form_open() {
            if let Some(spec) = self.transactions.on_form_key(key)? {
                self.spawn_transactions_fetch(spec);
            }
            return Ok(());
        }
        if self.tab == Tab::Insights && self.insights.wants_keys() {
            // Tab still switches views from the prompt.
            if let Some(Action::NextTab) = self.keymap.lookup(&key)
                && key.code == crossterm::event::KeyCode::Tab
            {
                self.tab = self.tab.next();
                return Ok(());
            }
            let session_id = self.users.current_id();
            if let Some(spec) = self.insights.on_prompt_key(key, session_id.as_deref())? {
                self.spawn_insights_fetch(spec);
            }
            return Ok(());
        }
        if let Some(action) = self.keymap.lookup(&key) {
            self.handle_action(action);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        self.status = None;
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextTab => self.tab = self.tab.next(),
            Action::CycleUser => self.users.cycle(),
            Action::Error(message) => self.status = Some(message),
            Action::UsersLoaded(result) => self.on_users_loaded(result),
            Action::TransactionsLoaded { seq, result } => {
                self.transactions.on_loaded(seq, result);
            }
            Action::InsightsLoaded { seq, result } => {
                self.insights.on_loaded(seq, result);
            }
            action => self.route_to_active_view(&action),
        }
    }

    fn route_to_active_view(&mut self, action: &Action) {
        match self.tab {
            Tab::Transactions => {
                if let Some(spec) = self.transactions.on_action(action) {
                    self.spawn_transactions_fetch(spec);
                }
            }
            Tab::Insights => {
                if !self.insights.on_action(action) && *action == Action::Refresh {
                    let session_id = self.users.current_id();
                    if let Some(spec) = self.insights.refresh(session_id.as_deref()) {
                        self.spawn_insights_fetch(spec);
                    }
                }
            }
        }
    }

    fn on_users_loaded(&mut self, result: Result<Vec<crate::core::models::UserProfile>, String>) {
        match result {
            Ok(users) if users.is_empty() => {
                self.status = Some("server returned no users".to_string());
            }
            // Installs the identity; the watch subscription picks the
            // change up and triggers the initial fetches.
            Ok(users) => self.users.set_users(users),
            Err(message) => {
                self.status = Some(format!("failed to load users: {message}"));
            }
        }
    }

    /// Both consumers react to an identity change by dropping their held
    /// results and re-fetching. Nothing here mutates the identity itself.
    pub(crate) fn on_user_changed(&mut self) {
        let user_id = self.users.current_id();
        if let Some(spec) = self.transactions.set_user(user_id.clone()) {
            self.spawn_transactions_fetch(spec);
        }
        if let Some(spec) = self.insights.on_user_changed(user_id.as_deref()) {
            self.spawn_insights_fetch(spec);
        }
    }

    fn spawn_users_fetch(&self) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_users().await.map_err(|e| e.to_string());
            // A send failure means the app is gone; dropping the result is
            // the required teardown behavior.
            let _ = tx.send(Action::UsersLoaded(result));
        });
    }

    fn spawn_transactions_fetch(&self, spec: FetchSpec) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = api
                .fetch_transactions(&spec.request)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::TransactionsLoaded {
                seq: spec.seq,
                result,
            });
        });
    }

    fn spawn_insights_fetch(&self, spec: QuerySpec) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = api
                .fetch_insights(&spec.session_id, &spec.query)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::InsightsLoaded {
                seq: spec.seq,
                result,
            });
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let [header_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header_area);
        match self.tab {
            Tab::Transactions => self.transactions.render(frame, body_area),
            Tab::Insights => self.insights.render(frame, body_area),
        }
        self.render_status(frame, status_area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("FinTUI ", self.theme.header_style())];
        for tab in [Tab::Transactions, Tab::Insights] {
            let style = if tab == self.tab {
                self.theme.selected_style()
            } else {
                self.theme.muted_style()
            };
            spans.push(Span::styled(format!(" {} ", tab.title()), style));
        }
        let user_label = match self.users.current() {
            Some(user) => format!("{} <{}>", user.name, user.email),
            None => "loading users\u{2026}".to_string(),
        };
        spans.push(Span::styled(
            format!("  u switch user \u{00b7} {user_label}"),
            self.theme.muted_style(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(message) => Line::from(Span::styled(message.clone(), self.theme.error_style())),
            None => Line::from(Span::styled(
                "q quit \u{00b7} Tab switch view \u{00b7} r refresh",
                self.theme.muted_style(),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

use crate::api::{ApiClient, ApiError};
use crate::config::{self, ThemePreference};
use crate::editor::{Editor, EditorField};
use crate::loader::{Loader, Message, Payload, ViewScope};
use crate::models::{Team, User};
use crate::routes::{ActionKind, HOME_CARDS, ROUTES, Route, find_action};
use crate::views::{
    ActivitiesData, LeaderboardData, LoadState, Tabular, TeamsData, UsersData, WorkoutsData,
};

pub enum Screen {
    Home,
    Users(LoadState<UsersData>),
    Teams(LoadState<TeamsData>),
    Activities(LoadState<ActivitiesData>),
    Workouts(LoadState<WorkoutsData>),
    Leaderboard(LoadState<LeaderboardData>),
}

pub enum ViewStatus<'a> {
    Home,
    Loading,
    Failed(&'a str),
    Ready(&'a dyn Tabular),
}

impl Screen {
    fn loading(route: Route) -> Self {
        match route {
            Route::Home => Screen::Home,
            Route::Users => Screen::Users(LoadState::Loading),
            Route::Teams => Screen::Teams(LoadState::Loading),
            Route::Activities => Screen::Activities(LoadState::Loading),
            Route::Workouts => Screen::Workouts(LoadState::Loading),
            Route::Leaderboard => Screen::Leaderboard(LoadState::Loading),
        }
    }

    pub fn status(&self) -> ViewStatus<'_> {
        match self {
            Screen::Home => ViewStatus::Home,
            Screen::Users(state) => status_of(state),
            Screen::Teams(state) => status_of(state),
            Screen::Activities(state) => status_of(state),
            Screen::Workouts(state) => status_of(state),
            Screen::Leaderboard(state) => status_of(state),
        }
    }
}

fn status_of<T: Tabular>(state: &LoadState<T>) -> ViewStatus<'_> {
    match state {
        LoadState::Loading => ViewStatus::Loading,
        LoadState::Ready(data) => ViewStatus::Ready(data),
        LoadState::Failed(message) => ViewStatus::Failed(message),
    }
}

fn settle<T: Tabular>(state: &mut LoadState<T>, route: Route, result: Result<T, ApiError>) {
    *state = match result {
        Ok(data) => {
            tracing::info!(route = route.path(), rows = data.len(), "View ready");
            LoadState::Ready(data)
        }
        Err(err) => {
            tracing::error!(route = route.path(), error = %err, "Failed to load view");
            LoadState::Failed(err.to_string())
        }
    };
}

pub struct App {
    pub should_quit: bool,
    pub route: Route,
    pub screen: Screen,
    pub table_state: TableState,
    pub home_state: ListState,
    pub editor: Editor,
    pub theme: ThemePreference,
    pub show_help: bool,
    pub api_url: String,
    loader: Loader,
    scope: ViewScope,
    toast: Option<Toast>,
}

impl App {
    pub fn new(client: ApiClient, route: Route, theme: ThemePreference) -> Self {
        let api_url = client.base_url().to_string();
        let mut loader = Loader::new(client);
        let scope = loader.new_scope();
        let mut app = App {
            should_quit: false,
            route: Route::Home,
            screen: Screen::Home,
            table_state: TableState::default(),
            home_state: ListState::default(),
            editor: Editor::Closed,
            theme,
            show_help: false,
            api_url,
            loader,
            scope,
            toast: None,
        };
        app.navigate(route);
        app
    }

    #[cfg(test)]
    pub fn scope_id(&self) -> u64 {
        self.scope.id()
    }

    /// Tears down the current view and mounts `route` with fresh requests.
    pub fn navigate(&mut self, route: Route) {
        self.scope.cancel();
        self.scope = self.loader.new_scope();
        self.route = route;
        self.screen = Screen::loading(route);
        self.editor = Editor::Closed;
        self.table_state.select(Some(0));
        self.home_state.select(Some(0));
        tracing::info!(route = route.path(), scope = self.scope.id(), "Mounting view");
        self.loader.mount(route, &self.scope);
    }

    pub fn refresh(&mut self) {
        self.navigate(self.route);
    }

    pub fn process_messages(&mut self) {
        while let Some(message) = self.loader.try_next() {
            self.handle_message(message);
        }
    }

    pub fn handle_message(&mut self, message: Message) {
        if message.scope != self.scope.id() {
            tracing::debug!(scope = message.scope, "Discarding result for closed view");
            return;
        }

        let payload = match message.payload {
            Payload::UserSaved(result) => {
                self.finish_save(result);
                return;
            }
            payload => payload,
        };

        let route = self.route;
        match (&mut self.screen, payload) {
            (Screen::Users(state), Payload::Users(result)) => settle(state, route, result),
            (Screen::Teams(state), Payload::Teams(result)) => settle(state, route, result),
            (Screen::Activities(state), Payload::Activities(result)) => {
                settle(state, route, result)
            }
            (Screen::Workouts(state), Payload::Workouts(result)) => settle(state, route, result),
            (Screen::Leaderboard(state), Payload::Leaderboard(result)) => {
                settle(state, route, result)
            }
            _ => tracing::warn!(route = route.path(), "Result does not match mounted view"),
        }
    }

    fn finish_save(&mut self, result: Result<User, ApiError>) {
        match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, "User updated");
                if let Screen::Users(LoadState::Ready(data)) = &mut self.screen {
                    let user_id = user.id;
                    if !data.apply_saved(user) {
                        tracing::warn!(user_id, "Saved user is no longer listed");
                    }
                }
                self.editor.save_succeeded();
                self.set_toast("User updated.", false);
            }
            Err(err) => {
                tracing::error!(error = %err, status = ?err.status(), "Saving user failed");
                self.editor.save_failed(err.to_string());
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.editor.is_open() {
            self.handle_editor_input(key);
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.show_help = true,
            KeyCode::Char('m') => self.toggle_theme(),
            KeyCode::Char('r') if self.route != Route::Home => self.refresh(),
            KeyCode::Char(digit @ '1'..='6') => {
                let index = digit as usize - '1' as usize;
                self.navigate(ROUTES[index]);
            }
            KeyCode::Right | KeyCode::Tab => self.navigate(self.route.next()),
            KeyCode::Left | KeyCode::BackTab => self.navigate(self.route.previous()),
            KeyCode::Esc if self.route != Route::Home => self.navigate(Route::Home),
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Enter => match self.route {
                Route::Home => self.open_selected_card(),
                Route::Users => self.open_editor(),
                _ => {}
            },
            KeyCode::Char(ch) => self.trigger_action(ch),
            _ => {}
        }
    }

    fn handle_editor_input(&mut self, key: KeyEvent) {
        let teams: &[Team] = match &self.screen {
            Screen::Users(LoadState::Ready(data)) => &data.teams,
            _ => &[],
        };
        let Some(session) = self.editor.session_mut() else {
            return;
        };
        if session.is_saving() {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.editor.cancel();
            }
            KeyCode::Enter => self.submit_editor(),
            KeyCode::Tab | KeyCode::Down => session.next_field(),
            KeyCode::BackTab | KeyCode::Up => session.previous_field(),
            KeyCode::Left if session.focus == EditorField::Team => {
                session.cycle_team(teams, false)
            }
            KeyCode::Right if session.focus == EditorField::Team => {
                session.cycle_team(teams, true)
            }
            KeyCode::Char(' ') if session.focus == EditorField::Team => {
                session.cycle_team(teams, true)
            }
            KeyCode::Backspace => session.pop_char(),
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    session.push_char(ch);
                }
            }
            _ => {}
        }
    }

    fn submit_editor(&mut self) {
        if let Some((id, update)) = self.editor.begin_save() {
            tracing::info!(user_id = id, team_id = ?update.team_id, "Submitting user update");
            self.loader.save_user(&self.scope, id, update);
        }
    }

    fn open_editor(&mut self) {
        let selected = self.table_state.selected().unwrap_or(0);
        let user = match &self.screen {
            Screen::Users(LoadState::Ready(data)) => data.users.get(selected),
            _ => None,
        };
        match user {
            Some(user) => self.editor = Editor::open(user),
            None => self.set_toast("No user selected.", true),
        }
    }

    fn open_selected_card(&mut self) {
        let selected = self.home_state.selected().unwrap_or(0);
        if let Some(card) = HOME_CARDS.get(selected) {
            self.navigate(card.route);
        }
    }

    fn trigger_action(&mut self, key: char) {
        let Some(action) = find_action(self.route, key) else {
            return;
        };
        match action.kind {
            ActionKind::EditUser => self.open_editor(),
            ActionKind::Refresh => self.refresh(),
            ActionKind::Unavailable => {
                tracing::info!(
                    route = self.route.path(),
                    action = action.label,
                    "Action not available"
                );
                self.set_toast(format!("{} is not available yet.", action.label), true);
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
        if let Err(err) = config::write_theme(self.theme) {
            tracing::warn!(error = %err, "Failed to save theme");
            self.set_toast(format!("Failed to save theme: {err}"), true);
        }
    }

    fn selection_len(&self) -> usize {
        match self.screen.status() {
            ViewStatus::Home => HOME_CARDS.len(),
            ViewStatus::Ready(data) => data.len(),
            ViewStatus::Loading | ViewStatus::Failed(_) => 0,
        }
    }

    fn select_previous(&mut self) {
        let len = self.selection_len();
        if len == 0 {
            return;
        }
        let selected = self.selection_state().unwrap_or(0);
        let new_index = if selected == 0 { len - 1 } else { selected - 1 };
        self.select(new_index);
    }

    fn select_next(&mut self) {
        let len = self.selection_len();
        if len == 0 {
            return;
        }
        let selected = self.selection_state().unwrap_or(0);
        let new_index = if selected + 1 >= len { 0 } else { selected + 1 };
        self.select(new_index);
    }

    fn selection_state(&self) -> Option<usize> {
        if self.route == Route::Home {
            self.home_state.selected()
        } else {
            self.table_state.selected()
        }
    }

    fn select(&mut self, index: usize) {
        if self.route == Route::Home {
            self.home_state.select(Some(index));
        } else {
            self.table_state.select(Some(index));
        }
    }

    pub fn editor_teams(&self) -> &[Team] {
        match &self.screen {
            Screen::Users(LoadState::Ready(data)) => &data.teams,
            _ => &[],
        }
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > Duration::from_secs(2) {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}

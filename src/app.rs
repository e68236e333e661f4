use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::core::{
    parse_command, Action, CatalogActions, Command, Context, Module, NavigateTarget, NotifyLevel,
};
use crate::domain::{format_error, FetchError};
use crate::infrastructure::{RuntimeCommand, RuntimeEvent};
use crate::modules::dashboard::Dashboard;
use crate::modules::detail::DetailPage;
use crate::modules::login::LoginForm;
use crate::modules::wizard::Wizard;
use crate::routing::{shows_chrome, Resolved, Route, RouteTable, Router};
use crate::store::CatalogStore;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// Startup settings for [`App`]
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub gateway: String,
    pub require_login: bool,
    pub username: Option<String>,
    pub enabler_data: Value,
    pub search_debounce: Option<Duration>,
    pub export_dir: Option<PathBuf>,
    /// Write copies to the system clipboard; off in headless tests
    pub system_clipboard: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            gateway: String::new(),
            require_login: false,
            username: None,
            enabler_data: crate::domain::default_enablers(),
            search_debounce: None,
            export_dir: None,
            system_clipboard: false,
        }
    }
}

/// The routed views, kept alive across navigation
pub struct Views {
    pub dashboard: Dashboard,
    pub detail: DetailPage,
    pub login: LoginForm,
    pub wizard: Wizard,
}

impl Views {
    pub fn for_route(&self, route: &Route) -> Option<&dyn Module> {
        match route {
            Route::Login => Some(&self.login),
            Route::Dashboard => Some(&self.dashboard),
            Route::Detail { .. } => Some(&self.detail),
            Route::NotFound { .. } => None,
        }
    }

    pub fn for_route_mut(&mut self, route: &Route) -> Option<&mut dyn Module> {
        match route {
            Route::Login => Some(&mut self.login),
            Route::Dashboard => Some(&mut self.dashboard),
            Route::Detail { .. } => Some(&mut self.detail),
            Route::NotFound { .. } => None,
        }
    }
}

pub struct App {
    pub ctx: Context,
    pub views: Views,
    router: Router,
    pub input_mode: InputMode,
    pub command_input: String,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    system_clipboard: bool,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        let mut ctx = Context::new(CatalogStore::new());
        ctx.gateway = options.gateway.clone();
        if !options.require_login {
            ctx.store
                .start_session(options.username.clone().unwrap_or_else(|| "guest".to_string()));
        }
        let views = Views {
            dashboard: Dashboard::new(options.enabler_data.clone(), options.search_debounce),
            detail: DetailPage::new(),
            login: LoginForm::new(options.username.clone()),
            wizard: Wizard::new(&options.enabler_data, options.export_dir.clone()),
        };
        Self {
            ctx,
            views,
            router: Router::new(RouteTable::catalog()),
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status: None,
            help_open: false,
            should_quit: false,
            system_clipboard: options.system_clipboard,
        }
    }

    /// Resolve the root path and enter the first view
    pub fn start(&mut self) {
        self.navigate("/");
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.router.current_route()
    }

    pub fn current_path(&self) -> &str {
        self.router
            .current()
            .map(|resolved| resolved.path.as_str())
            .unwrap_or("/")
    }

    pub fn shows_chrome(&self) -> bool {
        shows_chrome(self.current_path())
    }

    pub fn can_go_back(&self) -> bool {
        self.router.can_go_back()
    }

    // === Navigation ===

    pub fn navigate(&mut self, path: &str) {
        let resolved = self
            .router
            .resolve(path, self.ctx.store.is_authenticated());
        self.transition(resolved, true);
    }

    pub fn back(&mut self) {
        match self.router.pop_back() {
            Some(path) => {
                let resolved = self
                    .router
                    .resolve(&path, self.ctx.store.is_authenticated());
                self.transition(resolved, false);
            }
            None => {
                if self.current_route() != Some(&Route::Dashboard) {
                    self.navigate("/dashboard");
                }
            }
        }
    }

    /// Leave the current view and enter the next one, each exactly once.
    /// Re-resolving to the same path is a no-op.
    fn transition(&mut self, resolved: Resolved, remember: bool) {
        if self.router.current() == Some(&resolved) {
            return;
        }
        tracing::info!(path = %resolved.path, "navigate");

        if let Some(previous) = self.router.current_route().cloned() {
            if let Some(view) = self.views.for_route_mut(&previous) {
                view.on_leave(&mut self.ctx);
            }
        }
        if let Route::Detail { tile_id } = &resolved.route {
            self.views.detail.set_tile(tile_id);
        }
        let route = resolved.route.clone();
        self.router.commit(resolved, remember);
        if let Some(view) = self.views.for_route_mut(&route) {
            view.on_enter(&mut self.ctx);
        }
    }

    // === Session ===

    pub fn logout(&mut self) {
        if !self.ctx.store.is_authenticated() {
            return;
        }
        self.ctx.store.logout();
        self.navigate("/login");
        self.router.reset_history();
        self.set_status("Signed out", StatusLevel::Info);
    }

    fn session_expired(&mut self, error: &FetchError) {
        tracing::warn!("session rejected: {}", error.message);
        self.ctx.store.expire_session();
        self.navigate("/login");
        self.router.reset_history();
        self.set_status("Session expired, please sign in", StatusLevel::Warn);
    }

    // === Worker ===

    /// Drain commands queued by store actions
    pub fn take_commands(&mut self) -> Vec<RuntimeCommand> {
        self.ctx.store.take_commands()
    }

    pub fn apply_runtime_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::TilesFetched { generation, tiles } => {
                self.ctx.store.apply_tiles(generation, tiles);
            }
            RuntimeEvent::TileFetched { generation, tile } => {
                self.ctx.store.apply_tile(generation, tile);
            }
            RuntimeEvent::FetchFailed { generation, error } => {
                if error.is_unauthorized() && generation == self.ctx.store.generation() {
                    self.session_expired(&error);
                } else {
                    self.ctx.store.apply_fetch_failure(generation, error);
                }
            }
            RuntimeEvent::StaticApisRefreshed => {
                self.ctx.store.apply_static_refresh(Ok(()));
                self.set_status("Static APIs refreshed", StatusLevel::Info);
                if self.current_route() == Some(&Route::Dashboard) {
                    self.views.dashboard.reload(&mut self.ctx.store);
                }
            }
            RuntimeEvent::StaticRefreshFailed { error } => {
                if error.is_unauthorized() {
                    self.ctx.store.apply_static_refresh(Ok(()));
                    self.session_expired(&error);
                } else {
                    self.ctx.store.apply_static_refresh(Err(error));
                }
            }
            RuntimeEvent::LoggedIn { username } => {
                self.ctx.store.apply_login(Ok(username.clone()));
                self.navigate("/dashboard");
                self.router.reset_history();
                self.set_status(format!("Signed in as {username}"), StatusLevel::Info);
            }
            RuntimeEvent::LoginFailed { error } => {
                let summary = format_error(&error).text();
                tracing::debug!("login failed: {summary}");
                self.ctx.store.apply_login(Err(error));
            }
            RuntimeEvent::LoggedOut => {
                tracing::debug!("logout acknowledged");
            }
            RuntimeEvent::Error { message } => {
                self.set_status(message, StatusLevel::Error);
            }
        }
    }

    // === Loop hooks ===

    /// Let the active view and the wizard react to store changes
    pub fn sync(&mut self) {
        if let Some(route) = self.router.current_route().cloned() {
            if let Some(view) = self.views.for_route_mut(&route) {
                view.sync(&mut self.ctx);
            }
        }
        if self.ctx.store.wizard_visible {
            self.views.wizard.sync(&mut self.ctx);
        }
    }

    pub fn on_tick(&mut self) {
        self.ctx.frame = self.ctx.frame.wrapping_add(1);
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    /// Whether the active view is editing text
    pub fn view_captures_input(&self) -> bool {
        self.current_route()
            .and_then(|route| self.views.for_route(route))
            .map(|view| view.captures_input())
            .unwrap_or(false)
    }

    // === Commands and actions ===

    pub fn run_command_line(&mut self) {
        let input = std::mem::take(&mut self.command_input);
        self.input_mode = InputMode::Normal;
        if input.trim().is_empty() {
            return;
        }
        let command = parse_command(&input);
        let action = self.execute_command(&command);
        self.apply_action(action);
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        let on_dashboard = self.current_route() == Some(&Route::Dashboard);
        match cmd {
            Command::Dashboard => Action::Navigate(NavigateTarget::Dashboard),
            Command::Tile(id) => Action::Navigate(NavigateTarget::Tile(id.clone())),
            Command::Goto(path) => Action::Navigate(NavigateTarget::Path(path.clone())),
            Command::Back => Action::Navigate(NavigateTarget::Back),

            Command::Login => {
                if self.ctx.store.is_authenticated() {
                    Action::Notify("Already signed in".to_string(), NotifyLevel::Info)
                } else {
                    Action::Navigate(NavigateTarget::Login)
                }
            }
            Command::Logout => {
                self.logout();
                Action::None
            }

            Command::Refresh => {
                if !self.ctx.store.is_authenticated() {
                    return Action::Notify("Sign in first".to_string(), NotifyLevel::Warn);
                }
                self.views.dashboard.refresh_static_apis(&mut self.ctx.store);
                Action::Notify("Refreshing static APIs…".to_string(), NotifyLevel::Info)
            }
            Command::Search(value) => {
                if !on_dashboard {
                    return Action::Notify(
                        "Search is available on the dashboard".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                let value = value.as_deref().unwrap_or("");
                self.views.dashboard.search_for(value, &mut self.ctx.store);
                Action::None
            }
            Command::Onboard => {
                if !on_dashboard {
                    return Action::Notify(
                        "Onboarding starts from the dashboard".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                let dropdown = self.views.dashboard.dropdown_mut();
                if !dropdown.is_rendered() {
                    return Action::Notify(
                        "No onboarding methods configured".to_string(),
                        NotifyLevel::Warn,
                    );
                }
                if !dropdown.is_open() {
                    dropdown.toggle_menu();
                }
                Action::None
            }

            Command::Help => {
                self.help_open = true;
                Action::None
            }
            Command::Quit => Action::Quit,
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command or module
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(NavigateTarget::Back) => self.back(),
            Action::Navigate(target) => {
                if let Some(path) = target.path() {
                    self.navigate(&path);
                }
            }
            Action::Copy(text) => self.copy_to_clipboard(text),
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
            Action::OpenCommand(prefix) => {
                self.input_mode = InputMode::Command;
                self.command_input = prefix.unwrap_or_default();
            }
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) {
        if text.is_empty() {
            self.set_status("Nothing to copy", StatusLevel::Warn);
            return;
        }
        if self.system_clipboard {
            let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(&text));
            if let Err(err) = result {
                tracing::warn!("clipboard unavailable: {err}");
                self.set_status("Clipboard not available", StatusLevel::Error);
                return;
            }
        }
        let preview: String = text.chars().take(40).collect();
        let preview = if preview.len() < text.len() {
            format!("{preview}…")
        } else {
            preview
        };
        self.set_status(format!("Copied: {}", preview.replace('\n', " ")), StatusLevel::Info);
        self.ctx.set_clipboard(text);
    }

    /// Dismiss the static refresh error dialog
    pub fn dismiss_error_dialog(&mut self) {
        self.ctx.store.clear_error();
    }
}

//! Actions that modules can return to communicate with the app

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a route
    Navigate(NavigateTarget),

    /// Copy text to the system clipboard
    Copy(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Open command line with optional prefix
    OpenCommand(Option<String>),

    /// Request quit
    Quit,
}

/// Navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateTarget {
    /// Go back to previous route
    Back,
    /// Go to the dashboard
    Dashboard,
    /// Go to the login form
    Login,
    /// Go to a tile's detail page
    Tile(String),
    /// Go to an arbitrary path
    Path(String),
}

impl NavigateTarget {
    /// Path for this target, `None` for [`NavigateTarget::Back`]
    pub fn path(&self) -> Option<String> {
        match self {
            NavigateTarget::Back => None,
            NavigateTarget::Dashboard => Some("/dashboard".to_string()),
            NavigateTarget::Login => Some("/login".to_string()),
            NavigateTarget::Tile(id) => Some(format!("/tile/{}", id.trim_matches('/'))),
            NavigateTarget::Path(path) => Some(path.clone()),
        }
    }
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

//! Route table and navigation history
//!
//! Routes are a declarative list resolved first-match-wins. Redirect rules
//! and guard failures restart resolution with the new path, bounded by
//! [`MAX_REDIRECTS`].

const MAX_REDIRECTS: usize = 8;
const LOGIN_PATH: &str = "/login";

/// A resolved view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Detail { tile_id: String },
    NotFound { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    Detail,
    NotFound,
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Open,
    Authenticated,
}

#[derive(Debug, Clone)]
pub enum RouteRule {
    Redirect {
        pattern: &'static str,
        to: &'static str,
    },
    View {
        pattern: &'static str,
        exact: bool,
        view: ViewKind,
        guard: Guard,
    },
    /// Matches anything; must be last
    Fallback { view: ViewKind },
}

/// Result of resolving a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Path after redirects
    pub path: String,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The catalog's routes
    pub fn catalog() -> Self {
        Self::new(vec![
            RouteRule::Redirect {
                pattern: "/",
                to: "/dashboard",
            },
            RouteRule::View {
                pattern: LOGIN_PATH,
                exact: true,
                view: ViewKind::Login,
                guard: Guard::Open,
            },
            RouteRule::View {
                pattern: "/dashboard",
                exact: true,
                view: ViewKind::Dashboard,
                guard: Guard::Authenticated,
            },
            RouteRule::View {
                pattern: "/tile/:tileID",
                exact: false,
                view: ViewKind::Detail,
                guard: Guard::Authenticated,
            },
            RouteRule::Fallback {
                view: ViewKind::NotFound,
            },
        ])
    }

    pub fn resolve(&self, path: &str, authenticated: bool) -> Resolved {
        let mut path = normalize_path(path);
        for _ in 0..=MAX_REDIRECTS {
            match self.resolve_once(&path, authenticated) {
                Step::Done(route) => return Resolved { path, route },
                Step::Redirect(to) => {
                    tracing::debug!(from = %path, to = %to, "route redirect");
                    path = normalize_path(&to);
                }
            }
        }
        tracing::warn!(path = %path, "too many redirects");
        Resolved {
            route: Route::NotFound { path: path.clone() },
            path,
        }
    }

    fn resolve_once(&self, path: &str, authenticated: bool) -> Step {
        for rule in &self.rules {
            match rule {
                RouteRule::Redirect { pattern, to } => {
                    if match_pattern(pattern, path, true).is_some() {
                        return Step::Redirect(to.to_string());
                    }
                }
                RouteRule::View {
                    pattern,
                    exact,
                    view,
                    guard,
                } => {
                    let Some(params) = match_pattern(pattern, path, *exact) else {
                        continue;
                    };
                    if *guard == Guard::Authenticated && !authenticated {
                        return Step::Redirect(LOGIN_PATH.to_string());
                    }
                    return Step::Done(build_route(*view, path, &params));
                }
                RouteRule::Fallback { view } => {
                    return Step::Done(build_route(*view, path, &[]));
                }
            }
        }
        Step::Done(Route::NotFound {
            path: path.to_string(),
        })
    }
}

enum Step {
    Done(Route),
    Redirect(String),
}

fn build_route(view: ViewKind, path: &str, params: &[(String, String)]) -> Route {
    match view {
        ViewKind::Login => Route::Login,
        ViewKind::Dashboard => Route::Dashboard,
        ViewKind::Detail => {
            let tile_id = params
                .iter()
                .find(|(name, _)| name == "tileID")
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            Route::Detail { tile_id }
        }
        ViewKind::NotFound => Route::NotFound {
            path: path.to_string(),
        },
    }
}

/// Match `path` against a `/a/:param` pattern. Non-exact patterns also match
/// longer paths. Returns the captured parameters.
fn match_pattern(pattern: &str, path: &str, exact: bool) -> Option<Vec<(String, String)>> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if path_segments.len() < pattern_segments.len() {
        return None;
    }
    if exact && path_segments.len() != pattern_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), actual.to_string()));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

/// Strip query and fragment, collapse duplicate and trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or("");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Header and footer are only shown on the dashboard and tile pages
pub fn shows_chrome(path: &str) -> bool {
    let path = normalize_path(path);
    path == "/dashboard" || path.starts_with("/tile/")
}

/// Current route plus back history
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    history: Vec<String>,
    current: Option<Resolved>,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            history: Vec::new(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Resolved> {
        self.current.as_ref()
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref().map(|resolved| &resolved.route)
    }

    pub fn resolve(&self, path: &str, authenticated: bool) -> Resolved {
        self.table.resolve(path, authenticated)
    }

    /// Make `resolved` current. With `remember`, the previous path is pushed
    /// for `back`. Returns the route that was active before.
    pub fn commit(&mut self, resolved: Resolved, remember: bool) -> Option<Route> {
        let previous = self.current.take();
        if let Some(previous) = previous.as_ref() {
            if remember && previous.path != resolved.path {
                self.history.push(previous.path.clone());
            }
        }
        self.current = Some(resolved);
        previous.map(|previous| previous.route)
    }

    /// Pop the previous path from history
    pub fn pop_back(&mut self) -> Option<String> {
        self.history.pop()
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Forget history, used when the session changes
    pub fn reset_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_to_dashboard() {
        let table = RouteTable::catalog();
        let resolved = table.resolve("/", true);
        assert_eq!(resolved.path, "/dashboard");
        assert_eq!(resolved.route, Route::Dashboard);
    }

    #[test]
    fn test_tile_param_and_non_exact_match() {
        let table = RouteTable::catalog();
        assert_eq!(
            table.resolve("/tile/apimediationlayer", true).route,
            Route::Detail {
                tile_id: "apimediationlayer".into()
            }
        );
        assert_eq!(
            table.resolve("/tile/zosmf/zosmf", true).route,
            Route::Detail {
                tile_id: "zosmf".into()
            }
        );
    }

    #[test]
    fn test_dashboard_is_exact() {
        let table = RouteTable::catalog();
        assert!(matches!(
            table.resolve("/dashboard/extra", true).route,
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn test_guard_redirects_to_login() {
        let table = RouteTable::catalog();
        let resolved = table.resolve("/", false);
        assert_eq!(resolved.path, "/login");
        assert_eq!(resolved.route, Route::Login);
        assert_eq!(table.resolve("/tile/x", false).route, Route::Login);
    }

    #[test]
    fn test_catch_all_not_found() {
        let table = RouteTable::catalog();
        assert_eq!(
            table.resolve("/nope?x=1", false).route,
            Route::NotFound {
                path: "/nope".into()
            }
        );
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let table = RouteTable::new(vec![
            RouteRule::Redirect { pattern: "/a", to: "/b" },
            RouteRule::Redirect { pattern: "/b", to: "/a" },
        ]);
        assert!(matches!(
            table.resolve("/a", true).route,
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn test_normalize_and_chrome() {
        assert_eq!(normalize_path("dashboard//"), "/dashboard");
        assert_eq!(normalize_path(""), "/");
        assert!(shows_chrome("/dashboard"));
        assert!(shows_chrome("/tile/x"));
        assert!(!shows_chrome("/login"));
        assert!(!shows_chrome("/tile"));
    }

    #[test]
    fn test_router_history() {
        let mut router = Router::new(RouteTable::catalog());
        let first = router.resolve("/dashboard", true);
        assert_eq!(router.commit(first, true), None);
        let second = router.resolve("/tile/a", true);
        assert_eq!(router.commit(second, true), Some(Route::Dashboard));
        assert!(router.can_go_back());
        assert_eq!(router.pop_back().as_deref(), Some("/dashboard"));

        let back = router.resolve("/dashboard", true);
        router.commit(back, false);
        assert!(!router.can_go_back());
    }
}

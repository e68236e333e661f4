//! App shell flow without a terminal: routing, view hooks, worker events
//! and rendering into a test backend

use apicat::app::{App, AppOptions, InputMode};
use apicat::core::CatalogActions;
use apicat::domain::{FetchError, TileSummary};
use apicat::events;
use apicat::infrastructure::{RuntimeCommand, RuntimeEvent};
use apicat::modules::dashboard::{ERROR_HEADING, NO_MATCHES, TILES_HEADING};
use apicat::routing::Route;
use apicat::ui;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn tile(id: &str, title: &str) -> TileSummary {
    TileSummary {
        id: id.into(),
        title: title.into(),
        ..Default::default()
    }
}

fn started(options: AppOptions) -> App {
    let mut app = App::new(options);
    app.start();
    app
}

fn screen(app: &App) -> String {
    let backend = TestBackend::new(120, 40);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

fn press(app: &mut App, code: KeyCode) {
    events::handle_key(app, KeyEvent::from(code));
}

#[test]
fn test_root_redirects_to_dashboard_and_starts_fetch() {
    let mut app = started(AppOptions::default());

    assert_eq!(app.current_route(), Some(&Route::Dashboard));
    assert_eq!(app.current_path(), "/dashboard");
    assert!(app.shows_chrome());
    assert_eq!(
        app.take_commands(),
        vec![RuntimeCommand::FetchTilesStart { generation: 1 }]
    );
    println!("✓ / -> /dashboard");
}

#[test]
fn test_guard_sends_anonymous_users_to_login() {
    let mut app = started(AppOptions {
        require_login: true,
        ..AppOptions::default()
    });

    assert_eq!(app.current_route(), Some(&Route::Login));
    assert!(!app.shows_chrome());
    assert!(app.take_commands().is_empty());

    app.apply_runtime_event(RuntimeEvent::LoggedIn {
        username: "user".into(),
    });
    assert_eq!(app.current_route(), Some(&Route::Dashboard));
    assert!(app.ctx.store.is_authenticated());
    assert!(app
        .take_commands()
        .contains(&RuntimeCommand::FetchTilesStart { generation: 1 }));
}

#[test]
fn test_navigation_leaves_and_enters_once() {
    let mut app = started(AppOptions::default());
    app.take_commands();
    app.apply_runtime_event(RuntimeEvent::TilesFetched {
        generation: 1,
        tiles: vec![tile("apimediationlayer", "API Mediation Layer")],
    });
    assert_eq!(app.ctx.store.tiles().len(), 1);

    app.navigate("/tile/apimediationlayer");
    assert_eq!(
        app.current_route(),
        Some(&Route::Detail {
            tile_id: "apimediationlayer".into()
        })
    );
    assert_eq!(
        app.take_commands(),
        vec![
            RuntimeCommand::FetchStop,
            RuntimeCommand::FetchTileStart {
                generation: 3,
                tile_id: "apimediationlayer".into()
            }
        ]
    );

    // Same path again is a no-op
    app.navigate("/tile/apimediationlayer");
    assert!(app.take_commands().is_empty());

    app.back();
    assert_eq!(app.current_route(), Some(&Route::Dashboard));
    assert_eq!(
        app.take_commands(),
        vec![
            RuntimeCommand::FetchStop,
            RuntimeCommand::FetchTilesStart { generation: 5 }
        ]
    );
}

#[test]
fn test_stale_results_are_dropped() {
    let mut app = started(AppOptions::default());
    app.take_commands();

    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation: 0,
        error: FetchError::new(Some(500), "late"),
    });
    assert!(app.ctx.store.fetch_tiles_error.is_none());

    app.apply_runtime_event(RuntimeEvent::TilesFetched {
        generation: 0,
        tiles: vec![tile("a", "A")],
    });
    assert!(app.ctx.store.tiles().is_empty());
}

#[test]
fn test_fetch_error_stops_polling_once() {
    let mut app = started(AppOptions::default());
    app.take_commands();

    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation: 1,
        error: FetchError::new(Some(500), "boom"),
    });
    for _ in 0..3 {
        app.sync();
    }
    assert_eq!(app.take_commands(), vec![RuntimeCommand::FetchStop]);
}

#[test]
fn test_retry_failing_before_next_frame_stops_again() {
    let mut app = started(AppOptions::default());
    app.take_commands();

    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation: 1,
        error: FetchError::new(Some(500), "boom"),
    });
    app.sync();

    // Retry, and the retry fails before the loop syncs again
    press(&mut app, KeyCode::Char('r'));
    let generation = app.ctx.store.generation();
    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation,
        error: FetchError::new(Some(503), "still down"),
    });
    app.sync();

    assert_eq!(
        app.take_commands(),
        vec![
            RuntimeCommand::FetchStop,
            RuntimeCommand::FetchTilesStart { generation: 3 },
            RuntimeCommand::FetchStop,
        ]
    );
}

#[test]
fn test_unauthorized_fetch_ends_session() {
    let mut app = started(AppOptions {
        username: Some("user".into()),
        ..AppOptions::default()
    });
    app.take_commands();

    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation: 1,
        error: FetchError::new(Some(401), "Unauthorized"),
    });
    assert_eq!(app.current_route(), Some(&Route::Login));
    assert!(!app.ctx.store.is_authenticated());
    assert!(!app.can_go_back());
}

#[test]
fn test_unknown_path_is_not_found() {
    let mut app = started(AppOptions::default());
    app.navigate("/nowhere");
    assert_eq!(
        app.current_route(),
        Some(&Route::NotFound {
            path: "/nowhere".into()
        })
    );
    assert!(screen(&app).contains("Page Not Found"));

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.current_route(), Some(&Route::Dashboard));
}

#[test]
fn test_command_line_opens_tile_and_reports_unknown() {
    let mut app = started(AppOptions::default());

    press(&mut app, KeyCode::Char(':'));
    assert_eq!(app.input_mode, InputMode::Command);
    for c in "tile zosmf".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        app.current_route(),
        Some(&Route::Detail {
            tile_id: "zosmf".into()
        })
    );

    app.command_input = "frobnicate".into();
    app.run_command_line();
    let (text, _) = app.status_text().unwrap();
    assert!(text.starts_with("Unknown command"));
}

#[test]
fn test_logout_returns_to_login() {
    let mut app = started(AppOptions::default());
    app.take_commands();

    press(&mut app, KeyCode::Char('L'));
    assert_eq!(app.current_route(), Some(&Route::Login));
    let commands = app.take_commands();
    assert!(commands.contains(&RuntimeCommand::Logout));
    assert!(commands.contains(&RuntimeCommand::FetchStop));
}

#[test]
fn test_onboarding_flow_opens_wizard() {
    let mut app = started(AppOptions::default());

    press(&mut app, KeyCode::Char('o'));
    assert!(app.views.dashboard.dropdown().is_open());
    press(&mut app, KeyCode::Enter);

    assert!(app.ctx.store.wizard_visible);
    assert!(app.ctx.store.selected_enabler.is_some());
    assert!(!app.views.dashboard.dropdown().is_open());
}

#[test]
fn test_render_empty_dashboard() {
    let app = started(AppOptions::default());
    let text = screen(&app);
    assert!(text.contains(TILES_HEADING));
    assert!(!text.contains(NO_MATCHES));
    assert!(!text.contains(ERROR_HEADING));
}

#[test]
fn test_render_no_matches() {
    let mut app = started(AppOptions::default());
    app.ctx.store.filter_text("foo");
    let text = screen(&app);
    assert!(text.contains(NO_MATCHES));
}

#[test]
fn test_render_tiles() {
    let mut app = started(AppOptions::default());
    app.apply_runtime_event(RuntimeEvent::TilesFetched {
        generation: 1,
        tiles: vec![tile("zosmf", "z/OSMF services")],
    });
    let text = screen(&app);
    assert!(text.contains("z/OSMF services"));
}

#[test]
fn test_render_error_replaces_tiles() {
    let mut app = started(AppOptions::default());
    app.apply_runtime_event(RuntimeEvent::TilesFetched {
        generation: 1,
        tiles: vec![tile("a", "Alpha tile")],
    });
    app.apply_runtime_event(RuntimeEvent::FetchFailed {
        generation: 1,
        error: FetchError::new(Some(500), "boom"),
    });

    let text = screen(&app);
    assert!(text.contains(ERROR_HEADING));
    assert!(text.contains("boom"));
    assert!(!text.contains(TILES_HEADING));
    assert!(!text.contains("Alpha tile"));
}

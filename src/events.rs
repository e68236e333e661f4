//! Keyboard dispatch
//!
//! Overlays get keys first, then the command line, then a view that is
//! editing text, then global keys, then the active view.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};
use crate::core::{Action, Module};
use crate::routing::Route;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.help_open = false;
        }
        return;
    }

    let on_dashboard = app.current_route() == Some(&Route::Dashboard);

    if on_dashboard && app.ctx.store.refreshed_static_apis_error.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c')) {
            app.dismiss_error_dialog();
        }
        return;
    }

    if on_dashboard && app.ctx.store.confirm_visible {
        let action = app.views.wizard.handle_confirm_key(key, &mut app.ctx);
        app.apply_action(action);
        return;
    }

    if on_dashboard && app.ctx.store.wizard_visible {
        let action = app.views.wizard.handle_key(key, &mut app.ctx);
        app.apply_action(action);
        return;
    }

    if app.input_mode == InputMode::Command {
        handle_command_key(app, key);
        return;
    }

    if app.view_captures_input() {
        dispatch_to_view(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char(':') => app.apply_action(Action::OpenCommand(None)),
        KeyCode::Char('L') if app.ctx.store.is_authenticated() => app.logout(),
        KeyCode::Char('D') if app.ctx.store.is_authenticated() => {
            app.navigate("/dashboard");
        }
        KeyCode::Esc if !on_dashboard && app.can_go_back() => app.back(),
        _ => dispatch_to_view(app, key),
    }
}

fn handle_command_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.run_command_line(),
        KeyCode::Backspace => {
            if app.command_input.pop().is_none() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
}

fn dispatch_to_view(app: &mut App, key: KeyEvent) {
    let Some(route) = app.current_route().cloned() else {
        return;
    };
    let action = match app.views.for_route_mut(&route) {
        Some(view) => view.handle_key(key, &mut app.ctx),
        None => match key.code {
            KeyCode::Enter | KeyCode::Esc => Action::Navigate(crate::core::NavigateTarget::Back),
            _ => Action::None,
        },
    };
    app.apply_action(action);
}

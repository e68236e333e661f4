use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod shield;
pub mod widgets;

use crate::app::{App, InputMode, StatusLevel};
use crate::core::Module;
use crate::domain::{format_error, MessageLevel};
use crate::routing::Route;
use layout::centered_rect;
use shield::shield;

pub const APP_BOUNDARY: &str = "API Catalog failed to render";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    shield(f, size, APP_BOUNDARY, |f| draw_app(f, app));
}

fn draw_app(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size(), app.shows_chrome());

    if app.shows_chrome() {
        draw_header(f, areas.header, app);
        draw_footer(f, areas.footer, app);
    }

    draw_view(f, areas.main, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.current_route() == Some(&Route::Dashboard) {
        let store = &app.ctx.store;
        if store.wizard_visible {
            let area = centered_rect(90, 80, areas.size);
            shield(f, area, "Wizard is broken !", |f| {
                app.views.wizard.render(f, area, &app.ctx)
            });
        }
        if store.confirm_visible {
            app.views.wizard.render_confirm(f, areas.size);
        }
        draw_error_dialog(f, areas.size, app);
    }

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_view(f: &mut Frame, area: Rect, app: &App) {
    let Some(route) = app.current_route() else {
        return;
    };
    match app.views.for_route(route) {
        Some(view) => {
            let title = match route {
                Route::Login => "Login is broken !",
                Route::Dashboard => "Dashboard is broken !",
                Route::Detail { .. } => "Tile view is broken !",
                Route::NotFound { .. } => "Page is broken !",
            };
            shield(f, area, title, |f| view.render(f, area, &app.ctx));
        }
        None => draw_not_found(f, area, route),
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let user = app
        .ctx
        .store
        .session
        .clone()
        .unwrap_or_else(|| "--".to_string());
    let line = Line::from(vec![
        Span::styled(
            " API Catalog ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.ctx.gateway.clone(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("user ", Style::default().fg(Color::DarkGray)),
        Span::raw(user),
        Span::styled("  L logout", Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = format!(
        "{}  ·  apicat {}",
        app.current_path(),
        env!("CARGO_PKG_VERSION")
    );
    let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Right);
    f.render_widget(paragraph, area);
}

fn draw_not_found(f: &mut Frame, area: Rect, route: &Route) {
    let path = match route {
        Route::NotFound { path } => path.as_str(),
        _ => "",
    };
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Page Not Found",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Nothing is routed at {path}")),
        Line::default(),
        Line::from(Span::styled(
            "Enter or Esc to go back",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let store = &app.ctx.store;
    let mut spans = vec![
        Span::styled("Route ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.current_path())),
        Span::styled("Tiles ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}  ", store.tiles().len(), store.all_tiles().len())),
    ];
    if let Some(search) = store.search_criteria().filter(|s| !s.is_empty()) {
        spans.push(Span::styled("Search ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{search}  ")));
    }
    if let Some(enabler) = store.selected_enabler.as_deref() {
        spans.push(Span::styled("Enabler ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(enabler.to_string()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("dashboard", "Go to the dashboard"),
        ("tile", "Open a tile by id"),
        ("goto", "Open a path"),
        ("back", "Go back"),
        ("search", "Filter tiles"),
        ("refresh", "Refresh static APIs"),
        ("onboard", "Onboard a new API"),
        ("login", "Sign in"),
        ("logout", "Sign out"),
        ("help", "Show keys"),
        ("quit", "Exit"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command_input);
            let hint_text = hint.unwrap_or("dashboard | tile <id> | search <text> | refresh");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command_input.as_str()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let hints: &[(&str, &str)] = match app.current_route() {
        Some(Route::Dashboard) => &[
            ("/", "search"),
            ("o", "onboard"),
            ("R", "refresh static"),
            ("Enter", "open"),
            (":", "command"),
            ("?", "help"),
        ],
        Some(Route::Detail { .. }) => &[
            ("j/k", "service"),
            ("y", "copy URL"),
            ("Esc", "back"),
            ("?", "help"),
        ],
        Some(Route::Login) => &[("Enter", "sign in"), ("Tab", "field"), ("Esc", "quit")],
        _ => &[("Esc", "back"), ("q", "quit")],
    };
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_error_dialog(f: &mut Frame, area: Rect, app: &App) {
    let Some(error) = app.ctx.store.refreshed_static_apis_error.as_ref() else {
        return;
    };
    let popup_area = centered_rect(60, 40, area);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Refresh of static APIs failed",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(format_error(error).lines.into_iter().map(|(level, text)| {
        let color = match level {
            MessageLevel::Error => Color::Red,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Info => Color::Gray,
        };
        Line::from(Span::styled(text, Style::default().fg(color)))
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Enter / Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(72, 64, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Dashboard"),
        Line::from("  /          Search tiles"),
        Line::from("  Esc        Clear search"),
        Line::from("  h j k l    Move selection"),
        Line::from("  Enter      Open tile"),
        Line::from("  o          Onboard New API"),
        Line::from("  R          Refresh static APIs"),
        Line::from("  r          Reload tiles"),
        Line::from(""),
        Line::from("Tile"),
        Line::from("  j / k      Select service"),
        Line::from("  y          Copy home page URL"),
        Line::from("  Esc        Back"),
        Line::from(""),
        Line::from("Wizard"),
        Line::from("  Tab        Next field"),
        Line::from("  Enter      Save definition"),
        Line::from("  Ctrl-Y     Copy YAML"),
        Line::from(""),
        Line::from("Global"),
        Line::from("  :          Command line"),
        Line::from("  D          Dashboard"),
        Line::from("  L          Sign out"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(format!("Route: {}", app.current_path())),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

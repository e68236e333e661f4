//! Tile detail page - services of one tile

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, CatalogActions, Context, Module, NavigateTarget, NotifyLevel};
use crate::domain::{format_error, ServiceSummary, TileSummary};
use crate::ui::widgets::{status_color, Spinner};

pub struct DetailPage {
    tile_id: Option<String>,
    mounted: bool,
    seen_error: Option<u64>,
    selected: usize,
}

impl DetailPage {
    pub fn new() -> Self {
        Self {
            tile_id: None,
            mounted: false,
            seen_error: None,
            selected: 0,
        }
    }

    pub fn tile_id(&self) -> Option<&str> {
        self.tile_id.as_deref()
    }

    /// Point the page at a tile. Takes effect on the next `on_enter`.
    pub fn set_tile(&mut self, tile_id: &str) {
        if self.tile_id.as_deref() != Some(tile_id) {
            self.selected = 0;
        }
        self.tile_id = Some(tile_id.to_string());
    }

    pub fn mount(&mut self, actions: &mut dyn CatalogActions) {
        if self.mounted {
            return;
        }
        let Some(tile_id) = self.tile_id.as_deref() else {
            return;
        };
        self.mounted = true;
        self.seen_error = None;
        actions.fetch_tile_start(tile_id);
    }

    pub fn unmount(&mut self, actions: &mut dyn CatalogActions) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        actions.fetch_tile_stop();
    }

    fn selected_service<'a>(&self, tile: &'a TileSummary) -> Option<&'a ServiceSummary> {
        tile.services.get(self.selected)
    }
}

impl Default for DetailPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for DetailPage {
    fn id(&self) -> &'static str {
        "detail"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        let service_count = ctx
            .store
            .detail
            .as_ref()
            .map(|tile| tile.services.len())
            .unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => Action::Navigate(NavigateTarget::Back),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < service_count {
                    self.selected += 1;
                }
                Action::None
            }
            KeyCode::Char('y') => {
                let url = ctx
                    .store
                    .detail
                    .as_ref()
                    .and_then(|tile| self.selected_service(tile))
                    .and_then(|service| service.home_page_url.clone());
                match url {
                    Some(url) => Action::Copy(url),
                    None => Action::Notify(
                        "Service has no home page".to_string(),
                        NotifyLevel::Warn,
                    ),
                }
            }
            KeyCode::Char('r') => {
                if let Some(tile_id) = self.tile_id.clone() {
                    ctx.store.fetch_tile_start(&tile_id);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let store = &ctx.store;
        let tile_id = self.tile_id.as_deref().unwrap_or("");

        if let Some(error) = store.fetch_tile_error.as_ref() {
            let mut lines = vec![Line::from(Span::styled(
                format!("Tile {tile_id} could not be retrieved:"),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            lines.extend(
                format_error(error)
                    .lines
                    .into_iter()
                    .map(|(_, text)| Line::from(Span::styled(text, Style::default().fg(Color::Red)))),
            );
            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Tile "));
            frame.render_widget(paragraph, area);
            return;
        }

        let Some(tile) = store.detail.as_ref() else {
            frame.render_widget(Spinner::new(true, ctx.frame), area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", tile.status.label()),
                    Style::default().fg(Color::Black).bg(status_color(tile.status)),
                ),
                Span::raw(format!(
                    " {} of {} services running",
                    tile.active_services, tile.total_services
                )),
            ]),
            Line::from(Span::styled(
                tile.description.clone(),
                Style::default().fg(Color::Gray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", tile.display_title())),
        );
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = tile
            .services
            .iter()
            .map(|service| {
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(status_color(service.status))),
                    Span::raw(service.title.clone()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Services "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if !tile.services.is_empty() {
            state.select(Some(self.selected.min(tile.services.len() - 1)));
        }
        frame.render_stateful_widget(list, body[0], &mut state);

        let lines = match self.selected_service(tile) {
            Some(service) => service_lines(service),
            None => vec![Line::from("No services registered")],
        };
        let details = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Service "));
        frame.render_widget(details, body[1]);
    }

    fn on_enter(&mut self, ctx: &mut Context) {
        self.mount(&mut ctx.store);
    }

    fn on_leave(&mut self, ctx: &mut Context) {
        self.unmount(&mut ctx.store);
    }

    fn sync(&mut self, ctx: &mut Context) {
        let occurrence = ctx.store.tile_error_occurrence();
        if occurrence.is_some() && occurrence != self.seen_error && self.mounted {
            ctx.store.fetch_tile_stop();
        }
        self.seen_error = occurrence;
    }
}

fn service_lines(service: &ServiceSummary) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Service ID  ", label),
            Span::raw(service.service_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Status      ", label),
            Span::styled(
                service.status.label(),
                Style::default().fg(status_color(service.status)),
            ),
        ]),
        Line::from(vec![
            Span::styled("SSO         ", label),
            Span::raw(if service.sso { "yes" } else { "no" }),
        ]),
    ];
    if let Some(base_path) = service.base_path.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Base path   ", label),
            Span::raw(base_path.to_string()),
        ]));
    }
    if let Some(url) = service.home_page_url.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Home page   ", label),
            Span::styled(url.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled("  (y to copy)", label),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(service.description.clone()));
    lines
}

//! Dashboard module - tile grid with search, refresh and onboarding entry
//!
//! The dashboard owns no catalog data. It relays intents to
//! [`CatalogActions`] and renders purely from [`DashboardProps`].

pub mod dropdown;
pub mod search;

use std::cell::Cell;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use serde_json::Value;

use crate::core::{Action, CatalogActions, Context, Module, NavigateTarget};
use crate::domain::{format_error, ErrorDisplay, FetchError, MessageLevel, TileSummary};
use crate::store::CatalogStore;
use crate::ui::shield::shield;
use crate::ui::widgets::{Spinner, TileCard, CARD_HEIGHT};

pub use dropdown::{DialogDropdown, DropdownState};
pub use search::SearchCriteria;

pub const ERROR_HEADING: &str =
    "Tile details could not be retrieved, the following error was returned:";
pub const NO_MATCHES: &str = "No tiles found matching search criteria";
pub const TILES_HEADING: &str = "Available API services";
pub const SEARCH_BOUNDARY: &str = "Search Bar is broken !";
pub const SEARCH_PLACEHOLDER: &str = "Search for APIs";
pub const REFRESH_LABEL: &str = "Refresh Static APIs";

const CARD_MIN_WIDTH: u16 = 38;

/// Everything the dashboard renders from
#[derive(Debug, Clone, Copy)]
pub struct DashboardProps<'a> {
    pub tiles: &'a [TileSummary],
    pub search_criteria: Option<&'a str>,
    pub is_loading: bool,
    pub fetch_tiles_error: Option<&'a FetchError>,
    pub static_refresh_pending: bool,
}

impl<'a> DashboardProps<'a> {
    pub fn from_store(store: &'a CatalogStore) -> Self {
        Self {
            tiles: store.tiles(),
            search_criteria: store.search_criteria(),
            is_loading: store.is_loading,
            fetch_tiles_error: store.fetch_tiles_error.as_ref(),
            static_refresh_pending: store.static_refresh_pending,
        }
    }
}

/// Which of the mutually exclusive bodies is shown
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Error(ErrorDisplay),
    Tiles,
    NoMatches,
    Empty,
}

pub fn decide(props: &DashboardProps) -> DashboardView {
    if let Some(error) = props.fetch_tiles_error {
        return DashboardView::Error(format_error(error));
    }
    if !props.tiles.is_empty() {
        return DashboardView::Tiles;
    }
    let has_search = props.search_criteria.is_some_and(|s| !s.is_empty());
    if has_search {
        DashboardView::NoMatches
    } else {
        DashboardView::Empty
    }
}

pub struct Dashboard {
    mounted: bool,
    seen_error: Option<u64>,
    search: SearchCriteria,
    dropdown: DialogDropdown,
    selected: usize,
    columns: Cell<usize>,
    button_area: Cell<Rect>,
}

impl Dashboard {
    pub fn new(enabler_data: Value, search_debounce: Option<Duration>) -> Self {
        Self {
            mounted: false,
            seen_error: None,
            search: SearchCriteria::new(SEARCH_PLACEHOLDER, search_debounce),
            dropdown: DialogDropdown::new(enabler_data, true),
            selected: 0,
            columns: Cell::new(1),
            button_area: Cell::new(Rect::default()),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn dropdown(&self) -> &DialogDropdown {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut DialogDropdown {
        &mut self.dropdown
    }

    pub fn search(&self) -> &SearchCriteria {
        &self.search
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Start an activation. A second mount without unmount does nothing.
    pub fn mount(&mut self, actions: &mut dyn CatalogActions) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.seen_error = None;
        self.selected = 0;
        actions.clear_service();
        actions.fetch_tiles_start();
        self.dropdown.mount();
        tracing::debug!("dashboard mounted");
    }

    pub fn unmount(&mut self, actions: &mut dyn CatalogActions) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        actions.clear();
        actions.fetch_tiles_stop();
        self.dropdown.unmount();
        self.search.reset();
        tracing::debug!("dashboard unmounted");
    }

    pub fn handle_search(&mut self, value: &str, actions: &mut dyn CatalogActions) {
        self.selected = 0;
        actions.filter_text(value);
    }

    pub fn refresh_static_apis(&mut self, actions: &mut dyn CatalogActions) {
        actions.refreshed_static_api();
    }

    pub fn toggle_wizard(&mut self, actions: &mut dyn CatalogActions) {
        actions.wizard_toggle_display();
    }

    /// Restart tile loading after an error or on demand
    pub fn reload(&mut self, actions: &mut dyn CatalogActions) {
        if self.mounted {
            actions.fetch_tiles_start();
        }
    }

    /// Set the search text from outside the input (`:search`)
    pub fn search_for(&mut self, value: &str, actions: &mut dyn CatalogActions) {
        if let Some(value) = self.search.set_value(value) {
            self.handle_search(&value, actions);
        }
    }

    /// Stop loading when an error appears. `occurrence` identifies the
    /// current error; the stop fires once for each new occurrence.
    pub fn observe_error(&mut self, occurrence: Option<u64>, actions: &mut dyn CatalogActions) {
        if occurrence.is_some() && occurrence != self.seen_error && self.mounted {
            tracing::warn!("tile fetch failed, stopping");
            actions.fetch_tiles_stop();
        }
        self.seen_error = occurrence;
    }

    /// Emit a debounced search value if one is due
    pub fn tick(&mut self, now: Instant, actions: &mut dyn CatalogActions) {
        if let Some(value) = self.search.tick(now) {
            self.handle_search(&value, actions);
        }
    }

    fn move_selection(&mut self, delta: isize, tile_count: usize) {
        if tile_count == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, tile_count as isize - 1) as usize;
    }
}

impl Module for Dashboard {
    fn id(&self) -> &'static str {
        "dashboard"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if self.dropdown.is_open() {
            self.dropdown.handle_key(key, &mut ctx.store);
            return Action::None;
        }
        if self.search.is_focused() {
            if let Some(value) = self.search.handle_key(key, Instant::now()) {
                self.handle_search(&value, &mut ctx.store);
            }
            return Action::None;
        }

        let tile_count = ctx.store.tiles().len();
        let columns = self.columns.get().max(1) as isize;
        match key.code {
            KeyCode::Char('/') => self.search.focus(),
            KeyCode::Char('o') => self.dropdown.toggle_menu(),
            KeyCode::Char('R') => {
                self.refresh_static_apis(&mut ctx.store);
                return Action::Notify(
                    "Refreshing static APIs…".to_string(),
                    crate::core::NotifyLevel::Info,
                );
            }
            KeyCode::Char('r') => self.reload(&mut ctx.store),
            KeyCode::Esc if !self.search.value().is_empty() => {
                self.search_for("", &mut ctx.store);
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1, tile_count),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1, tile_count),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-columns, tile_count),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(columns, tile_count),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = tile_count.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(tile) = ctx.store.tiles().get(self.selected) {
                    return Action::Navigate(NavigateTarget::Tile(tile.id.clone()));
                }
            }
            _ => {}
        }
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let props = DashboardProps::from_store(&ctx.store);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.render_buttons(frame, chunks[0], &props, ctx.frame);

        match decide(&props) {
            DashboardView::Error(display) => render_error(frame, chunks[1], &display),
            view => self.render_tiles(frame, chunks[1], &props, &view),
        }

        self.dropdown.render_menu(frame, self.button_area.get());
    }

    fn on_enter(&mut self, ctx: &mut Context) {
        self.mount(&mut ctx.store);
    }

    fn on_leave(&mut self, ctx: &mut Context) {
        self.unmount(&mut ctx.store);
    }

    fn sync(&mut self, ctx: &mut Context) {
        let occurrence = ctx.store.tiles_error_occurrence();
        self.observe_error(occurrence, &mut ctx.store);
        self.tick(Instant::now(), &mut ctx.store);
        let tile_count = ctx.store.tiles().len();
        if self.selected >= tile_count {
            self.selected = tile_count.saturating_sub(1);
        }
    }

    fn captures_input(&self) -> bool {
        self.search.is_focused() || self.dropdown.is_open()
    }
}

impl Dashboard {
    fn render_buttons(&self, frame: &mut Frame, area: Rect, props: &DashboardProps, tick: usize) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(24),
                Constraint::Length(26),
                Constraint::Min(0),
            ])
            .split(area);

        self.button_area.set(chunks[0]);
        self.dropdown.render_button(frame, chunks[0]);

        let refresh_style = if props.static_refresh_pending {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let refresh = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {REFRESH_LABEL} "), refresh_style),
            Span::styled(" R", Style::default().fg(Color::DarkGray)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(refresh, chunks[1]);

        let spinner_area = Rect {
            y: chunks[2].y + chunks[2].height / 2,
            height: 1.min(chunks[2].height),
            x: chunks[2].x + 1.min(chunks[2].width),
            width: chunks[2].width.saturating_sub(1),
        };
        frame.render_widget(Spinner::new(props.is_loading, tick), spinner_area);
    }

    fn render_tiles(
        &self,
        frame: &mut Frame,
        area: Rect,
        props: &DashboardProps,
        view: &DashboardView,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        shield(frame, chunks[0], SEARCH_BOUNDARY, |f| {
            self.search.render(f, chunks[0])
        });

        let heading = Paragraph::new(Line::from(Span::styled(
            TILES_HEADING,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(heading, chunks[1]);

        match view {
            DashboardView::Tiles => self.render_grid(frame, chunks[2], props.tiles),
            DashboardView::NoMatches => {
                let message = Paragraph::new(NO_MATCHES)
                    .style(Style::default().fg(Color::Blue))
                    .alignment(Alignment::Left);
                frame.render_widget(message, chunks[2]);
            }
            DashboardView::Empty | DashboardView::Error(_) => {}
        }
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, tiles: &[TileSummary]) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let columns = (area.width / CARD_MIN_WIDTH).max(1) as usize;
        self.columns.set(columns);
        let card_width = area.width / columns as u16;
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        for (index, tile) in tiles.iter().enumerate().skip(first_row * columns) {
            let row = index / columns - first_row;
            if row >= visible_rows {
                break;
            }
            let column = index % columns;
            let y = area.y + row as u16 * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
            let card = Rect::new(
                area.x + column as u16 * card_width,
                y,
                card_width,
                height,
            );
            frame.render_widget(TileCard::new(tile).selected(index == self.selected), card);
        }
    }
}

fn render_error(frame: &mut Frame, area: Rect, display: &ErrorDisplay) {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            ERROR_HEADING,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(display.lines.iter().map(|(level, text)| {
        let color = match level {
            MessageLevel::Error => Color::Red,
            MessageLevel::Warning => Color::Yellow,
            MessageLevel::Info => Color::Gray,
        };
        Line::from(Span::styled(text.clone(), Style::default().fg(color)))
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press r to retry",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

//! Card for one catalog tile

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::domain::{TileStatus, TileSummary};

/// Rows a card needs in the grid
pub const CARD_HEIGHT: u16 = 7;

pub fn status_color(status: TileStatus) -> Color {
    match status {
        TileStatus::Up => Color::Green,
        TileStatus::Down => Color::Red,
        TileStatus::Warning => Color::Yellow,
        TileStatus::Unknown => Color::DarkGray,
    }
}

pub struct TileCard<'a> {
    tile: &'a TileSummary,
    selected: bool,
}

impl<'a> TileCard<'a> {
    pub fn new(tile: &'a TileSummary) -> Self {
        Self {
            tile,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for TileCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let tile = self.tile;
        let border_style = if self.selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let badge = Span::styled(
            format!(" {} ", tile.status.label()),
            Style::default()
                .fg(Color::Black)
                .bg(status_color(tile.status)),
        );
        let mut summary = vec![
            badge,
            Span::raw(format!(
                " {} of {} services running",
                tile.active_services, tile.total_services
            )),
        ];
        if tile.sso {
            summary.push(Span::styled("  SSO", Style::default().fg(Color::Magenta)));
        }
        if let Some(version) = tile.version.as_deref().filter(|v| !v.is_empty()) {
            summary.push(Span::styled(
                format!("  v{version}"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let lines = vec![
            Line::from(summary),
            Line::from(Span::styled(
                tile.description.clone(),
                Style::default().fg(Color::Gray),
            )),
        ];

        let title = Span::styled(
            format!(" {} ", tile.display_title()),
            Style::default().add_modifier(Modifier::BOLD),
        );
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .render(area, buf);
    }
}

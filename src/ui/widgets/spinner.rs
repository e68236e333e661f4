//! Loading indicator

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const FRAMES: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Single-line spinner, drawn only while loading
pub struct Spinner<'a> {
    loading: bool,
    frame: usize,
    label: &'a str,
    style: Style,
}

impl<'a> Spinner<'a> {
    pub fn new(loading: bool, frame: usize) -> Self {
        Self {
            loading,
            frame,
            label: "Loading…",
            style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }
}

impl<'a> Widget for Spinner<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.loading || area.width == 0 || area.height == 0 {
            return;
        }
        let glyph = FRAMES[self.frame % FRAMES.len()];
        let text = format!("{glyph} {}", self.label);
        buf.set_stringn(area.x, area.y, text, area.width as usize, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_idle() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        Spinner::new(false, 0).render(area, &mut buf);
        assert_eq!(buf.get(0, 0).symbol(), " ");

        Spinner::new(true, 1).render(area, &mut buf);
        assert_eq!(buf.get(0, 0).symbol(), "⣽");
    }
}

//! Failure boundary for drawing
//!
//! A panic raised while drawing a subtree is caught, logged and replaced by
//! a titled fallback in that subtree's area. Everything outside the area is
//! left as drawn.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Draw `draw` into `area`, falling back to an error box titled `title` if it
/// panics. Returns false when the fallback was drawn.
pub fn shield<F>(frame: &mut Frame, area: Rect, title: &str, draw: F) -> bool
where
    F: FnOnce(&mut Frame),
{
    match catch_unwind(AssertUnwindSafe(|| draw(frame))) {
        Ok(()) => true,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(boundary = title, "render failed: {message}");
            render_fallback(frame, area, title, &message);
            false
        }
    }
}

fn render_fallback(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let area = area.intersection(frame.size());
    if area.width == 0 || area.height == 0 {
        return;
    }
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(format!(" {title} ")),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

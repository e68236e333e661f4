//! Search input that reports its text value on change

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Text input that emits its value either on every change or once the value
/// has been stable for the debounce period.
///
/// The same value is never emitted twice in a row.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    placeholder: String,
    value: String,
    focused: bool,
    debounce: Option<Duration>,
    changed_at: Option<Instant>,
    last_emitted: String,
}

impl SearchCriteria {
    pub fn new(placeholder: impl Into<String>, debounce: Option<Duration>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: String::new(),
            focused: false,
            debounce,
            changed_at: None,
            last_emitted: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Forget typed text without emitting
    pub fn reset(&mut self) {
        self.value.clear();
        self.focused = false;
        self.changed_at = None;
        self.last_emitted.clear();
    }

    /// Replace the value programmatically and emit it right away
    pub fn set_value(&mut self, value: &str) -> Option<String> {
        self.value = value.to_string();
        self.flush()
    }

    /// Apply an editing key. Returns the value to forward, if any.
    ///
    /// Enter and Esc release focus; Enter also flushes a pending debounce.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<String> {
        match key.code {
            KeyCode::Esc => {
                self.blur();
                None
            }
            KeyCode::Enter => {
                self.blur();
                self.flush()
            }
            KeyCode::Backspace => {
                if self.value.pop().is_some() {
                    self.changed(now)
                } else {
                    None
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    return None;
                }
                self.value.clear();
                self.changed(now)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.push(c);
                self.changed(now)
            }
            _ => None,
        }
    }

    /// Emit a debounced value once it has been quiet long enough
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let (Some(debounce), Some(changed_at)) = (self.debounce, self.changed_at) else {
            return None;
        };
        if now.saturating_duration_since(changed_at) < debounce {
            return None;
        }
        self.flush()
    }

    fn changed(&mut self, now: Instant) -> Option<String> {
        if self.debounce.is_some() {
            self.changed_at = Some(now);
            None
        } else {
            self.flush()
        }
    }

    fn flush(&mut self) -> Option<String> {
        self.changed_at = None;
        if self.value == self.last_emitted {
            return None;
        }
        self.last_emitted = self.value.clone();
        Some(self.value.clone())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let cursor = if self.focused { "▏" } else { "" };
            Line::from(vec![
                Span::raw(self.value.clone()),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ])
        };
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" / Search "),
        );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_immediate_mode_emits_each_change() {
        let mut search = SearchCriteria::new("Search for APIs", None);
        let now = Instant::now();
        assert_eq!(search.handle_key(key('g'), now), Some("g".into()));
        assert_eq!(search.handle_key(key('w'), now), Some("gw".into()));
        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(search.handle_key(backspace, now), Some("g".into()));
        assert_eq!(search.handle_key(backspace, now), Some(String::new()));
        assert_eq!(search.handle_key(backspace, now), None);
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut search = SearchCriteria::new("", Some(Duration::from_millis(300)));
        let start = Instant::now();
        assert_eq!(search.handle_key(key('a'), start), None);
        assert_eq!(search.handle_key(key('b'), start + Duration::from_millis(100)), None);
        assert_eq!(search.tick(start + Duration::from_millis(300)), None);
        assert_eq!(
            search.tick(start + Duration::from_millis(400)),
            Some("ab".into())
        );
        assert_eq!(search.tick(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_debounce_skips_unchanged_value() {
        let mut search = SearchCriteria::new("", Some(Duration::from_millis(50)));
        let start = Instant::now();
        search.handle_key(key('a'), start);
        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        search.handle_key(backspace, start);
        assert_eq!(search.tick(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_enter_flushes_and_blurs() {
        let mut search = SearchCriteria::new("", Some(Duration::from_secs(5)));
        search.focus();
        let now = Instant::now();
        search.handle_key(key('z'), now);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(search.handle_key(enter, now), Some("z".into()));
        assert!(!search.is_focused());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut search = SearchCriteria::new("", None);
        let now = Instant::now();
        search.handle_key(key('x'), now);
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(search.handle_key(ctrl_u, now), Some(String::new()));
        assert_eq!(search.value(), "");
    }
}

//! "Onboard New API" dropdown

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use serde_json::Value;

use crate::core::CatalogActions;
use crate::domain::EnablerOption;

pub const BUTTON_LABEL: &str = "Onboard New API ▾";

/// Bound options. `Attached(None)` means the source data was not a list.
#[derive(Debug, Clone, PartialEq)]
pub enum DropdownState {
    Unattached,
    Attached(Option<Vec<EnablerOption>>),
}

/// Trigger button plus option list. Choosing an option records the enabler
/// and then opens the wizard.
#[derive(Debug, Clone)]
pub struct DialogDropdown {
    data: Value,
    visible: bool,
    state: DropdownState,
    open: bool,
    cursor: usize,
}

impl DialogDropdown {
    pub fn new(data: Value, visible: bool) -> Self {
        Self {
            data,
            visible,
            state: DropdownState::Unattached,
            open: false,
            cursor: 0,
        }
    }

    pub fn state(&self) -> &DropdownState {
        &self.state
    }

    /// Bind options from the current source data
    pub fn mount(&mut self) {
        self.state = DropdownState::Attached(EnablerOption::parse_list(&self.data));
        self.cursor = 0;
    }

    pub fn unmount(&mut self) {
        self.state = DropdownState::Unattached;
        self.open = false;
        self.cursor = 0;
    }

    /// Replace the source data, re-binding when already mounted
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
        if matches!(self.state, DropdownState::Attached(_)) {
            self.mount();
            self.open = self.open && self.is_rendered();
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.open = false;
        }
    }

    pub fn options(&self) -> Option<&[EnablerOption]> {
        match &self.state {
            DropdownState::Attached(Some(options)) => Some(options),
            _ => None,
        }
    }

    /// Nothing is drawn unless visible and bound to list data
    pub fn is_rendered(&self) -> bool {
        self.visible && self.options().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_menu(&mut self) {
        if self.is_rendered() {
            self.open = !self.open;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Dispatch the option at `index`. Ignored while unbound or out of range.
    pub fn handle_click(&mut self, index: usize, actions: &mut dyn CatalogActions) -> bool {
        let Some(option) = self.options().and_then(|options| options.get(index)) else {
            tracing::debug!(index, "dropdown click ignored");
            return false;
        };
        let id = option.id.clone();
        tracing::info!(enabler = %id, "enabler selected");
        actions.select_enabler(&id);
        actions.wizard_toggle_display();
        self.open = false;
        true
    }

    /// Keys while the menu is open. Returns false when the key was not used.
    pub fn handle_key(&mut self, key: KeyEvent, actions: &mut dyn CatalogActions) -> bool {
        if !self.open {
            return false;
        }
        let len = self.options().map(<[EnablerOption]>::len).unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Char('o') => self.open = false,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                let index = self.cursor;
                self.handle_click(index, actions);
            }
            _ => return false,
        }
        true
    }

    /// Draw the trigger button
    pub fn render_button(&self, frame: &mut Frame, area: Rect) {
        if !self.is_rendered() {
            return;
        }
        let style = if self.open {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let button = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {BUTTON_LABEL} "), style),
            Span::styled(" o", Style::default().fg(Color::DarkGray)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, area);
    }

    /// Draw the open menu below `anchor`
    pub fn render_menu(&self, frame: &mut Frame, anchor: Rect) {
        if !self.open {
            return;
        }
        let Some(options) = self.options().filter(|_| self.visible) else {
            return;
        };
        let screen = frame.size();
        let width = options
            .iter()
            .map(|option| option.label.chars().count() as u16 + 4)
            .max()
            .unwrap_or(10)
            .max(anchor.width)
            .min(screen.width.saturating_sub(anchor.x));
        let height = (options.len() as u16 + 2).min(screen.height.saturating_sub(anchor.bottom()));
        if width == 0 || height == 0 {
            return;
        }
        let area = Rect::new(anchor.x, anchor.bottom(), width, height);

        let items: Vec<ListItem> = options
            .iter()
            .map(|option| ListItem::new(option.label.clone()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl CatalogActions for Recorder {
        fn clear_service(&mut self) {}
        fn fetch_tiles_start(&mut self) {}
        fn fetch_tiles_stop(&mut self) {}
        fn clear(&mut self) {}
        fn filter_text(&mut self, _value: &str) {}
        fn refreshed_static_api(&mut self) {}
        fn select_enabler(&mut self, id: &str) {
            self.0.push(format!("select:{id}"));
        }
        fn wizard_toggle_display(&mut self) {
            self.0.push("toggle".into());
        }
        fn fetch_tile_start(&mut self, _tile_id: &str) {}
        fn fetch_tile_stop(&mut self) {}
        fn clear_error(&mut self) {}
    }

    fn data() -> Value {
        json!([{ "id": "spring", "label": "Spring Enabler" }, { "label": "Static" }])
    }

    #[test]
    fn test_unattached_until_mount() {
        let mut dropdown = DialogDropdown::new(data(), true);
        assert_eq!(dropdown.state(), &DropdownState::Unattached);
        assert!(!dropdown.is_rendered());
        let mut recorder = Recorder::default();
        assert!(!dropdown.handle_click(0, &mut recorder));
        assert!(recorder.0.is_empty());

        dropdown.mount();
        assert!(dropdown.is_rendered());
        assert_eq!(dropdown.options().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_click_selects_then_toggles() {
        let mut dropdown = DialogDropdown::new(data(), true);
        dropdown.mount();
        let mut recorder = Recorder::default();
        assert!(dropdown.handle_click(1, &mut recorder));
        assert_eq!(recorder.0, vec!["select:Static", "toggle"]);
        assert!(!dropdown.handle_click(5, &mut recorder));
        assert_eq!(recorder.0.len(), 2);
    }

    #[test]
    fn test_hidden_or_non_list_renders_nothing() {
        let mut hidden = DialogDropdown::new(data(), false);
        hidden.mount();
        assert!(!hidden.is_rendered());
        hidden.toggle_menu();
        assert!(!hidden.is_open());

        let mut scalar = DialogDropdown::new(json!({ "label": "x" }), true);
        scalar.mount();
        assert_eq!(scalar.state(), &DropdownState::Attached(None));
        assert!(!scalar.is_rendered());
    }

    #[test]
    fn test_set_data_rebinds_after_mount() {
        let mut dropdown = DialogDropdown::new(data(), true);
        dropdown.mount();
        dropdown.set_data(json!([{ "id": "nodejs", "label": "Node JS Enabler" }]));
        let mut recorder = Recorder::default();
        dropdown.handle_click(0, &mut recorder);
        assert_eq!(recorder.0[0], "select:nodejs");

        dropdown.set_data(json!("broken"));
        assert!(!dropdown.is_rendered());
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut dropdown = DialogDropdown::new(data(), true);
        dropdown.mount();
        dropdown.toggle_menu();
        let mut recorder = Recorder::default();
        dropdown.handle_key(KeyEvent::from(KeyCode::Down), &mut recorder);
        dropdown.handle_key(KeyEvent::from(KeyCode::Down), &mut recorder);
        assert_eq!(dropdown.cursor(), 1);
        dropdown.handle_key(KeyEvent::from(KeyCode::Enter), &mut recorder);
        assert_eq!(recorder.0, vec!["select:Static", "toggle"]);
        assert!(!dropdown.is_open());
    }
}

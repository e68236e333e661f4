//! Onboarding wizard
//!
//! Shown over the dashboard while the store's wizard flag is set. Collects
//! the fields of a service definition for the selected enabler and renders
//! it as YAML. Enter asks for confirmation, confirming saves the file.

mod definition;

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use serde_json::Value;

use crate::core::{Action, CatalogActions, Context, Module, NotifyLevel};
use crate::domain::EnablerOption;
use crate::modules::export;

pub use definition::{DefinitionKind, WizardField};

pub struct Wizard {
    options: Vec<EnablerOption>,
    enabler: Option<EnablerOption>,
    fields: Vec<WizardField>,
    cursor: usize,
    export_dir: Option<PathBuf>,
}

impl Wizard {
    pub fn new(enabler_data: &Value, export_dir: Option<PathBuf>) -> Self {
        Self {
            options: EnablerOption::parse_list(enabler_data).unwrap_or_default(),
            enabler: None,
            fields: definition::fields(DefinitionKind::Enabler),
            cursor: 0,
            export_dir,
        }
    }

    pub fn enabler(&self) -> Option<&EnablerOption> {
        self.enabler.as_ref()
    }

    pub fn kind(&self) -> DefinitionKind {
        match self.enabler.as_ref() {
            Some(option) if option.is_static() => DefinitionKind::Static,
            _ => DefinitionKind::Enabler,
        }
    }

    pub fn fields(&self) -> &[WizardField] {
        &self.fields
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Follow the store's selected enabler, resetting the form when it changes
    pub fn select(&mut self, enabler_id: Option<&str>) {
        if self.enabler.as_ref().map(|option| option.id.as_str()) == enabler_id {
            return;
        }
        self.enabler = enabler_id.map(|id| {
            self.options
                .iter()
                .find(|option| option.id == id)
                .cloned()
                .unwrap_or_else(|| EnablerOption {
                    id: id.to_string(),
                    label: id.to_string(),
                    payload: Value::Null,
                })
        });
        self.fields = definition::fields(self.kind());
        self.cursor = 0;
    }

    pub fn set_field(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.key == key) {
            field.value = value.to_string();
        }
    }

    pub fn service_id(&self) -> &str {
        definition::value(&self.fields, "serviceId")
    }

    pub fn validate(&self) -> Result<(), String> {
        definition::validate(&self.fields)
    }

    pub fn yaml(&self) -> Result<String, serde_yaml::Error> {
        definition::render_yaml(self.kind(), &self.fields)
    }

    /// Keys while the confirm dialog is open
    pub fn handle_confirm_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                ctx.store.close_confirm();
                let action = match self.yaml() {
                    Ok(yaml) => {
                        export::export_definition(self.export_dir.as_deref(), self.service_id(), &yaml)
                    }
                    Err(err) => Action::Notify(format!("YAML error: {err}"), NotifyLevel::Error),
                };
                if matches!(action, Action::Notify(_, NotifyLevel::Info)) {
                    ctx.store.wizard_toggle_display();
                }
                action
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                ctx.store.close_confirm();
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let width = 60.min(area.width);
        let height = 7.min(area.height);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        let lines = vec![
            Line::from(format!(
                "Save the definition for '{}'?",
                self.service_id()
            )),
            Line::default(),
            Line::from(Span::styled(
                "y save · n back to the wizard",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Confirm "),
            ),
            popup,
        );
    }

    fn active_mut(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.cursor).map(|field| &mut field.value)
    }
}

impl Module for Wizard {
    fn id(&self) -> &'static str {
        "wizard"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('y') => match self.yaml() {
                    Ok(yaml) => Action::Copy(yaml),
                    Err(err) => Action::Notify(format!("YAML error: {err}"), NotifyLevel::Error),
                },
                KeyCode::Char('u') => {
                    if let Some(value) = self.active_mut() {
                        value.clear();
                    }
                    Action::None
                }
                _ => Action::None,
            };
        }
        match key.code {
            KeyCode::Esc => ctx.store.wizard_toggle_display(),
            KeyCode::Tab | KeyCode::Down => {
                if !self.fields.is_empty() {
                    self.cursor = (self.cursor + 1) % self.fields.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !self.fields.is_empty() {
                    self.cursor = (self.cursor + self.fields.len() - 1) % self.fields.len();
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = self.active_mut() {
                    value.pop();
                }
            }
            KeyCode::Enter => match self.validate() {
                Ok(()) => ctx.store.open_confirm(),
                Err(message) => return Action::Notify(message, NotifyLevel::Warn),
            },
            KeyCode::Char(c) => {
                if let Some(value) = self.active_mut() {
                    value.push(c);
                }
            }
            _ => {}
        }
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &Context) {
        let title = match self.enabler.as_ref() {
            Some(option) => format!(" Onboard New API · {} ", option.label),
            None => " Onboard New API ".to_string(),
        };
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let label_width = self
            .fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let active = index == self.cursor;
                let label_style = if active {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let marker = if field.required { "*" } else { " " };
                let cursor = if active { "▏" } else { "" };
                Line::from(vec![
                    Span::styled(
                        format!("{marker}{:<width$} ", field.label, width = label_width),
                        label_style,
                    ),
                    Span::raw(format!("{}{cursor}", field.value)),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::RIGHT)),
            columns[0],
        );

        let preview = match self.yaml() {
            Ok(yaml) => yaml,
            Err(err) => format!("# {err}"),
        };
        frame.render_widget(
            Paragraph::new(preview)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: false }),
            columns[1],
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Tab next · Enter save · Ctrl-Y copy YAML · Esc close",
                Style::default().fg(Color::DarkGray),
            )),
            rows[1],
        );
    }

    fn sync(&mut self, ctx: &mut Context) {
        let selected = ctx.store.selected_enabler.clone();
        self.select(selected.as_deref());
    }

    fn captures_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_enablers;
    use crate::store::CatalogStore;

    #[test]
    fn test_selection_switches_definition_kind() {
        let mut wizard = Wizard::new(&default_enablers(), None);
        wizard.select(Some("static"));
        assert_eq!(wizard.kind(), DefinitionKind::Static);
        wizard.select(Some("spring"));
        assert_eq!(wizard.kind(), DefinitionKind::Enabler);
        assert_eq!(wizard.enabler().map(|o| o.label.as_str()), Some("Spring Enabler"));
    }

    #[test]
    fn test_enter_requires_valid_fields() {
        let mut ctx = Context::new(CatalogStore::new());
        ctx.store.wizard_toggle_display();
        let mut wizard = Wizard::new(&default_enablers(), None);
        wizard.select(Some("spring"));

        let action = wizard.handle_key(KeyEvent::from(KeyCode::Enter), &mut ctx);
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
        assert!(!ctx.store.confirm_visible);

        wizard.set_field("serviceId", "sampleservice");
        wizard.set_field("title", "Sample");
        wizard.set_field("baseUrl", "https://host:10012/sampleservice");
        wizard.handle_key(KeyEvent::from(KeyCode::Enter), &mut ctx);
        assert!(ctx.store.confirm_visible);
    }

    #[test]
    fn test_copy_yaml_contains_service_id() {
        let mut ctx = Context::new(CatalogStore::new());
        let mut wizard = Wizard::new(&default_enablers(), None);
        wizard.select(Some("plain-java"));
        wizard.set_field("serviceId", "hwexample");
        let ctrl_y = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL);
        match wizard.handle_key(ctrl_y, &mut ctx) {
            Action::Copy(yaml) => assert!(yaml.contains("serviceId: hwexample")),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_esc_closes_wizard() {
        let mut ctx = Context::new(CatalogStore::new());
        ctx.store.wizard_toggle_display();
        let mut wizard = Wizard::new(&default_enablers(), None);
        wizard.handle_key(KeyEvent::from(KeyCode::Esc), &mut ctx);
        assert!(!ctx.store.wizard_visible);
    }
}

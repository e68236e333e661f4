//! Login form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, Context, Module};
use crate::domain::format_error;
use crate::ui::widgets::Spinner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

pub struct LoginForm {
    username: String,
    password: String,
    field: LoginField,
}

impl LoginForm {
    pub fn new(username: Option<String>) -> Self {
        let field = if username.is_some() {
            LoginField::Password
        } else {
            LoginField::Username
        };
        Self {
            username: username.unwrap_or_default(),
            password: String::new(),
            field,
        }
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

impl Module for LoginForm {
    fn id(&self) -> &'static str {
        "login"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            if key.code == KeyCode::Char('u') {
                self.active_mut().clear();
            }
            return Action::None;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_field(),
            KeyCode::Backspace => {
                self.active_mut().pop();
            }
            KeyCode::Enter => {
                if self.field == LoginField::Username && self.password.is_empty() {
                    self.field = LoginField::Password;
                } else if !ctx.store.login_pending {
                    ctx.store.login(&self.username, &self.password);
                    self.password.clear();
                }
            }
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char(c) => self.active_mut().push(c),
            _ => {}
        }
        Action::None
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let width = 56.min(area.width);
        let height = 14.min(area.height);
        let form = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, form);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" API Catalog ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(form);
        frame.render_widget(block, form);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let masked = "•".repeat(self.password.chars().count());
        let fields = [
            (LoginField::Username, "Username", self.username.as_str()),
            (LoginField::Password, "Password", masked.as_str()),
        ];
        for (area, (field, title, value)) in chunks.iter().zip(fields) {
            let active = field == self.field;
            let style = if active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let cursor = if active { "▏" } else { "" };
            let input = Paragraph::new(format!("{value}{cursor}")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(format!(" {title} ")),
            );
            frame.render_widget(input, *area);
        }

        if ctx.store.login_pending {
            frame.render_widget(
                Spinner::new(true, ctx.frame).label("Signing in…"),
                chunks[2],
            );
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Enter sign in · Tab switch field · Esc quit",
                    Style::default().fg(Color::DarkGray),
                )),
                chunks[2],
            );
        }

        if let Some(error) = ctx.store.login_error.as_ref() {
            let lines: Vec<Line> = format_error(error)
                .lines
                .into_iter()
                .map(|(_, text)| {
                    Line::from(Span::styled(
                        text,
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ))
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[3]);
        }
    }

    fn captures_input(&self) -> bool {
        true
    }
}

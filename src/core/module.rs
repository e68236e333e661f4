//! Module trait for routed views

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::{Action, Context};

/// A routed view. The app calls `on_enter` when the route becomes active and
/// `on_leave` when it stops being active, exactly once per transition.
pub trait Module {
    fn id(&self) -> &'static str;

    /// Handle keyboard input
    /// Returns an Action describing what should happen
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action;

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Context);

    fn on_enter(&mut self, _ctx: &mut Context) {}

    fn on_leave(&mut self, _ctx: &mut Context) {}

    /// Called once per loop iteration before drawing; reacts to store changes.
    fn sync(&mut self, _ctx: &mut Context) {}

    /// Whether the module is editing text and wants every key
    fn captures_input(&self) -> bool {
        false
    }
}

pub mod action;
pub mod catalog;
pub mod command;
pub mod context;
pub mod module;

pub use action::{Action, NavigateTarget, NotifyLevel};
pub use catalog::CatalogActions;
pub use command::{parse_command, Command};
pub use context::Context;
pub use module::Module;

//! Catalog domain models
//!
//! Plain data shared by the store, the worker and the views. Nothing in here
//! touches the terminal or the network.

mod enabler;
mod error;
mod tile;

pub use enabler::{default_enablers, EnablerOption};
pub use error::{format_error, format_value, ErrorDisplay, FetchError, MessageLevel};
pub use tile::{ServiceSummary, TileStatus, TileSummary};

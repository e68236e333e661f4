pub mod spinner;
pub mod tile;

pub use spinner::Spinner;
pub use tile::{status_color, TileCard, CARD_HEIGHT};

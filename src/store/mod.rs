//! State owned outside the views
//!
//! The views treat everything in here as read-only props and change it only
//! through [`crate::core::CatalogActions`].

mod catalog;

pub use catalog::CatalogStore;

//! apicat - terminal dashboard for the API Mediation Layer API Catalog
//!
//! Tiles are polled by a Tokio worker behind [`infrastructure::RuntimeBridge`];
//! the UI thread owns all state in [`store::CatalogStore`] and renders routed
//! views with ratatui.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod events;
pub mod infrastructure;
pub mod modules;
pub mod routing;
pub mod store;
pub mod ui;

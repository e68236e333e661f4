//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - API Catalog clients (HTTP via reqwest, in-process demo)
//! - Tokio runtime bridge for async operations

pub mod catalog;
pub mod runtime;

pub use catalog::{CatalogClient, CatalogError, DemoCatalogClient, HttpCatalogClient};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerSettings};

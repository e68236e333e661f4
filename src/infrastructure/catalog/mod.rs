//! API Catalog client abstraction
//!
//! The worker talks to the catalog only through [`CatalogClient`], so the
//! HTTP implementation and the in-process demo catalog are interchangeable.

mod demo;
mod http;

pub use demo::DemoCatalogClient;
pub use http::{token_from_set_cookie, HttpCatalogClient, AUTH_COOKIE};

use crate::domain::{FetchError, TileSummary};

/// Errors raised by catalog clients
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("catalog returned status {status}")]
    Status { status: u16, body: String },

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("tile {0} was not found")]
    NotFound(String),
}

impl CatalogError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Transport { .. } => true,
            CatalogError::Status { status, .. } => *status >= 500,
            CatalogError::Decode(_) | CatalogError::NotFound(_) => false,
        }
    }

    pub fn to_fetch_error(&self) -> FetchError {
        match self {
            CatalogError::Status { status, body } => FetchError::from_response(*status, body),
            CatalogError::NotFound(_) => FetchError::new(Some(404), self.to_string()),
            CatalogError::Transport { .. } | CatalogError::Decode(_) => {
                FetchError::new(None, self.to_string())
            }
        }
    }
}

/// Operations the worker needs from the catalog
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync + 'static {
    /// All containers (tiles)
    async fn containers(&self) -> Result<Vec<TileSummary>, CatalogError>;

    /// One container with its services
    async fn container(&self, id: &str) -> Result<TileSummary, CatalogError>;

    /// Trigger a re-scan of static API definitions
    async fn refresh_static_apis(&self) -> Result<(), CatalogError>;

    /// Authenticate and keep the session for later calls
    async fn login(&self, username: &str, password: &str) -> Result<(), CatalogError>;

    /// Drop the session
    async fn logout(&self) -> Result<(), CatalogError>;

    /// Display name for the status line
    fn endpoint_name(&self) -> String;
}

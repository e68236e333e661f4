//! Catalog tile models
//!
//! The catalog answers `GET /apicatalog/api/v1/containers` with a list of
//! containers. Each container becomes one tile; unknown fields are ignored and
//! missing or `null` fields fall back to defaults so a partially filled
//! container still renders.

use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` as the type's default
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Aggregated health of a tile as reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TileStatus {
    Up,
    Down,
    Warning,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TileStatus::Up => "UP",
            TileStatus::Down => "DOWN",
            TileStatus::Warning => "WARNING",
            TileStatus::Unknown => "UNKNOWN",
        }
    }
}

/// One service registered under a tile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSummary {
    #[serde(deserialize_with = "null_default")]
    pub service_id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub status: TileStatus,
    pub home_page_url: Option<String>,
    pub base_path: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub sso: bool,
}

/// One catalog entry. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileSummary {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub status: TileStatus,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    pub version: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub total_services: u32,
    #[serde(deserialize_with = "null_default")]
    pub active_services: u32,
    #[serde(deserialize_with = "null_default")]
    pub sso: bool,
    #[serde(deserialize_with = "null_default")]
    pub services: Vec<ServiceSummary>,
}

impl TileSummary {
    /// Case-insensitive match against title, id and description.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

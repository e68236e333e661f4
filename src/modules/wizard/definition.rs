//! Service definition fields and their YAML rendering

use std::collections::BTreeMap;

use serde::Serialize;

/// Shape of the generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// Configuration consumed by an onboarding enabler
    Enabler,
    /// Static definition file read by the discovery service
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl WizardField {
    fn new(key: &'static str, label: &'static str, default: &str, required: bool) -> Self {
        Self {
            key,
            label,
            value: default.to_string(),
            required,
        }
    }
}

pub(super) fn fields(kind: DefinitionKind) -> Vec<WizardField> {
    let mut fields = vec![
        WizardField::new("serviceId", "Service ID", "", true),
        WizardField::new("title", "Title", "", true),
        WizardField::new("description", "Description", "", false),
        WizardField::new("baseUrl", "Base URL", "", true),
        WizardField::new("homePageRelativeUrl", "Home page", "/", false),
        WizardField::new("gatewayUrl", "Gateway route", "api/v1", true),
        WizardField::new("serviceUrl", "Service route", "/api/v1", true),
        WizardField::new("apiId", "API ID", "", false),
        WizardField::new("apiVersion", "API version", "1.0.0", false),
        WizardField::new("tileId", "Catalog tile ID", "", false),
        WizardField::new("tileTitle", "Catalog tile title", "", false),
    ];
    if kind == DefinitionKind::Enabler {
        fields.insert(
            5,
            WizardField::new("healthCheckRelativeUrl", "Health check", "/health", false),
        );
    }
    fields
}

pub(super) fn value<'a>(fields: &'a [WizardField], key: &str) -> &'a str {
    fields
        .iter()
        .find(|field| field.key == key)
        .map(|field| field.value.trim())
        .unwrap_or("")
}

fn optional(fields: &[WizardField], key: &str) -> Option<String> {
    let value = value(fields, key);
    (!value.is_empty()).then(|| value.to_string())
}

pub(super) fn validate(fields: &[WizardField]) -> Result<(), String> {
    if let Some(missing) = fields
        .iter()
        .find(|field| field.required && field.value.trim().is_empty())
    {
        return Err(format!("{} is required", missing.label));
    }
    let service_id = value(fields, "serviceId");
    let valid_id = service_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !valid_id {
        return Err("Service ID may only contain lowercase letters and digits".to_string());
    }
    let base_url = value(fields, "baseUrl");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err("Base URL must start with http:// or https://".to_string());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteEntry {
    gateway_url: String,
    service_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiInfoEntry {
    api_id: String,
    gateway_url: String,
    version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    version: String,
}

#[derive(Serialize)]
struct CatalogInfo {
    tile: TileInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnablerDefinition {
    service_id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_page_relative_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health_check_relative_url: Option<String>,
    routes: Vec<RouteEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    api_info: Vec<ApiInfoEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog: Option<CatalogInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaticService {
    service_id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_ui_tile_id: Option<String>,
    instance_base_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_page_relative_url: Option<String>,
    routes: Vec<RouteEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    api_info: Vec<ApiInfoEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaticDefinition {
    services: Vec<StaticService>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    catalog_ui_tiles: BTreeMap<String, TileInfo>,
}

pub(super) fn render_yaml(
    kind: DefinitionKind,
    fields: &[WizardField],
) -> Result<String, serde_yaml::Error> {
    let routes = vec![RouteEntry {
        gateway_url: value(fields, "gatewayUrl").to_string(),
        service_url: value(fields, "serviceUrl").to_string(),
    }];
    let version = optional(fields, "apiVersion").unwrap_or_else(|| "1.0.0".to_string());
    let api_info = optional(fields, "apiId")
        .map(|api_id| ApiInfoEntry {
            api_id,
            gateway_url: value(fields, "gatewayUrl").to_string(),
            version: version.clone(),
        })
        .into_iter()
        .collect();
    let tile_id = optional(fields, "tileId");
    let tile = tile_id.as_ref().map(|_| TileInfo {
        id: None,
        title: optional(fields, "tileTitle")
            .unwrap_or_else(|| value(fields, "title").to_string()),
        description: optional(fields, "description"),
        version: version.clone(),
    });

    match kind {
        DefinitionKind::Enabler => serde_yaml::to_string(&EnablerDefinition {
            service_id: value(fields, "serviceId").to_string(),
            title: value(fields, "title").to_string(),
            description: optional(fields, "description"),
            base_url: value(fields, "baseUrl").to_string(),
            home_page_relative_url: optional(fields, "homePageRelativeUrl"),
            health_check_relative_url: optional(fields, "healthCheckRelativeUrl"),
            routes,
            api_info,
            catalog: tile.map(|mut tile| {
                tile.id = tile_id.clone();
                CatalogInfo { tile }
            }),
        }),
        DefinitionKind::Static => {
            let mut catalog_ui_tiles = BTreeMap::new();
            if let (Some(id), Some(tile)) = (tile_id.clone(), tile) {
                catalog_ui_tiles.insert(id, tile);
            }
            serde_yaml::to_string(&StaticDefinition {
                services: vec![StaticService {
                    service_id: value(fields, "serviceId").to_string(),
                    title: value(fields, "title").to_string(),
                    description: optional(fields, "description"),
                    catalog_ui_tile_id: tile_id,
                    instance_base_urls: vec![value(fields, "baseUrl").to_string()],
                    home_page_relative_url: optional(fields, "homePageRelativeUrl"),
                    routes,
                    api_info,
                }],
                catalog_ui_tiles,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: DefinitionKind) -> Vec<WizardField> {
        let mut fields = fields(kind);
        for (key, value) in [
            ("serviceId", "sampleservice"),
            ("title", "Sample Service"),
            ("baseUrl", "https://localhost:10012/sampleservice"),
            ("tileId", "samples"),
        ] {
            if let Some(field) = fields.iter_mut().find(|f| f.key == key) {
                field.value = value.to_string();
            }
        }
        fields
    }

    #[test]
    fn test_enabler_yaml() {
        let yaml = render_yaml(DefinitionKind::Enabler, &filled(DefinitionKind::Enabler)).unwrap();
        assert!(yaml.contains("serviceId: sampleservice"));
        assert!(yaml.contains("healthCheckRelativeUrl: /health"));
        assert!(yaml.contains("gatewayUrl: api/v1"));
        assert!(yaml.contains("id: samples"));
        assert!(!yaml.contains("apiInfo"));
    }

    #[test]
    fn test_static_yaml() {
        let yaml = render_yaml(DefinitionKind::Static, &filled(DefinitionKind::Static)).unwrap();
        assert!(yaml.starts_with("services:"));
        assert!(yaml.contains("catalogUiTileId: samples"));
        assert!(yaml.contains("catalogUiTiles:"));
        assert!(yaml.contains("- https://localhost:10012/sampleservice"));
    }

    #[test]
    fn test_validation() {
        let mut fields = filled(DefinitionKind::Enabler);
        assert!(validate(&fields).is_ok());
        fields[0].value = "Bad Id".to_string();
        assert!(validate(&fields).is_err());
        fields[0].value.clear();
        assert_eq!(validate(&fields).unwrap_err(), "Service ID is required");
    }
}

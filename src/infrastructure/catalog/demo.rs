//! In-process catalog used by `--demo`

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use super::{CatalogClient, CatalogError};
use crate::domain::{ServiceSummary, TileStatus, TileSummary};

const LATENCY: Duration = Duration::from_millis(150);

pub struct DemoCatalogClient {
    logged_in: AtomicBool,
    refreshes: AtomicU64,
}

impl DemoCatalogClient {
    pub fn new() -> Self {
        Self {
            logged_in: AtomicBool::new(true),
            refreshes: AtomicU64::new(0),
        }
    }
}

impl Default for DemoCatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogClient for DemoCatalogClient {
    async fn containers(&self) -> Result<Vec<TileSummary>, CatalogError> {
        tokio::time::sleep(LATENCY).await;
        if !self.logged_in.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        Ok(demo_tiles(self.refreshes.load(Ordering::SeqCst) > 0))
    }

    async fn container(&self, id: &str) -> Result<TileSummary, CatalogError> {
        tokio::time::sleep(LATENCY).await;
        if !self.logged_in.load(Ordering::SeqCst) {
            return Err(unauthorized());
        }
        demo_tiles(self.refreshes.load(Ordering::SeqCst) > 0)
            .into_iter()
            .find(|tile| tile.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn refresh_static_apis(&self) -> Result<(), CatalogError> {
        tokio::time::sleep(LATENCY).await;
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<(), CatalogError> {
        tokio::time::sleep(LATENCY).await;
        if username.trim().is_empty() || password.is_empty() {
            return Err(CatalogError::Status {
                status: 401,
                body: r#"{"messages":[{"messageType":"ERROR","messageNumber":"ZWEAS120E","messageContent":"Invalid username or password"}]}"#
                    .to_string(),
            });
        }
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<(), CatalogError> {
        self.logged_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn endpoint_name(&self) -> String {
        "demo".to_string()
    }
}

fn unauthorized() -> CatalogError {
    CatalogError::Status {
        status: 401,
        body: String::new(),
    }
}

fn service(id: &str, title: &str, status: TileStatus, base_path: &str) -> ServiceSummary {
    ServiceSummary {
        service_id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} provided by the demo catalog"),
        status,
        home_page_url: Some(format!("https://localhost:10010/{id}/ui/v1/")),
        base_path: Some(base_path.to_string()),
        sso: true,
    }
}

fn tile(id: &str, title: &str, description: &str, services: Vec<ServiceSummary>) -> TileSummary {
    let active = services.iter().filter(|s| s.status == TileStatus::Up).count() as u32;
    let total = services.len() as u32;
    let status = if active == total {
        TileStatus::Up
    } else if active == 0 {
        TileStatus::Down
    } else {
        TileStatus::Warning
    };
    TileSummary {
        id: id.to_string(),
        title: title.to_string(),
        status,
        description: description.to_string(),
        version: Some("1.0.0".to_string()),
        total_services: total,
        active_services: active,
        sso: services.iter().all(|s| s.sso),
        services,
    }
}

fn demo_tiles(include_static: bool) -> Vec<TileSummary> {
    let mut tiles = vec![
        tile(
            "apimediationlayer",
            "API Mediation Layer API",
            "The API Mediation Layer for z/OS internal API services.",
            vec![
                service("gateway", "API Gateway", TileStatus::Up, "/gateway/api/v1"),
                service("apicatalog", "API Catalog", TileStatus::Up, "/apicatalog/api/v1"),
                service("discovery", "Discovery Service", TileStatus::Up, "/discovery/api/v1"),
            ],
        ),
        tile(
            "cademoapps",
            "Sample API Mediation Layer Applications",
            "Applications which demonstrate how to make a service integrated to the API Mediation Layer ecosystem",
            vec![
                service("discoverableclient", "Service Spring Onboarding Enabler sample application API", TileStatus::Up, "/discoverableclient/api/v1"),
                service("enablerv1sampleapp", "Onboarding Enabler Java Sample App", TileStatus::Down, "/enablerv1sampleapp/api/v1"),
            ],
        ),
        tile(
            "zosmf",
            "z/OSMF",
            "IBM z/OS Management Facility REST API services",
            vec![service("zosmf", "IBM z/OSMF", TileStatus::Up, "/zosmf/api/v1")],
        ),
    ];
    if include_static {
        tiles.push(tile(
            "static",
            "Statically Defined Services",
            "Services onboarded through static definition files",
            vec![service("staticclient", "Static client", TileStatus::Up, "/staticclient/api/v1")],
        ));
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_adds_static_tile() {
        let client = DemoCatalogClient::new();
        let before = client.containers().await.unwrap();
        client.refresh_static_apis().await.unwrap();
        let after = client.containers().await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
    }

    #[tokio::test]
    async fn test_logout_requires_login() {
        let client = DemoCatalogClient::new();
        client.logout().await.unwrap();
        let err = client.containers().await.unwrap_err();
        assert!(err.to_fetch_error().is_unauthorized());
        assert!(client.login("user", "").await.is_err());
        client.login("user", "secret").await.unwrap();
        assert!(client.container("zosmf").await.is_ok());
        assert!(matches!(
            client.container("missing").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_tile_status_rollup() {
        let tiles = demo_tiles(false);
        let samples = tiles.iter().find(|t| t.id == "cademoapps").unwrap();
        assert_eq!(samples.status, TileStatus::Warning);
        assert_eq!(samples.active_services, 1);
        assert_eq!(samples.total_services, 2);
    }
}

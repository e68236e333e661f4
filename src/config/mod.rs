use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::default_enablers;

const DEFAULT_GATEWAY: &str = "https://localhost:10010";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gateway base URL; the catalog lives under `/apicatalog/api/v1`
    pub gateway_url: String,
    pub poll_interval_secs: u64,
    pub max_retries: u32,
    /// 0 emits every search keystroke immediately
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Skip TLS certificate checks, for gateways with self-signed
    /// development certificates. Off unless set here or via `--insecure`.
    pub accept_invalid_certs: bool,
    pub require_login: bool,
    pub username: Option<String>,
    /// Source data for the "Onboard New API" dropdown
    pub enablers: Option<toml::Value>,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY.to_string(),
            poll_interval_secs: 30,
            max_retries: 3,
            search_debounce_ms: 0,
            request_timeout_secs: 10,
            accept_invalid_certs: false,
            require_login: true,
            username: None,
            enablers: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn search_debounce(&self) -> Option<Duration> {
        (self.search_debounce_ms > 0).then(|| Duration::from_millis(self.search_debounce_ms))
    }

    /// Dropdown source data. Whatever the file holds is passed through as-is;
    /// the dropdown decides whether it is usable.
    pub fn enabler_data(&self) -> Value {
        match &self.enablers {
            Some(value) => serde_json::to_value(value).unwrap_or(Value::Null),
            None => default_enablers(),
        }
    }

    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("definitions")))
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring invalid config: {err}");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("APICAT_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("apicat").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("apicat").join("config.toml"));
    }

    directories::ProjectDirs::from("org", "zowe", "apicat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("apicat"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("apicat"));
    }
    directories::ProjectDirs::from("org", "zowe", "apicat")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("apicat.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("gateway_url = \"https://gw:7554\"").unwrap();
        assert_eq!(config.gateway_url, "https://gw:7554");
        assert_eq!(config.poll_interval_secs, 30);
        assert!(config.search_debounce().is_none());
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_invalid_certs_are_opt_in() {
        assert!(!Config::default().accept_invalid_certs);
        let config: Config = toml::from_str("accept_invalid_certs = true").unwrap();
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_enabler_data_passthrough() {
        let config: Config = toml::from_str(
            r#"
            [[enablers]]
            id = "spring"
            label = "Spring Enabler"
            "#,
        )
        .unwrap();
        let data = config.enabler_data();
        assert_eq!(data[0]["id"], "spring");

        let config: Config = toml::from_str("enablers = \"nope\"").unwrap();
        assert_eq!(config.enabler_data(), Value::String("nope".into()));

        assert!(Config::default().enabler_data().is_array());
    }
}

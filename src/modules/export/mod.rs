//! Export Module
//!
//! Saves onboarding definitions produced by the wizard.
//!
//! - Files are named `<serviceId>-<timestamp>.yml`
//! - Saved to the configured export directory, or the data directory

use crate::core::{Action, NotifyLevel};
use chrono::Local;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the export directory, creating it if needed
fn get_export_dir(configured: Option<&Path>) -> std::io::Result<PathBuf> {
    let export_dir = match configured {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("org", "zowe", "apicat")
            .map(|dirs| dirs.data_dir().join("definitions"))
            .unwrap_or_else(|| PathBuf::from(".apicat").join("definitions")),
    };
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    let prefix: String = prefix
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write a definition file and return its path
pub fn write_definition(
    configured: Option<&Path>,
    service_id: &str,
    yaml: &str,
) -> std::io::Result<PathBuf> {
    let export_dir = get_export_dir(configured)?;
    let path = export_dir.join(generate_filename(service_id, "yml"));
    fs::write(&path, yaml)?;
    tracing::info!(path = %path.display(), "definition saved");
    Ok(path)
}

/// Save a definition and describe the outcome for the status bar
pub fn export_definition(configured: Option<&Path>, service_id: &str, yaml: &str) -> Action {
    if yaml.trim().is_empty() {
        return Action::Notify("Nothing to save".to_string(), NotifyLevel::Warn);
    }
    match write_definition(configured, service_id, yaml) {
        Ok(path) => Action::Notify(
            format!("Saved definition to {}", path.display()),
            NotifyLevel::Info,
        ),
        Err(e) => {
            tracing::error!("definition export failed: {e}");
            Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_sanitized() {
        let name = generate_filename("my service/1", "yml");
        assert!(name.starts_with("my_service_1-"));
        assert!(name.ends_with(".yml"));
    }

    #[test]
    fn test_write_definition_into_configured_dir() {
        let dir = std::env::temp_dir().join(format!("apicat-export-{}", std::process::id()));
        let path = write_definition(Some(&dir), "sample", "serviceId: sample\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "serviceId: sample\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_yaml_is_not_saved() {
        assert!(matches!(
            export_definition(None, "x", "  "),
            Action::Notify(_, NotifyLevel::Warn)
        ));
    }
}

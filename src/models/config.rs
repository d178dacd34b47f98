use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_route_prefix() -> String {
    "/browser".to_string()
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

/// Connection and routing settings for a console session.
///
/// Persisted as JSON under `~/.config/s3b/config.json`; a missing or
/// unreadable file falls back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Route under which the console is mounted; the bare prefix is the
    /// namespace root.
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (Minio, Ceph, Hetzner).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endpoint_url: Option<String>,
    /// Force path-style URLs (required for Minio, Ceph).
    #[serde(default)]
    pub path_style: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub role_chain: Vec<String>,
    /// Where packaged downloads land; defaults to the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            region: default_region(),
            endpoint_url: None,
            path_style: false,
            profile: None,
            role_chain: Vec::new(),
            download_dir: None,
        }
    }
}

impl ConsoleConfig {
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".config")
            .join("s3b");
        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::config_path()?))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|content| serde_json::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Self::default()
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = ConsoleConfig::load_from(Path::new("/nonexistent/s3b/config.json"));
        assert_eq!(config.route_prefix, "/browser");
        assert_eq!(config.region, "eu-west-1");
        assert!(!config.path_style);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let path = std::env::temp_dir().join("s3b-config-test.json");
        let config = ConsoleConfig {
            route_prefix: "/console".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://localhost:9000".to_string()),
            path_style: true,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = ConsoleConfig::load_from(&path);
        assert_eq!(loaded.route_prefix, "/console");
        assert_eq!(loaded.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(loaded.path_style);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_json_yields_defaults() {
        let path = std::env::temp_dir().join("s3b-config-invalid.json");
        fs::write(&path, "not json").unwrap();
        let config = ConsoleConfig::load_from(&path);
        assert_eq!(config.route_prefix, "/browser");
        let _ = fs::remove_file(&path);
    }
}

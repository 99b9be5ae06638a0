//! Server-side configuration, read from `/etc/foodlog/<name>.toml`.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/foodlog"
//!
//! [jwt]
//! secret = "change-me"
//! expire_secs = 2592000
//!
//! [blob]
//! public_base_url = "https://food.example.com/blobs"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

const CONFIG_DIR: &str = "/etc/foodlog";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub blob: BlobConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for the SQLite database and uploaded images.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Session token lifetime.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    /// Prefix of the URLs handed out for uploaded images. The server serves
    /// them under `/blobs`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_expire_secs() -> i64 {
    30 * 24 * 3600
}

fn default_public_base_url() -> String {
    "http://localhost:8080/blobs".to_string()
}

impl ServerConfig {
    /// A bare context name maps to `/etc/foodlog/<name>.toml`; anything that
    /// looks like a path is used as is.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Refuse to start on settings that would make the server useless.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.jwt.secret.is_empty() {
            anyhow::bail!("JWT secret is empty in configuration.");
        }
        if self.jwt.expire_secs <= 0 {
            anyhow::bail!("JWT expire_secs must be positive.");
        }
        if self.storage.data_dir.is_empty() {
            anyhow::bail!(
                "Storage data_dir is empty in configuration.\n\
                 Set [storage] data_dir so the record store can be opened."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/foodlog/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/tmp/x/foodlog.toml"),
            PathBuf::from("/tmp/x/foodlog.toml")
        );
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_dir = \"/var/lib/foodlog\"\n\n[jwt]\nsecret = \"s3cret\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/foodlog");
        assert_eq!(config.jwt.expire_secs, 30 * 24 * 3600);
        assert_eq!(config.blob.public_base_url, "http://localhost:8080/blobs");
        config.verify().unwrap();
    }

    #[test]
    fn test_verify_rejects_empty_values() {
        let config: ServerConfig = toml::from_str(
            "[storage]\ndata_dir = \"\"\n[jwt]\nsecret = \"x\"\n",
        )
        .unwrap();
        assert!(config.verify().is_err());

        let config: ServerConfig = toml::from_str(
            "[storage]\ndata_dir = \"/data\"\n[jwt]\nsecret = \"\"\n",
        )
        .unwrap();
        assert!(config.verify().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(ServerConfig::load(Path::new("/nonexistent/foodlog.toml")).is_err());
    }
}

use std::path::PathBuf;

/// Storage and listener configuration shared by the service binary and tests.
///
/// Assembled by the server from its TOML file, then handed to the storage
/// constructors. Nothing here is read lazily from process-wide state.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base directory for all on-disk state.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite record store.
    /// Defaults to `{data_dir}/foodlog.sqlite` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// Directory for uploaded images.
    /// Defaults to `{data_dir}/blobs/` if not specified.
    pub blob_dir: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sqlite_path: None,
            blob_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Whether any record store location has been configured.
    pub fn has_store(&self) -> bool {
        self.sqlite_path.is_some() || self.data_dir.is_some()
    }

    /// Resolve the SQLite database path, falling back to `{data_dir}/foodlog.sqlite`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("foodlog.sqlite"))
    }

    /// Resolve the blob storage directory.
    pub fn resolve_blob_dir(&self) -> PathBuf {
        self.blob_dir
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("blobs"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_sqlite_path(),
            PathBuf::from("/data/foodlog.sqlite")
        );
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("/data/blobs"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            sqlite_path: Some(PathBuf::from("/var/db/diary.sqlite")),
            ..Default::default()
        };
        assert!(config.has_store());
        assert_eq!(
            config.resolve_sqlite_path(),
            PathBuf::from("/var/db/diary.sqlite")
        );
    }

    #[test]
    fn test_default_has_no_store() {
        assert!(!ServiceConfig::default().has_store());
    }
}

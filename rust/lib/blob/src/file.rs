use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::BlobError;
use crate::traits::BlobStore;

/// FileStore is a BlobStore implementation backed by the local filesystem.
///
/// Keys are mapped to paths under `base_dir`:
///   key "u1/1700000000000.jpg" → `{base_dir}/u1/1700000000000.jpg`
/// and published as `{public_base_url}/u1/1700000000000.jpg`.
///
/// Parent directories are created automatically on upload. The content type
/// is not persisted; it is recovered from the key's extension when served.
pub struct FileStore {
    base_dir: PathBuf,
    public_base_url: String,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path, public_base_url: &str) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a key to a filesystem path. Only plain relative components are
    /// accepted, so a key can never escape `base_dir`.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.contains('\\') {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        let plain = Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(key))
    }
}

impl BlobStore for FileStore {
    fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<String, BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BlobError::Io(e.to_string()))?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => BlobError::AlreadyExists(key.to_string()),
                _ => BlobError::Io(e.to_string()),
            })?;
        file.write_all(data).map_err(|e| BlobError::Io(e.to_string()))?;

        tracing::debug!("stored blob {} ({} bytes, {})", key, data.len(), content_type);
        Ok(self.public_url(key))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read(&path).map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(Some(data))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::content_type_for_key;

    fn store() -> (FileStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), "http://localhost:8080/blobs/").unwrap();
        (store, dir)
    }

    #[test]
    fn test_upload_returns_public_url() {
        let (store, dir) = store();
        let url = store.upload("u1/1700000000000.jpg", b"\xff\xd8jpeg", "image/jpeg").unwrap();
        assert_eq!(url, "http://localhost:8080/blobs/u1/1700000000000.jpg");
        assert!(dir.path().join("u1/1700000000000.jpg").is_file());
        assert_eq!(
            store.get("u1/1700000000000.jpg").unwrap(),
            Some(b"\xff\xd8jpeg".to_vec())
        );
    }

    #[test]
    fn test_upload_never_overwrites() {
        let (store, _dir) = store();
        store.upload("u1/a.png", b"first", "image/png").unwrap();
        let err = store.upload("u1/a.png", b"second", "image/png").unwrap_err();
        assert!(matches!(err, BlobError::AlreadyExists(_)));
        assert_eq!(store.get("u1/a.png").unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let (store, _dir) = store();
        for key in ["", "/etc/passwd", "../outside.jpg", "u1/../../x.jpg", "u1\\x.jpg", "./a.jpg"] {
            assert!(
                matches!(store.upload(key, b"x", "image/jpeg"), Err(BlobError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_get_missing_and_directory_keys() {
        let (store, _dir) = store();
        assert_eq!(store.get("u2/b.webp").unwrap(), None);
        store.upload("u2/b.webp", b"img", "image/webp").unwrap();
        // A key naming a directory is not a blob.
        assert_eq!(store.get("u2").unwrap(), None);
        assert!(matches!(store.get("../u2/b.webp"), Err(BlobError::InvalidKey(_))));
    }

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("u1/1.JPG"), "image/jpeg");
        assert_eq!(content_type_for_key("u1/1.png"), "image/png");
        assert_eq!(content_type_for_key("u1/noext"), "application/octet-stream");
    }
}

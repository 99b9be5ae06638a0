use crate::error::BlobError;

/// BlobStore holds uploaded images and hands back public URLs.
///
/// Keys are path-like strings: `{user_id}/{unix_millis}.jpg`.
/// The default implementation (`FileStore`) maps keys to local filesystem
/// paths; an object-storage backend only needs to implement this trait.
pub trait BlobStore: Send + Sync {
    /// Store a blob and return its public URL.
    /// Fails with `BlobError::AlreadyExists` if the key is taken.
    fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<String, BlobError>;

    /// Retrieve a blob. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Public URL under which `key` is served.
    fn public_url(&self, key: &str) -> String;
}

/// Content type to serve a stored image with, from its key's extension.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

use std::path::Path;

use crate::model::UploadedImage;
use crate::service::{DiaryError, DiaryService};

const DEFAULT_EXTENSION: &str = "jpg";

/// Lowercased extension of `file_name`, or `jpg` when it has none usable.
fn image_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

impl DiaryService {
    /// Store a photo for a post and return its public URL.
    ///
    /// Keys are `{user_id}/{unix_millis}.{ext}`; an existing key is never
    /// overwritten.
    pub fn upload_image(
        &self,
        actor: Option<&str>,
        file_name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<UploadedImage, DiaryError> {
        let user_id = actor.ok_or(DiaryError::AuthRequired)?;
        if data.is_empty() {
            return Err(DiaryError::Validation("image is empty".into()));
        }
        if !content_type.starts_with("image/") {
            return Err(DiaryError::Validation(format!(
                "expected an image, got {:?}",
                content_type
            )));
        }

        let key = format!(
            "{}/{}.{}",
            user_id,
            chrono::Utc::now().timestamp_millis(),
            image_extension(file_name)
        );
        let url = self.blob.upload(&key, data, content_type)?;
        tracing::info!("{} uploaded {} ({} bytes)", user_id, key, data.len());
        Ok(UploadedImage { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::test_service;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("pasta.PNG"), "png");
        assert_eq!(image_extension("IMG_0001.jpeg"), "jpeg");
        assert_eq!(image_extension("noext"), "jpg");
        assert_eq!(image_extension(""), "jpg");
        assert_eq!(image_extension("x.p/ng"), "jpg");
    }

    #[test]
    fn test_upload_image() {
        let (svc, dir) = test_service();
        let uploaded = svc
            .upload_image(Some("u1"), "carbonara.webp", b"RIFF....WEBP", "image/webp")
            .unwrap();
        assert!(uploaded.url.starts_with("http://localhost/blobs/u1/"));
        assert!(uploaded.url.ends_with(".webp"));

        let key = uploaded.url.trim_start_matches("http://localhost/blobs/");
        assert!(dir.path().join(key).is_file());
        assert_eq!(svc.blob.get(key).unwrap(), Some(b"RIFF....WEBP".to_vec()));
    }

    #[test]
    fn test_upload_rejects_bad_input() {
        let (svc, _dir) = test_service();
        assert!(matches!(
            svc.upload_image(Some("u1"), "a.jpg", b"", "image/jpeg"),
            Err(DiaryError::Validation(_))
        ));
        assert!(matches!(
            svc.upload_image(Some("u1"), "a.pdf", b"%PDF", "application/pdf"),
            Err(DiaryError::Validation(_))
        ));
        assert!(matches!(
            svc.upload_image(None, "a.jpg", b"jpeg", "image/jpeg"),
            Err(DiaryError::AuthRequired)
        ));
    }
}

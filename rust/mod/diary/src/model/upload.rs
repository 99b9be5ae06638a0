use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

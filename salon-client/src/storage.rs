//! Product image storage
//!
//! Images live in one public bucket. A URL is "hosted" when it starts with
//! the bucket's public prefix; everything else (external links) is left
//! alone by the application.

use std::path::Path;

use uuid::Uuid;

use crate::{ClientError, ClientResult};

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Storage(format!("read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// Lowercase file extension, `bin` when missing
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }

    /// Content type guessed from the file name
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Public URL namespace of the image bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageNamespace {
    root: String,
    bucket: String,
}

impl StorageNamespace {
    /// `root` is the storage API root, e.g. `https://host/storage/v1`
    pub fn new(root: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `{root}/object/public/{bucket}/`
    pub fn public_prefix(&self) -> String {
        format!("{}/object/public/{}/", self.root, self.bucket)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}", self.public_prefix(), key)
    }

    /// Authenticated object endpoint used for upload and delete
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.root, self.bucket, key)
    }

    /// Whether the URL points into this bucket
    pub fn owns(&self, url: &str) -> bool {
        self.key_of(url).is_some()
    }

    /// Object key of a hosted URL
    pub fn key_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_prefix().as_str())
            .filter(|key| !key.is_empty())
    }

    /// Fresh `{uuid}.{ext}` key for an upload
    pub fn new_key(&self, upload: &ImageUpload) -> String {
        format!("{}.{}", Uuid::new_v4(), upload.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace() -> StorageNamespace {
        StorageNamespace::new("https://host/storage/v1", "img")
    }

    #[test]
    fn test_owns_hosted_urls_only() {
        let ns = namespace();
        assert!(ns.owns("https://host/storage/v1/object/public/img/a.png"));
        assert_eq!(
            ns.key_of("https://host/storage/v1/object/public/img/a.png"),
            Some("a.png")
        );
        assert!(!ns.owns("https://cdn.example.com/a.png"));
        assert!(!ns.owns("https://host/storage/v1/object/public/other/a.png"));
        assert!(!ns.owns("https://host/storage/v1/object/public/img/"));
    }

    #[test]
    fn test_new_key_keeps_extension() {
        let ns = namespace();
        let key = ns.new_key(&ImageUpload::new("Photo.JPG", vec![1, 2]));
        assert!(key.ends_with(".jpg"));
        assert_eq!(key.len(), 36 + 4);

        let key = ns.new_key(&ImageUpload::new("noext", vec![]));
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(ImageUpload::new("a.png", vec![]).content_type(), "image/png");
        assert_eq!(
            ImageUpload::new("a", vec![]).content_type(),
            "application/octet-stream"
        );
    }
}

use std::fmt;
use uuid::Uuid;

/// A file picked by the user for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AssetFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Rejection reported by an uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError(pub String);

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a file into a URL usable by image, banner and hotspot blocks
pub trait AssetUploader {
    fn upload(&mut self, file: &AssetFile) -> Result<String, UploadError>;
}

/// Session-scoped uploader that hands out `blob:` URLs and keeps the bytes in memory
#[derive(Debug)]
pub struct BlobUploader {
    session: String,
    assets: Vec<(String, AssetFile)>,
    max_bytes: Option<usize>,
}

impl Default for BlobUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobUploader {
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4().simple().to_string(),
            assets: Vec::new(),
            max_bytes: None,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn get(&self, url: &str) -> Option<&AssetFile> {
        self.assets.iter().find(|(u, _)| u == url).map(|(_, f)| f)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetUploader for BlobUploader {
    fn upload(&mut self, file: &AssetFile) -> Result<String, UploadError> {
        if file.bytes.is_empty() {
            return Err(UploadError(format!("'{}' is empty", file.name)));
        }
        if !file.is_image() {
            return Err(UploadError(format!(
                "'{}' is not an image ({})",
                file.name, file.mime_type
            )));
        }
        if let Some(max) = self.max_bytes {
            if file.bytes.len() > max {
                return Err(UploadError(format!(
                    "'{}' is {} bytes, limit is {}",
                    file.name,
                    file.bytes.len(),
                    max
                )));
            }
        }
        let url = format!("blob:{}/{}", self.session, Uuid::new_v4());
        self.assets.push((url.clone(), file.clone()));
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_upload_returns_distinct_urls() {
        let mut up = BlobUploader::new();
        let file = AssetFile::new("a.png", "image/png", vec![1, 2, 3]);
        let a = up.upload(&file).unwrap();
        let b = up.upload(&file).unwrap();
        assert!(a.starts_with("blob:"));
        assert_ne!(a, b);
        assert_eq!(up.get(&a), Some(&file));
    }

    #[test]
    fn test_rejects_non_images_and_oversize() {
        let mut up = BlobUploader::new().with_max_bytes(2);
        assert!(up.upload(&AssetFile::new("a.txt", "text/plain", vec![1])).is_err());
        assert!(up.upload(&AssetFile::new("a.png", "image/png", vec![])).is_err());
        assert!(up.upload(&AssetFile::new("a.png", "image/png", vec![1, 2, 3])).is_err());
        assert!(up.is_empty());
    }
}

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Errors from storing or reading profile pictures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Unsupported picture type: {0}")]
    UnsupportedType(String),

    #[error("Picture exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Picture is empty")]
    Empty,

    #[error("Picture storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// File extension for an accepted image content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Profile pictures kept on the local filesystem
///
/// Each upload gets a fresh file name, so a replaced picture never
/// overwrites one a concurrent reader may still be serving.
pub struct PictureStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl PictureStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate and write a picture, returning the stored path
    pub async fn save(&self, user_id: Uuid, content_type: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let ext = extension_for(content_type)
            .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge { limit: self.max_bytes });
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}-{}.{}", user_id, Uuid::new_v4().simple(), ext));
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored {} byte picture for {} at {}", bytes.len(), user_id, path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Read a stored picture; `None` when the file is gone
    pub async fn load(&self, path: &str) -> Result<Option<Vec<u8>>, UploadError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored picture; a file that is already gone is not an error
    pub async fn remove(&self, path: &str) -> Result<(), UploadError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

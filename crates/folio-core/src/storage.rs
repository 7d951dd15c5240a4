use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::FolioError;

/// A file read from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename from the upload
    pub filename: String,
    /// Lowercased extension without the dot
    pub extension: String,
    pub data: Bytes,
}

/// A stored file ready to be served.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Storage backend for the resume and profile picture files.
///
/// Files are addressed by fixed names (`resume_en.pdf`,
/// `profile_picture.png`, ...), so a write replaces the previous version.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), FolioError>;

    /// `None` when the file does not exist.
    async fn get(&self, name: &str) -> Result<Option<StoredFile>, FolioError>;

    /// Deleting a missing file is not an error.
    async fn delete(&self, name: &str) -> Result<(), FolioError>;

    async fn exists(&self, name: &str) -> Result<bool, FolioError>;
}

/// Local filesystem storage backend.
///
/// ```rust,ignore
/// let storage = LocalStorage::new("./uploads");
/// storage.put("resume_en.pdf", &bytes).await?;
/// ```
#[derive(Clone)]
pub struct LocalStorage {
    pub upload_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        LocalStorage {
            upload_dir: upload_dir.into(),
        }
    }

    /// Ensure the upload directory exists.
    pub async fn ensure_dir(&self) -> Result<(), FolioError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| FolioError::Internal(format!("Failed to create upload dir: {}", e)))
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, FolioError> {
        // Names are fixed by the server; reject anything that could escape the dir.
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(FolioError::BadRequest(format!("Invalid file name '{}'", name)));
        }
        Ok(self.upload_dir.join(name))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), FolioError> {
        self.ensure_dir().await?;
        let path = self.path_for(name)?;

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| FolioError::Internal(format!("Failed to write file: {}", e)))
    }

    async fn get(&self, name: &str) -> Result<Option<StoredFile>, FolioError> {
        let path = self.path_for(name)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(StoredFile {
                name: name.to_string(),
                content_type: content_type_for(name),
                data,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FolioError::Internal(format!("Failed to read file: {}", e))),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), FolioError> {
        let path = self.path_for(name)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FolioError::Internal(format!("Failed to delete file: {}", e))),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, FolioError> {
        let path = self.path_for(name)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FolioError::Internal(format!("Failed to stat file: {}", e)))
    }
}

/// Read the multipart field called `field_name`, skipping any others.
pub async fn read_upload_field(
    mut multipart: Multipart,
    field_name: &str,
    max_size: u64,
) -> Result<UploadedFile, FolioError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FolioError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| FolioError::BadRequest(format!("Failed to read field: {}", e)))?;

        if data.is_empty() {
            return Err(FolioError::BadRequest("No file uploaded".to_string()));
        }
        if data.len() as u64 > max_size {
            return Err(FolioError::BadRequest(format!(
                "File exceeds maximum size of {} bytes",
                max_size
            )));
        }

        return Ok(UploadedFile {
            extension: extension_of(&filename),
            filename,
            data,
        });
    }

    Err(FolioError::BadRequest("No file uploaded".to_string()))
}

/// Helper to validate allowed file extensions.
pub fn validate_extension(filename: &str, allowed: &[&str]) -> Result<(), FolioError> {
    let ext = extension_of(filename);

    if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)) {
        return Err(FolioError::BadRequest(format!(
            "File type '.{}' not allowed. Allowed: {}",
            ext,
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// MIME type guessed from the file name.
pub fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .to_string()
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

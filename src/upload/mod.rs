//! Image upload validation and on-disk storage.
//!
//! A request's files are all checked before the first one is written, so a
//! rejected request leaves nothing behind.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::UploadConfig;

/// Multipart part name that carries image files
pub const IMAGE_FIELD: &str = "images";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Too many files: at most {max} images per request")]
    TooManyFiles { max: usize },

    #[error("File too large: '{file_name}' exceeds {max} bytes")]
    FileTooLarge { file_name: String, max: usize },

    #[error("Please upload an image file (jpg, jpeg, png): '{file_name}'")]
    InvalidExtension { file_name: String },

    #[error("Unexpected field: '{0}'")]
    UnexpectedField(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A file received in a request, not yet validated or written
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    config: UploadConfig,
}

impl ImageStorage {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// URL path the stored files are served under, e.g. `/uploads`
    pub fn route(&self) -> String {
        format!("/{}", self.config.public_prefix.trim_matches('/'))
    }

    pub fn validate(&self, images: &[IncomingImage]) -> Result<(), UploadError> {
        if images.len() > self.config.max_files {
            return Err(UploadError::TooManyFiles {
                max: self.config.max_files,
            });
        }
        for image in images {
            if self.extension_of(&image.file_name).is_none() {
                return Err(UploadError::InvalidExtension {
                    file_name: image.file_name.clone(),
                });
            }
            if image.bytes.len() > self.config.max_file_size_bytes {
                return Err(UploadError::FileTooLarge {
                    file_name: image.file_name.clone(),
                    max: self.config.max_file_size_bytes,
                });
            }
        }
        Ok(())
    }

    /// Validate and write every image, returning storage references in input order.
    pub async fn store_all(&self, images: Vec<IncomingImage>) -> Result<Vec<String>, UploadError> {
        self.validate(&images)?;
        if images.is_empty() {
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(&self.config.dir).await?;

        let mut references = Vec::with_capacity(images.len());
        for image in images {
            // validate() already guaranteed an allowed extension
            let extension = self.extension_of(&image.file_name).unwrap_or_default();
            let stored_name = format!(
                "{}-{}.{}",
                Utc::now().timestamp_millis(),
                Uuid::new_v4().simple(),
                extension
            );
            let path: PathBuf = self.config.dir.join(&stored_name);
            tokio::fs::write(&path, &image.bytes).await?;
            debug!("Stored upload '{}' as {}", image.file_name, path.display());

            references.push(format!(
                "{}/{}",
                self.config.public_prefix.trim_end_matches('/'),
                stored_name
            ));
        }
        Ok(references)
    }

    /// Remove files written for a request that then failed. Errors are only logged.
    pub async fn discard(&self, references: &[String]) {
        let prefix = format!("{}/", self.config.public_prefix.trim_end_matches('/'));
        for reference in references {
            let Some(stored_name) = reference.strip_prefix(&prefix) else {
                continue;
            };
            let path = self.config.dir.join(stored_name);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to discard upload {}: {}", path.display(), e);
            }
        }
    }

    /// The file's extension if it is on the allow-list. Matching is case-sensitive.
    fn extension_of<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let (_, extension) = file_name.rsplit_once('.')?;
        self.config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed == extension)
            .then_some(extension)
    }
}

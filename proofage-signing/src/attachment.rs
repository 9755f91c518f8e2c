//! File attachments for multipart requests.

use crate::mac::sha256_hex;
use crate::{Result, SigningError};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Where an attachment's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Bytes(Bytes),
    Path(PathBuf),
}

/// A file to upload under a multipart field name.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    field: String,
    file_name: Option<String>,
    source: FileSource,
}

/// An attachment whose content has been read and hashed.
///
/// `content` is exactly what was hashed, so transmitting it keeps the
/// signature valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content: Bytes,
    pub sha256: String,
}

impl FileAttachment {
    /// Attach an in-memory buffer.
    pub fn from_bytes(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: Some(file_name.into()),
            source: FileSource::Bytes(content.into()),
        }
    }

    /// Attach a file from disk. It is read when the request is signed.
    pub fn from_path(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Self {
            field: field.into(),
            file_name,
            source: FileSource::Path(path),
        }
    }

    /// Override the file name sent in the multipart part.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the full content and compute its SHA-256.
    ///
    /// Blocks on disk I/O for path sources.
    pub fn load(&self) -> Result<HashedFile> {
        let content = match &self.source {
            FileSource::Bytes(bytes) => bytes.clone(),
            FileSource::Path(path) => read_file(path)?,
        };

        Ok(HashedFile {
            field: self.field.clone(),
            file_name: self.file_name.clone(),
            sha256: sha256_hex(&content),
            content,
        })
    }
}

fn read_file(path: &Path) -> Result<Bytes> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|source| SigningError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

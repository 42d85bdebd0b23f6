//! Local upload guard.
//!
//! Size and type are checked before any bytes leave the machine. This is a
//! user-experience guard only; the storage backend still has the final say.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, SourceError, ValidationError};
use crate::session::TenantScope;
use crate::storage::{ObjectStorage, StoredObject};

const MIB: u64 = 1024 * 1024;

/// Form fields that accept file uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadField {
    /// Packaged course content (SCORM zip).
    ScormPackage,
    /// Launch/index document of a course.
    IndexFile,
}

/// Limits applied to one upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub extensions: &'static [&'static str],
    pub content_types: &'static [&'static str],
}

impl UploadField {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScormPackage => "SCORM package",
            Self::IndexFile => "index file",
        }
    }

    pub const fn bucket(&self) -> &'static str {
        match self {
            Self::ScormPackage => "course-packages",
            Self::IndexFile => "course-content",
        }
    }

    pub const fn policy(&self) -> UploadPolicy {
        match self {
            Self::ScormPackage => UploadPolicy {
                max_bytes: 100 * MIB,
                extensions: &["zip"],
                content_types: &["application/zip", "application/x-zip-compressed"],
            },
            Self::IndexFile => UploadPolicy {
                max_bytes: 10 * MIB,
                extensions: &["html", "htm", "xml"],
                content_types: &["text/html", "application/xml", "text/xml"],
            },
        }
    }
}

#[derive(Debug, Clone)]
enum UploadBody {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A file picked for upload. The body is only read after validation passes.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub size: u64,
    /// Type declared by the picker, if any.
    pub content_type: Option<String>,
    body: UploadBody,
}

impl FileUpload {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            size: bytes.len() as u64,
            content_type: None,
            body: UploadBody::Bytes(bytes),
        }
    }

    /// Describe a file on disk from its metadata without reading it.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| SourceError::Io {
                operation: "inspect",
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file_name,
            size: metadata.len(),
            content_type: None,
            body: UploadBody::Path(path.to_path_buf()),
        })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Declared type, or the type guessed from the file extension.
    pub fn effective_content_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string()
        })
    }

    async fn read_body(self) -> Result<Vec<u8>> {
        match self.body {
            UploadBody::Bytes(bytes) => Ok(bytes),
            UploadBody::Path(path) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| SourceError::Io {
                        operation: "read",
                        path,
                        source,
                    })
            }
        }
    }
}

impl UploadPolicy {
    /// Check size and type. An extension, when present, must be allowed,
    /// and so must a declared content type; a file with neither is rejected.
    pub fn check(&self, field: UploadField, file: &FileUpload) -> std::result::Result<(), ValidationError> {
        if file.size == 0 {
            return Err(ValidationError::EmptyFile(file.file_name.clone()));
        }
        if file.size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                field: field.name(),
                size: file.size,
                limit: self.max_bytes,
            });
        }
        let extension = file.extension();
        let extension_ok = extension
            .as_deref()
            .is_none_or(|ext| self.extensions.iter().any(|allowed| *allowed == ext));
        let declared_ok = file.content_type.as_deref().is_none_or(|declared| {
            self.content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(declared))
        });
        let known = extension.is_some() || file.content_type.is_some();
        if !(known && extension_ok && declared_ok) {
            return Err(ValidationError::UnsupportedType {
                field: field.name(),
                found: file.effective_content_type(),
                allowed: self.extensions.join(", "),
            });
        }
        Ok(())
    }
}

/// Validate `file` for `field`, then store it under the tenant's prefix.
///
/// Nothing is sent to `storage` when validation fails.
pub async fn upload_checked<S>(
    storage: &S,
    scope: &TenantScope,
    field: UploadField,
    file: FileUpload,
) -> Result<StoredObject>
where
    S: ObjectStorage,
{
    if let Err(err) = field.policy().check(field, &file) {
        warn!(field = field.name(), file = %file.file_name, error = %err, "upload rejected locally");
        return Err(err.into());
    }
    let path = format!(
        "{}/{}-{}",
        scope.tenant(),
        uuid::Uuid::new_v4().simple(),
        file.file_name
    );
    let content_type = file.effective_content_type();
    let bytes = file.read_body().await?;
    let stored = storage
        .upload(field.bucket(), &path, bytes, &content_type)
        .await?;
    info!(bucket = %stored.bucket, path = %stored.path, size = stored.size, "uploaded file");
    Ok(stored)
}

//! File acquisition
//!
//! Files arrive as a path from the command line, the open prompt, or a
//! path dropped onto the terminal. Only the media type derived from the
//! extension is checked; the bytes themselves are left to the decoder.

use std::fs;
use std::path::{Path, PathBuf};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("Please select a valid PDF file!")]
    InvalidFileType { name: String, media_type: String },

    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file the user picked
#[derive(Clone, PartialEq, Eq)]
pub struct FileSelection {
    /// Name shown in the controls bar
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelection")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FileSelection {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    /// Reject anything not tagged as a PDF
    pub fn validate(self) -> Result<Self, AcquireError> {
        if self.is_pdf() {
            Ok(self)
        } else {
            Err(AcquireError::InvalidFileType {
                name: self.name,
                media_type: self.media_type,
            })
        }
    }
}

/// Media type for a path, from its extension
#[must_use]
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => PDF_MEDIA_TYPE,
        Some("epub") => "application/epub+zip",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("html" | "htm") => "text/html",
        _ => "application/octet-stream",
    }
}

/// Turn pasted or typed text into a path.
///
/// Terminals quote or escape dropped paths differently; this strips
/// surrounding quotes, `file://` prefixes and backslash escapes.
#[must_use]
pub fn parse_dropped_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| {
            trimmed
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
        })
        .unwrap_or(trimmed);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);

    let mut path = String::with_capacity(without_scheme.len());
    let mut chars = without_scheme.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                path.push(next);
            }
        } else {
            path.push(c);
        }
    }

    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Read and validate a file.
///
/// The media type is checked before any bytes are read.
pub fn acquire(path: &Path) -> Result<FileSelection, AcquireError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type_for(path);

    if media_type != PDF_MEDIA_TYPE {
        return Err(AcquireError::InvalidFileType {
            name,
            media_type: media_type.to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|source| AcquireError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    FileSelection::new(name, media_type, bytes).validate()
}

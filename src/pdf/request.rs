//! Worker request and response types

use std::sync::Arc;

use super::scale::WidthPolicy;
use super::types::{PageData, ViewportGeometry};

/// Unique identifier for worker requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Parameters for rendering a page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// Host viewport at the time the render was issued
    pub geometry: ViewportGeometry,
    /// Available width policy
    pub policy: WidthPolicy,
}

/// Request sent to the render worker
#[derive(Debug)]
pub enum WorkerRequest {
    /// Decode a new document, replacing the current one
    Load { id: RequestId, bytes: Vec<u8> },

    /// Rasterize a page of the current document (1-indexed)
    Page {
        id: RequestId,
        page: usize,
        params: RenderParams,
    },

    /// Drop the current document
    Close,

    /// Shutdown the worker
    Shutdown,
}

/// Errors from the render worker
#[derive(Debug, thiserror::Error)]
pub enum WorkerFault {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("no document is loaded")]
    NoDocument,

    #[error("page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("{detail}")]
    Generic { detail: String },
}

impl WorkerFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Response from the render worker
#[derive(Debug)]
pub enum WorkerResponse {
    /// Document decoded
    Loaded { id: RequestId, page_count: usize },

    /// Rendered page
    Page { id: RequestId, data: Arc<PageData> },

    /// Error while decoding or rendering
    Error { id: RequestId, error: WorkerFault },
}

impl WorkerResponse {
    #[must_use]
    pub fn id(&self) -> RequestId {
        match self {
            Self::Loaded { id, .. } | Self::Page { id, .. } | Self::Error { id, .. } => *id,
        }
    }
}

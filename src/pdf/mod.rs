//! PDF rendering infrastructure

mod cache;
mod decoder;
mod request;
mod scale;
mod service;
mod state;
mod types;
mod worker;

pub use cache::{CacheKey, PageCache};
pub use decoder::{DecodedDocument, PdfDecoder};
#[cfg(feature = "pdf")]
pub use decoder::{MupdfDecoder, MupdfDocument};
pub use request::{RenderParams, RequestId, WorkerFault, WorkerRequest, WorkerResponse};
pub use scale::{DEFAULT_MAX_WIDTH, DEFAULT_WIDTH_FRACTION, RenderScale, WidthPolicy};
pub use service::RenderService;
pub use state::{Command, Effect, NavigationState};
pub use types::*;
pub use worker::render_page;

/// Rendered pages kept by the worker
pub const DEFAULT_CACHE_SIZE: usize = 8;

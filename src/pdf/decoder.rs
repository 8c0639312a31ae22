//! Decoder capability
//!
//! All knowledge of the PDF binary format lives behind these traits. The
//! render worker is generic over the decoder so tests can swap MuPDF for a
//! synthetic document.

use super::request::WorkerFault;
use super::types::{PageSize, RasterImage};

/// Turns raw bytes into a decoded document
pub trait PdfDecoder: Send + 'static {
    type Document: DecodedDocument;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Document, WorkerFault>;
}

/// A decoded document, living on the worker thread
pub trait DecodedDocument {
    /// Number of pages, fixed at decode time
    fn page_count(&self) -> usize;

    /// Intrinsic size of a page (0-indexed) at scale 1
    fn page_size(&self, index: usize) -> Result<PageSize, WorkerFault>;

    /// Rasterize a page (0-indexed) at `scale` into RGBA pixels
    fn rasterize(&self, index: usize, scale: f32) -> Result<RasterImage, WorkerFault>;
}

#[cfg(feature = "pdf")]
pub use self::mupdf_backend::{MupdfDecoder, MupdfDocument};

#[cfg(feature = "pdf")]
mod mupdf_backend {
    use mupdf::{Colorspace, Document, Matrix, Pixmap};

    use super::{DecodedDocument, PdfDecoder};
    use crate::pdf::request::WorkerFault;
    use crate::pdf::types::{PageSize, RasterImage};

    const PDF_MAGIC: &str = "application/pdf";

    /// MuPDF-backed decoder
    #[derive(Clone, Copy, Debug, Default)]
    pub struct MupdfDecoder;

    pub struct MupdfDocument {
        doc: Document,
        page_count: usize,
    }

    impl PdfDecoder for MupdfDecoder {
        type Document = MupdfDocument;

        fn decode(&self, bytes: &[u8]) -> Result<MupdfDocument, WorkerFault> {
            let doc = Document::from_bytes(bytes, PDF_MAGIC)?;
            let page_count = doc.page_count()?.max(0) as usize;
            Ok(MupdfDocument { doc, page_count })
        }
    }

    impl DecodedDocument for MupdfDocument {
        fn page_count(&self) -> usize {
            self.page_count
        }

        fn page_size(&self, index: usize) -> Result<PageSize, WorkerFault> {
            let page = self.doc.load_page(index as i32)?;
            let bounds = page.bounds()?;
            Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
        }

        fn rasterize(&self, index: usize, scale: f32) -> Result<RasterImage, WorkerFault> {
            let page = self.doc.load_page(index as i32)?;
            let transform = Matrix::new_scale(scale, scale);
            let rgb = Colorspace::device_rgb();
            let pixmap = page.to_pixmap(&transform, &rgb, false, false)?;

            Ok(RasterImage {
                pixels: pixmap_to_rgba(&pixmap)?,
                width_px: pixmap.width(),
                height_px: pixmap.height(),
            })
        }
    }

    fn pixmap_to_rgba(pixmap: &Pixmap) -> Result<Vec<u8>, WorkerFault> {
        let n = pixmap.n() as usize;
        if n < 3 {
            return Err(WorkerFault::generic(format!(
                "Unsupported pixmap format: {n} channels"
            )));
        }

        let width = pixmap.width() as usize;
        let height = pixmap.height() as usize;
        let stride = pixmap.stride() as usize;
        let samples = pixmap.samples();
        let row_bytes = width * n;
        let expected_min = stride.saturating_mul(height);
        if samples.len() < expected_min || row_bytes > stride {
            return Err(WorkerFault::generic("Pixmap buffer size mismatch"));
        }

        let mut out = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let row_start = y * stride;
            let row = &samples[row_start..row_start + row_bytes];
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
                out.push(u8::MAX);
            }
        }

        Ok(out)
    }
}

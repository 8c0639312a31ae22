//! Synthetic decoder for tests
//!
//! Produces documents of fixed-size pages whose pixels encode the page
//! number, so tests can tell which page ended up on the surface.

use crate::pdf::{DecodedDocument, PageSize, PdfDecoder, RasterImage, WorkerFault};

/// US Letter in PDF points
pub const LETTER: PageSize = PageSize::new(612.0, 792.0);

#[derive(Clone, Debug)]
pub struct FakeDecoder {
    page_sizes: Vec<PageSize>,
    fail_decode: bool,
}

impl FakeDecoder {
    /// A document with `pages` letter-sized pages
    pub fn with_pages(pages: usize) -> Self {
        Self::with_sizes(vec![LETTER; pages])
    }

    pub fn with_sizes(page_sizes: Vec<PageSize>) -> Self {
        Self {
            page_sizes,
            fail_decode: false,
        }
    }

    /// A decoder that rejects every buffer as corrupt
    pub fn corrupt() -> Self {
        Self {
            page_sizes: Vec::new(),
            fail_decode: true,
        }
    }

    /// The color every pixel of `page` (1-indexed) is painted with
    pub fn page_color(page: usize) -> [u8; 4] {
        let shade = (page * 37 % 256) as u8;
        [shade, 255 - shade, 128, 255]
    }
}

#[derive(Debug)]
pub struct FakeDocument {
    page_sizes: Vec<PageSize>,
}

impl PdfDecoder for FakeDecoder {
    type Document = FakeDocument;

    fn decode(&self, bytes: &[u8]) -> Result<FakeDocument, WorkerFault> {
        if self.fail_decode || !bytes.starts_with(b"%PDF") {
            return Err(WorkerFault::generic("cannot parse document"));
        }
        Ok(FakeDocument {
            page_sizes: self.page_sizes.clone(),
        })
    }
}

impl DecodedDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, WorkerFault> {
        self.page_sizes
            .get(index)
            .copied()
            .ok_or_else(|| WorkerFault::generic(format!("no page at index {index}")))
    }

    fn rasterize(&self, index: usize, scale: f32) -> Result<RasterImage, WorkerFault> {
        let size = self.page_size(index)?;
        let width_px = (size.width * scale).round().max(1.0) as u32;
        let height_px = (size.height * scale).round().max(1.0) as u32;
        let color = FakeDecoder::page_color(index + 1);

        Ok(RasterImage {
            pixels: color.repeat(width_px as usize * height_px as usize),
            width_px,
            height_px,
        })
    }
}

//! PDF render worker - runs in a dedicated thread
//!
//! The decoded document never leaves this thread. Requests are handled
//! strictly in the order they were sent.

use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{debug, error, info};

use super::cache::{CacheKey, PageCache};
use super::decoder::{DecodedDocument, PdfDecoder};
use super::request::{RenderParams, WorkerFault, WorkerRequest, WorkerResponse};
use super::scale::RenderScale;
use super::types::PageData;

/// Main worker function
#[expect(
    clippy::needless_pass_by_value,
    reason = "Values moved into thread, need ownership"
)]
pub fn render_worker<D: PdfDecoder>(
    decoder: D,
    requests: Receiver<WorkerRequest>,
    responses: Sender<WorkerResponse>,
    cache_size: usize,
) {
    let mut document: Option<D::Document> = None;
    let mut cache = PageCache::new(cache_size);

    for request in requests {
        match request {
            WorkerRequest::Load { id, bytes } => {
                document = None;
                cache.invalidate_all();

                let response = match decode(&decoder, &bytes) {
                    Ok(doc) => {
                        let page_count = doc.page_count();
                        info!("Decoded document: {page_count} pages");
                        document = Some(doc);
                        WorkerResponse::Loaded { id, page_count }
                    }
                    Err(error) => {
                        error!("Failed to decode document: {error}");
                        WorkerResponse::Error { id, error }
                    }
                };
                let _ = responses.send(response);
            }

            WorkerRequest::Page { id, page, params } => {
                let response = match document.as_ref() {
                    Some(doc) => match render_page(doc, page, &params, &mut cache) {
                        Ok(data) => WorkerResponse::Page { id, data },
                        Err(error) => WorkerResponse::Error { id, error },
                    },
                    None => WorkerResponse::Error {
                        id,
                        error: WorkerFault::NoDocument,
                    },
                };
                let _ = responses.send(response);
            }

            WorkerRequest::Close => {
                document = None;
                cache.invalidate_all();
            }

            WorkerRequest::Shutdown => break,
        }
    }

    debug!("Render worker exiting");
}

fn decode<D: PdfDecoder>(decoder: &D, bytes: &[u8]) -> Result<D::Document, WorkerFault> {
    let doc = decoder.decode(bytes)?;
    if doc.page_count() == 0 {
        return Err(WorkerFault::EmptyDocument);
    }
    Ok(doc)
}

/// Render a page (1-indexed) for the given viewport, reusing a cached
/// raster when page and pixel size match
pub fn render_page<T: DecodedDocument>(
    doc: &T,
    page: usize,
    params: &RenderParams,
    cache: &mut PageCache,
) -> Result<Arc<PageData>, WorkerFault> {
    let index = page_index(doc, page)?;
    let size = doc.page_size(index)?;
    let scale = RenderScale::compute(size, &params.geometry, &params.policy);
    let key = CacheKey::new(page, &scale);

    if let Some(cached) = cache.get(&key) {
        return Ok(cached);
    }

    let data = rasterize(doc, page, &scale)?;
    Ok(cache.insert(key, data))
}

fn rasterize<T: DecodedDocument>(
    doc: &T,
    page: usize,
    scale: &RenderScale,
) -> Result<PageData, WorkerFault> {
    let image = doc.rasterize(page - 1, scale.raster_scale)?;
    if image.pixels.len() != image.width_px as usize * image.height_px as usize * 4 {
        return Err(WorkerFault::generic("Raster buffer size mismatch"));
    }

    Ok(PageData {
        page,
        scale: scale.scale,
        image,
    })
}

fn page_index<T: DecodedDocument>(doc: &T, page: usize) -> Result<usize, WorkerFault> {
    let page_count = doc.page_count();
    if page == 0 || page > page_count {
        return Err(WorkerFault::PageOutOfRange { page, page_count });
    }
    Ok(page - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::request::RequestId;
    use crate::pdf::scale::WidthPolicy;
    use crate::pdf::types::ViewportGeometry;
    use crate::test_utils::FakeDecoder;

    fn params(width: u16) -> RenderParams {
        RenderParams {
            geometry: ViewportGeometry::new(width, 40, 1),
            policy: WidthPolicy::default(),
        }
    }

    #[test]
    fn render_page_sizes_raster_to_scale() {
        let doc = FakeDecoder::with_pages(3).decode(b"%PDF").unwrap();
        let mut cache = PageCache::new(2);
        let data = render_page(&doc, 2, &params(68), &mut cache).unwrap();

        assert_eq!(data.page, 2);
        assert_eq!(data.image.width_px, 61);
        assert_eq!(data.image.height_px, 79);
    }

    #[test]
    fn render_page_rejects_out_of_range() {
        let doc = FakeDecoder::with_pages(3).decode(b"%PDF").unwrap();
        let mut cache = PageCache::new(2);

        assert!(matches!(
            render_page(&doc, 0, &params(68), &mut cache),
            Err(WorkerFault::PageOutOfRange { page: 0, .. })
        ));
        assert!(matches!(
            render_page(&doc, 4, &params(68), &mut cache),
            Err(WorkerFault::PageOutOfRange {
                page: 4,
                page_count: 3
            })
        ));
    }

    #[test]
    fn worker_reports_empty_documents() {
        let (req_tx, req_rx) = flume::unbounded();
        let (resp_tx, resp_rx) = flume::unbounded();

        req_tx
            .send(WorkerRequest::Load {
                id: RequestId::new(1),
                bytes: b"%PDF".to_vec(),
            })
            .unwrap();
        req_tx.send(WorkerRequest::Shutdown).unwrap();
        render_worker(FakeDecoder::with_pages(0), req_rx, resp_tx, 4);

        assert!(matches!(
            resp_rx.recv().unwrap(),
            WorkerResponse::Error {
                error: WorkerFault::EmptyDocument,
                ..
            }
        ));
    }

    #[test]
    fn worker_rejects_pages_after_close() {
        let (req_tx, req_rx) = flume::unbounded();
        let (resp_tx, resp_rx) = flume::unbounded();

        req_tx
            .send(WorkerRequest::Load {
                id: RequestId::new(1),
                bytes: b"%PDF".to_vec(),
            })
            .unwrap();
        req_tx.send(WorkerRequest::Close).unwrap();
        req_tx
            .send(WorkerRequest::Page {
                id: RequestId::new(2),
                page: 1,
                params: params(68),
            })
            .unwrap();
        req_tx.send(WorkerRequest::Shutdown).unwrap();
        render_worker(FakeDecoder::with_pages(2), req_rx, resp_tx, 4);

        assert!(matches!(
            resp_rx.recv().unwrap(),
            WorkerResponse::Loaded { page_count: 2, .. }
        ));
        assert!(matches!(
            resp_rx.recv().unwrap(),
            WorkerResponse::Error {
                error: WorkerFault::NoDocument,
                ..
            }
        ));
    }

    #[test]
    fn repeated_renders_share_cached_data() {
        let (req_tx, req_rx) = flume::unbounded();
        let (resp_tx, resp_rx) = flume::unbounded();

        req_tx
            .send(WorkerRequest::Load {
                id: RequestId::new(1),
                bytes: b"%PDF".to_vec(),
            })
            .unwrap();
        for id in 2..=3 {
            req_tx
                .send(WorkerRequest::Page {
                    id: RequestId::new(id),
                    page: 1,
                    params: params(68),
                })
                .unwrap();
        }
        req_tx.send(WorkerRequest::Shutdown).unwrap();
        render_worker(FakeDecoder::with_pages(2), req_rx, resp_tx, 4);

        let _loaded = resp_rx.recv().unwrap();
        let (WorkerResponse::Page { data: first, .. }, WorkerResponse::Page { data: second, .. }) =
            (resp_rx.recv().unwrap(), resp_rx.recv().unwrap())
        else {
            panic!("expected two page responses");
        };
        assert!(Arc::ptr_eq(&first, &second));
    }
}

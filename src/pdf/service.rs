//! Render service - owns the worker thread and request bookkeeping

use std::collections::HashSet;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError, Sender};
use log::warn;

use super::DEFAULT_CACHE_SIZE;
use super::decoder::PdfDecoder;
use super::request::{RenderParams, RequestId, WorkerRequest, WorkerResponse};
use super::worker::render_worker;

/// Front end of the render worker.
///
/// Hands out monotonically increasing request ids and tracks which requests
/// are still in flight.
pub struct RenderService {
    request_tx: Sender<WorkerRequest>,
    response_rx: Receiver<WorkerResponse>,
    next_request_id: u64,
    pending: HashSet<RequestId>,
    worker: Option<JoinHandle<()>>,
}

impl RenderService {
    /// Create a render service with the default cache size
    #[must_use]
    pub fn new<D: PdfDecoder>(decoder: D) -> Self {
        Self::with_cache_size(decoder, DEFAULT_CACHE_SIZE)
    }

    #[must_use]
    pub fn with_cache_size<D: PdfDecoder>(decoder: D, cache_size: usize) -> Self {
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        let worker = std::thread::Builder::new()
            .name("pdf-render".to_string())
            .spawn(move || render_worker(decoder, request_rx, response_tx, cache_size))
            .map_err(|e| warn!("Failed to spawn render worker: {e}"))
            .ok();

        Self {
            request_tx,
            response_rx,
            next_request_id: 1,
            pending: HashSet::new(),
            worker,
        }
    }

    /// Queue a document decode
    pub fn load(&mut self, bytes: Vec<u8>) -> RequestId {
        let id = self.next_id();
        self.send(id, WorkerRequest::Load { id, bytes });
        id
    }

    /// Queue a page render (1-indexed)
    pub fn request_page(&mut self, page: usize, params: RenderParams) -> RequestId {
        let id = self.next_id();
        self.send(id, WorkerRequest::Page { id, page, params });
        id
    }

    /// Drop the worker's document
    pub fn close(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Close);
    }

    fn send(&mut self, id: RequestId, request: WorkerRequest) {
        if self.request_tx.send(request).is_ok() {
            self.pending.insert(id);
        } else {
            warn!("Render worker is gone, dropping request {id:?}");
        }
    }

    /// Collect every response that is ready without blocking
    pub fn poll_responses(&mut self) -> Vec<WorkerResponse> {
        let mut responses = vec![];
        while let Ok(response) = self.response_rx.try_recv() {
            self.pending.remove(&response.id());
            responses.push(response);
        }
        responses
    }

    /// Block until every in-flight request has answered or `timeout` elapses
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<WorkerResponse> {
        let deadline = Instant::now() + timeout;
        let mut responses = vec![];

        while !self.pending.is_empty() {
            match self.response_rx.recv_deadline(deadline) {
                Ok(response) => {
                    self.pending.remove(&response.id());
                    responses.push(response);
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }

        responses
    }

    /// Stop the worker thread and wait for it to exit
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//! Page navigation and responsive re-render controller
//!
//! The viewer owns the navigation state, the document handle and the
//! drawing surface. Decoding and rasterizing happen on the render worker;
//! the viewer issues requests, then applies whatever comes back on the next
//! [`Viewer::pump`].
//!
//! Only the most recently issued render may touch the surface. Responses
//! for older requests, or for requests issued before a close, are dropped.

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::acquisition::{AcquireError, FileSelection};
use crate::pdf::{
    Command, Effect, NavigationState, PdfDecoder, RenderParams, RenderService, RequestId,
    ViewportGeometry, WidthPolicy, WorkerResponse,
};
use crate::resize::ResizeObserver;
use crate::surface::Surface;

/// A successfully decoded document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentHandle {
    pub name: String,
    pub page_count: usize,
    /// Id of the load request that produced this handle
    pub generation: RequestId,
}

/// Things the UI should tell the user about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewerEvent {
    Loaded { name: String, page_count: usize },
    LoadFailed { name: String, reason: String },
    RenderFailed { page: usize, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    pub policy: WidthPolicy,
    pub cache_size: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            policy: WidthPolicy::default(),
            cache_size: crate::pdf::DEFAULT_CACHE_SIZE,
        }
    }
}

#[derive(Debug)]
struct PendingLoad {
    id: RequestId,
    name: String,
}

#[derive(Clone, Copy, Debug)]
struct IssuedRender {
    id: RequestId,
    page: usize,
    pixel_density: u16,
}

pub struct Viewer {
    navigation: NavigationState,
    document: Option<DocumentHandle>,
    service: RenderService,
    surface: Surface,
    geometry: ViewportGeometry,
    policy: WidthPolicy,
    resize: ResizeObserver,
    pending_load: Option<PendingLoad>,
    latest_render: Option<IssuedRender>,
}

impl Viewer {
    pub fn new<D: PdfDecoder>(decoder: D, geometry: ViewportGeometry, config: ViewerConfig) -> Self {
        let mut resize = ResizeObserver::new();
        resize.subscribe(geometry);

        Self {
            navigation: NavigationState::Empty,
            document: None,
            service: RenderService::with_cache_size(decoder, config.cache_size),
            surface: Surface::new(),
            geometry,
            policy: config.policy,
            resize,
            pending_load: None,
            latest_render: None,
        }
    }

    /// Start decoding a selected file.
    ///
    /// Non-PDF selections are rejected without touching any state.
    pub fn open(&mut self, selection: FileSelection) -> Result<RequestId, AcquireError> {
        let selection = selection.validate().inspect_err(|e| {
            warn!("Rejected file: {e:?}");
        })?;

        info!(
            "Loading {} ({} bytes)",
            selection.name,
            selection.bytes.len()
        );
        let id = self.service.load(selection.bytes);
        self.pending_load = Some(PendingLoad {
            id,
            name: selection.name,
        });
        Ok(id)
    }

    /// Move by `delta` pages, clamped to the document
    pub fn advance(&mut self, delta: i64) {
        self.apply(Command::Advance(delta));
    }

    pub fn next_page(&mut self) {
        self.advance(1);
    }

    pub fn previous_page(&mut self) {
        self.advance(-1);
    }

    /// Drop the document and return to the empty state
    pub fn close(&mut self) {
        if self.document.is_some() || self.pending_load.is_some() {
            info!("Closing document");
            self.service.close();
        }
        self.document = None;
        self.pending_load = None;
        self.latest_render = None;
        self.apply(Command::Close);
        self.surface.clear();
    }

    /// Host resize notification
    pub fn on_resize(&mut self, geometry: ViewportGeometry) {
        if let Some(geometry) = self.resize.notify(geometry) {
            debug!("Viewport resized to {geometry:?}");
            self.geometry = geometry;
            self.apply(Command::Resize);
        }
    }

    /// Stop reacting to resizes and shut the worker down
    pub fn teardown(&mut self) {
        self.resize.unsubscribe();
        self.service.shutdown();
    }

    fn apply(&mut self, cmd: Command) {
        for effect in self.navigation.apply(cmd) {
            match effect {
                Effect::RenderPage(page) => self.render(page),
                Effect::ClearSurface => self.surface.clear(),
            }
        }
    }

    /// Ask the worker for `page`; a no-op without a document
    fn render(&mut self, page: usize) {
        if self.document.is_none() {
            return;
        }

        let params = RenderParams {
            geometry: self.geometry,
            policy: self.policy,
        };
        let id = self.service.request_page(page, params);
        debug!("Render {id:?} issued for page {page}");
        self.latest_render = Some(IssuedRender {
            id,
            page,
            pixel_density: self.geometry.density(),
        });
    }

    /// Apply every worker response that is ready
    pub fn pump(&mut self) -> Vec<ViewerEvent> {
        let responses = self.service.poll_responses();
        self.handle_responses(responses)
    }

    /// Block until the worker is idle, then apply everything it produced
    pub fn settle(&mut self, timeout: Duration) -> Vec<ViewerEvent> {
        let mut events = vec![];
        loop {
            let responses = self.service.wait_idle(timeout);
            if responses.is_empty() {
                break;
            }
            events.extend(self.handle_responses(responses));
        }
        events
    }

    fn handle_responses(&mut self, responses: Vec<WorkerResponse>) -> Vec<ViewerEvent> {
        let mut events = vec![];
        for response in responses {
            if let Some(event) = self.handle_response(response) {
                events.push(event);
            }
        }
        events
    }

    fn handle_response(&mut self, response: WorkerResponse) -> Option<ViewerEvent> {
        if self.pending_load.as_ref().map(|load| load.id) == Some(response.id()) {
            let load = self.pending_load.take()?;
            return self.finish_load(load, response);
        }

        let issued = self.latest_render.filter(|r| r.id == response.id());
        let Some(issued) = issued else {
            debug!("Discarding stale response {:?}", response.id());
            return None;
        };

        match response {
            WorkerResponse::Page { data, .. } => {
                if self.surface.paint(&data.image, issued.pixel_density) {
                    debug!(
                        "Painted page {} at scale {:.3} ({}x{} px)",
                        data.page, data.scale, data.image.width_px, data.image.height_px
                    );
                    None
                } else {
                    error!("Render for page {} had a malformed buffer", data.page);
                    Some(ViewerEvent::RenderFailed {
                        page: data.page,
                        reason: "malformed image buffer".to_string(),
                    })
                }
            }
            WorkerResponse::Error { error, .. } => {
                error!("Failed to render page {}: {error}", issued.page);
                Some(ViewerEvent::RenderFailed {
                    page: issued.page,
                    reason: error.to_string(),
                })
            }
            WorkerResponse::Loaded { .. } => None,
        }
    }

    fn finish_load(&mut self, load: PendingLoad, response: WorkerResponse) -> Option<ViewerEvent> {
        match response {
            WorkerResponse::Loaded { id, page_count } => {
                info!("Loaded {} with {page_count} pages", load.name);
                self.document = Some(DocumentHandle {
                    name: load.name.clone(),
                    page_count,
                    generation: id,
                });
                self.latest_render = None;
                self.apply(Command::Reset(page_count));
                Some(ViewerEvent::Loaded {
                    name: load.name,
                    page_count,
                })
            }
            WorkerResponse::Error { error, .. } => {
                error!("Failed to load {}: {error}", load.name);
                self.document = None;
                self.latest_render = None;
                self.apply(Command::Close);
                self.surface.clear();
                Some(ViewerEvent::LoadFailed {
                    name: load.name,
                    reason: error.to_string(),
                })
            }
            WorkerResponse::Page { .. } => None,
        }
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    #[must_use]
    pub fn current_page(&self) -> Option<usize> {
        self.navigation.current_page()
    }

    #[must_use]
    pub fn page_count(&self) -> Option<usize> {
        self.navigation.page_count()
    }

    #[must_use]
    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.navigation.can_advance()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.navigation.can_retreat()
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.resize.unsubscribe();
    }
}

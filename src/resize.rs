//! Host viewport and resize notifications

use std::io;

use log::debug;

use crate::pdf::ViewportGeometry;

/// Read-only source of the host window geometry
pub trait HostViewport {
    fn geometry(&self) -> io::Result<ViewportGeometry>;
}

/// The terminal the viewer runs in
#[derive(Clone, Copy, Debug)]
pub struct TerminalViewport {
    pub pixel_density: u16,
}

impl TerminalViewport {
    #[must_use]
    pub fn new(pixel_density: u16) -> Self {
        Self { pixel_density }
    }

    /// Geometry for a terminal of the given size
    #[must_use]
    pub fn geometry_for(&self, columns: u16, rows: u16) -> ViewportGeometry {
        ViewportGeometry::new(columns, rows, self.pixel_density)
    }
}

impl HostViewport for TerminalViewport {
    fn geometry(&self) -> io::Result<ViewportGeometry> {
        let (columns, rows) = crossterm::terminal::size()?;
        Ok(self.geometry_for(columns, rows))
    }
}

/// Turns host resize notifications into re-render requests.
///
/// Only notifications received while subscribed count, and a notification
/// that repeats the last seen geometry is dropped.
#[derive(Debug, Default)]
pub struct ResizeObserver {
    subscribed: bool,
    last: Option<ViewportGeometry>,
}

impl ResizeObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening, remembering the geometry at subscription time
    pub fn subscribe(&mut self, initial: ViewportGeometry) {
        self.subscribed = true;
        self.last = Some(initial);
    }

    /// Stop listening
    pub fn unsubscribe(&mut self) {
        if self.subscribed {
            debug!("Resize observer unsubscribed");
        }
        self.subscribed = false;
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Handle a notification, returning the geometry to re-render at
    pub fn notify(&mut self, geometry: ViewportGeometry) -> Option<ViewportGeometry> {
        if !self.subscribed || self.last == Some(geometry) {
            return None;
        }
        self.last = Some(geometry);
        Some(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribed_observer_ignores_notifications() {
        let mut observer = ResizeObserver::new();
        assert_eq!(observer.notify(ViewportGeometry::new(100, 30, 1)), None);
    }

    #[test]
    fn repeated_geometry_is_coalesced() {
        let mut observer = ResizeObserver::new();
        observer.subscribe(ViewportGeometry::new(80, 24, 1));

        assert_eq!(observer.notify(ViewportGeometry::new(80, 24, 1)), None);

        let wider = ViewportGeometry::new(120, 24, 1);
        assert_eq!(observer.notify(wider), Some(wider));
        assert_eq!(observer.notify(wider), None);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut observer = ResizeObserver::new();
        observer.subscribe(ViewportGeometry::new(80, 24, 1));
        observer.unsubscribe();

        assert!(!observer.is_subscribed());
        assert_eq!(observer.notify(ViewportGeometry::new(100, 24, 1)), None);
    }

    #[test]
    fn terminal_geometry_carries_density() {
        let viewport = TerminalViewport::new(2);
        assert_eq!(
            viewport.geometry_for(90, 30),
            ViewportGeometry::new(90, 30, 2)
        );
    }
}

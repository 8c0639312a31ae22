pub mod acquisition;
pub mod app;
pub mod event_source;
pub mod notification;
pub mod panic_handler;
pub mod pdf;
pub mod resize;
pub mod settings;
pub mod surface;
pub mod viewer;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{App, AppAction, run_app_with_event_source};
pub use viewer::{Viewer, ViewerConfig, ViewerEvent};

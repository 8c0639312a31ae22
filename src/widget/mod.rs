pub mod controls;
pub mod page_view;

pub use controls::{ControlsBar, OpenPrompt, StatusLine, UploadBox};
pub use page_view::PageView;

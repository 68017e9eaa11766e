// Web front-end
// Serves the upload page and the background removal endpoint

mod app;
mod error;
mod extract_request_data;
mod handlers;
mod image_codec;
mod listeners;
mod models;
mod page;

pub use app::create_app;
pub use listeners::create_listener;

use crate::remover::BackgroundRemover;
use std::sync::Arc;

// Maximum allowed size for image upload requests
pub const MAX_UPLOAD_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB

pub type SharedRemover = Arc<dyn BackgroundRemover>;

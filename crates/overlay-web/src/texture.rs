//! Resolves page media elements to GPU textures.
//!
//! Readiness is checked on every bind attempt: an image counts once fully
//! loaded with a non-zero intrinsic width, a video once the decoder reports
//! HAVE_ENOUGH_DATA. A not-ready source makes the whole plane update a no-op;
//! the next hover retries.

use wasm_bindgen::JsCast;
use web_sys as web;

// HTMLMediaElement.readyState for "enough data to play through"
const HAVE_ENOUGH_DATA: u16 = 4;

/// Tagged media source behind a plane; each variant carries its own
/// readiness check and dimension source.
#[derive(Clone)]
pub enum MediaSource {
    Image(web::HtmlImageElement),
    Video(web::HtmlVideoElement),
}

impl MediaSource {
    pub fn element(&self) -> &web::Element {
        match self {
            MediaSource::Image(img) => img,
            MediaSource::Video(vid) => vid,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaSource::Video(_))
    }

    pub fn is_ready(&self) -> bool {
        match self {
            MediaSource::Image(img) => img.complete() && img.natural_width() > 0,
            MediaSource::Video(vid) => vid.ready_state() == HAVE_ENOUGH_DATA,
        }
    }

    /// Intrinsic pixel dimensions of the decoded media.
    pub fn natural_size(&self) -> (u32, u32) {
        match self {
            MediaSource::Image(img) => (img.natural_width(), img.natural_height()),
            MediaSource::Video(vid) => (vid.video_width(), vid.video_height()),
        }
    }
}

/// Find the media element backing a container: a video wins over an image.
pub fn resolve_media(container: &web::Element) -> Option<MediaSource> {
    if let Ok(Some(vid)) = container.query_selector("video") {
        if let Ok(vid) = vid.dyn_into::<web::HtmlVideoElement>() {
            return Some(MediaSource::Video(vid));
        }
    }
    if let Ok(Some(img)) = container.query_selector("img") {
        if let Ok(img) = img.dyn_into::<web::HtmlImageElement>() {
            return Some(MediaSource::Image(img));
        }
    }
    None
}

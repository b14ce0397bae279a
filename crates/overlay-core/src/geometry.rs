//! DOM-to-scene coordinate mapping and viewport camera math.

use crate::constants::{REFERENCE_HEIGHT, REFERENCE_WIDTH};
use glam::Vec2;

/// Cached page viewport in CSS pixels. Invalidated and re-measured on resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// A DOM bounding box in CSS pixels, top-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Map a DOM rect plus vertical scroll offset to the rect's center in scene
/// coordinates: origin at the viewport center, Y up, matching a perspective
/// camera looking down -Z.
pub fn map_rect(rect: PageRect, scroll_y: f32, viewport: Viewport) -> Vec2 {
    let x = rect.left - viewport.width * 0.5 + rect.width * 0.5;
    let y = -(rect.top + scroll_y) + viewport.height * 0.5 - rect.height * 0.5;
    Vec2::new(x, y)
}

/// Vertical field of view, in degrees, that makes one scene unit equal one
/// CSS pixel at the plane layer for a camera `depth` away.
pub fn camera_fov_deg(viewport_height: f32, depth: f32) -> f32 {
    (2.0 * (viewport_height / (2.0 * depth)).atan()).to_degrees()
}

/// Animation speed multiplier for a target of the given size: larger targets
/// animate proportionally slower, capped at the reference footprint.
pub fn speed_factor(width: f32, height: f32) -> f32 {
    ((width + height) / (REFERENCE_WIDTH + REFERENCE_HEIGHT)).min(1.0)
}

/// Inverse of [`speed_factor`]: boosts wave altitude/amplitude for targets
/// smaller than the reference footprint.
pub fn intensity_factor(width: f32, height: f32) -> f32 {
    ((REFERENCE_WIDTH + REFERENCE_HEIGHT) / (width + height)).max(1.0)
}

// Shared tuning constants for the plane overlay, used by both the engine and
// the web frontend.

// Pool
pub const MAX_PLANES: usize = 6; // fixed slot count for the whole session

// Camera: fixed eye distance along +Z; near/far bracket the plane layer
pub const CAMERA_DEPTH: f32 = 500.0;
pub const CAMERA_RANGE: f32 = 100.0;

// Reference footprint (px) used to normalize animation speed against the
// on-screen size of the hovered target
pub const REFERENCE_WIDTH: f32 = 640.0;
pub const REFERENCE_HEIGHT: f32 = 560.0;

// Hover-out settle
pub const LEAVE_DURATION: f32 = 0.5;

// Second zoom phase starts at this fraction of the settle duration and
// recovers half of the zoom-out
pub const ZOOM_SETTLE_DELAY_RATIO: f32 = 0.65;
pub const ZOOM_REBOUND_RATIO: f32 = 0.5;

// Plane mesh subdivision (per axis) for the vertex wave
pub const PLANE_GRID_SEGMENTS: u32 = 32;

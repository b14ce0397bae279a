// DOM contract: the selectors and attributes the overlay scans for.

// Hoverable media containers mirrored as planes
pub const HOVERABLE_SELECTOR: &str = "[data-webgl-canvas]";

// Always-active containers bound immediately and reserved
pub const FIXED_SELECTOR: &str = "[data-webgl-canvas-fixed]";

// Optional child element whose box sizes/positions the plane instead of the
// container's own box
pub const FRAME_SELECTOR: &str = "[data-webgl-canvas-frame]";

// Optional texture-size overrides on the frame element
pub const WIDTH_ATTR: &str = "data-width";
pub const HEIGHT_ATTR: &str = "data-height";

pub const CANVAS_CLASS: &str = "webgl-canvas";

// The canvas overlays the whole viewport and never intercepts input.
pub const CANVAS_STYLE: &str =
    "position:fixed;top:0;left:0;width:100%;height:100%;pointer-events:none;";

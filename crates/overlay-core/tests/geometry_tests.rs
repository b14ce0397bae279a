use overlay_core::geometry::{self, PageRect, Viewport};
use overlay_core::{CAMERA_DEPTH, REFERENCE_HEIGHT, REFERENCE_WIDTH};

const VP: Viewport = Viewport {
    width: 1000.0,
    height: 800.0,
};

#[test]
fn map_rect_centers_and_flips_y() {
    let rect = PageRect {
        left: 100.0,
        top: 50.0,
        width: 300.0,
        height: 200.0,
    };
    let pos = geometry::map_rect(rect, 0.0, VP);
    // x = left - vw/2 + w/2, y = -top + vh/2 - h/2
    assert_eq!(pos.x, 100.0 - 500.0 + 150.0);
    assert_eq!(pos.y, -50.0 + 400.0 - 100.0);
}

#[test]
fn map_rect_accounts_for_scroll_offset() {
    let rect = PageRect {
        left: 0.0,
        top: 120.0,
        width: 0.0,
        height: 0.0,
    };
    let scrolled = geometry::map_rect(rect, 80.0, VP);
    let unscrolled = geometry::map_rect(rect, 0.0, VP);
    assert_eq!(scrolled.y, unscrolled.y - 80.0);
}

#[test]
fn zero_rect_at_page_origin_maps_to_half_viewport_height() {
    let rect = PageRect::default();
    let pos = geometry::map_rect(rect, 0.0, VP);
    assert_eq!(pos.y, VP.height / 2.0);
}

#[test]
fn camera_fov_matches_viewport_height_at_depth() {
    // 1000x800 viewport, camera 500 away: fov = 2*atan(800/1000) in degrees.
    let fov = geometry::camera_fov_deg(VP.height, CAMERA_DEPTH);
    assert!((fov - 77.3196).abs() < 1e-3, "fov was {}", fov);
    assert!((VP.aspect() - 1.25).abs() < 1e-6);
}

#[test]
fn speed_factor_slows_small_targets_proportionally() {
    let factor = geometry::speed_factor(300.0, 200.0);
    assert!((factor - 500.0 / 1200.0).abs() < 1e-6, "factor was {}", factor);
}

#[test]
fn speed_factor_caps_at_one_for_large_targets() {
    assert_eq!(geometry::speed_factor(900.0, 700.0), 1.0);
    assert_eq!(geometry::speed_factor(REFERENCE_WIDTH, REFERENCE_HEIGHT), 1.0);
}

#[test]
fn intensity_factor_is_inverse_of_speed_factor_below_reference() {
    let speed = geometry::speed_factor(300.0, 200.0);
    let intensity = geometry::intensity_factor(300.0, 200.0);
    assert!((speed * intensity - 1.0).abs() < 1e-6);
    // At or above the reference footprint the boost bottoms out at 1.
    assert_eq!(geometry::intensity_factor(1200.0, 600.0), 1.0);
}

// Host-side tests for the DOM contract constants.
// The crate itself is wasm-only, so the pure module is included directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn selectors_are_attribute_selectors() {
    for selector in [HOVERABLE_SELECTOR, FIXED_SELECTOR, FRAME_SELECTOR] {
        assert!(selector.starts_with("[data-"), "{}", selector);
        assert!(selector.ends_with(']'), "{}", selector);
    }
}

#[test]
fn selectors_are_distinct() {
    assert_ne!(HOVERABLE_SELECTOR, FIXED_SELECTOR);
    assert_ne!(HOVERABLE_SELECTOR, FRAME_SELECTOR);
    assert_ne!(FIXED_SELECTOR, FRAME_SELECTOR);
}

#[test]
fn override_attributes_are_data_attributes() {
    assert!(WIDTH_ATTR.starts_with("data-"));
    assert!(HEIGHT_ATTR.starts_with("data-"));
    assert_ne!(WIDTH_ATTR, HEIGHT_ATTR);
}

#[test]
fn canvas_never_intercepts_input() {
    assert!(CANVAS_STYLE.contains("pointer-events:none"));
    assert!(!CANVAS_CLASS.is_empty());
}

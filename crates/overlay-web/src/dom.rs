use overlay_core::{PageRect, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

#[inline]
pub fn scroll_y() -> f32 {
    web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0) as f32
}

/// Page viewport in CSS pixels: body client width by window inner height.
pub fn viewport_size() -> Viewport {
    let (width, height) = window_document()
        .and_then(|(window, document)| {
            let height = window.inner_height().ok().and_then(|v| v.as_f64())?;
            let body = document.body()?;
            Some((body.client_width() as f64, height))
        })
        .unwrap_or((0.0, 0.0));
    Viewport {
        width: width as f32,
        height: height as f32,
    }
}

#[inline]
pub fn rect_px(element: &web::Element) -> PageRect {
    let rect = element.get_bounding_client_rect();
    PageRect {
        left: rect.left() as f32,
        top: rect.top() as f32,
        width: rect.width() as f32,
        height: rect.height() as f32,
    }
}

#[inline]
pub fn attr_f32(element: &web::Element, name: &str) -> Option<f32> {
    element.get_attribute(name)?.parse().ok()
}

pub fn set_opacity(element: &web::Element, value: f32) {
    if let Some(el) = element.dyn_ref::<web::HtmlElement>() {
        let _ = el.style().set_property("opacity", &value.to_string());
    }
}

pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let mut out = Vec::new();
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                out.push(el);
            }
        }
    }
    out
}

/// A registered DOM listener that detaches itself when dropped, so teardown
/// can actually remove what it added.
pub struct ListenerHandle {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl ListenerHandle {
    pub fn add(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut() + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

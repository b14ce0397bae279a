//! Listener wiring for the scanned media containers.

use crate::dom::ListenerHandle;
use crate::{App, SourceBinding};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Attach mouseenter/click (and mouseleave for hoverables) to every source
/// container, plus the window resize hook. The returned handles detach on
/// drop; replacing a previous wiring tears the old listeners down.
pub fn wire(app: &Rc<RefCell<App>>, sources: &[SourceBinding]) -> Vec<ListenerHandle> {
    let mut handles = Vec::new();
    for (index, source) in sources.iter().enumerate() {
        let target: web::EventTarget = source.root.clone().into();
        {
            let app = app.clone();
            handles.push(ListenerHandle::add(&target, "mouseenter", move || {
                app.borrow_mut().update_plane(index, false);
            }));
        }
        {
            let app = app.clone();
            handles.push(ListenerHandle::add(&target, "click", move || {
                app.borrow_mut().begin_transition_for(index);
            }));
        }
        if !source.fixed {
            let app = app.clone();
            handles.push(ListenerHandle::add(&target, "mouseleave", move || {
                app.borrow_mut().leave_plane(index);
            }));
        }
    }
    if let Some(window) = web::window() {
        let app = app.clone();
        handles.push(ListenerHandle::add(&window.into(), "resize", move || {
            app.borrow_mut().handle_resize();
        }));
    }
    handles
}

//! The requestAnimationFrame render loop.

use crate::App;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Register the per-frame callback. No-op while already registered. The
/// chain re-arms itself until `rendering` is cleared.
pub fn play(app: &Rc<RefCell<App>>) {
    {
        let mut a = app.borrow_mut();
        if a.rendering {
            return;
        }
        a.rendering = true;
        a.last_tick = None;
        log::debug!("loop: play");
    }
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let app_tick = app.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep = {
            let mut a = app_tick.borrow_mut();
            if a.rendering {
                a.frame();
            }
            a.rendering
        };
        if keep {
            if let Some(w) = web::window() {
                let _ = w.request_animation_frame(
                    tick_clone
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                );
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// Unregister the per-frame callback and draw one last frame so the canvas
/// is not left stale. Refused while any slot is mid transition-out; no-op
/// when already stopped.
pub fn stop(app: &mut App) {
    if !app.rendering {
        return;
    }
    if !app.engine.can_stop() {
        return;
    }
    app.rendering = false;
    app.render_once();
    log::debug!("loop: stop");
}

#![cfg(target_arch = "wasm32")]
//! Canvas overlay mirroring page media as animated, textured planes.
//!
//! The host page drives everything through the exported [`Overlay`] object:
//! scan-and-listen with `activate`, page-transition hand-off with
//! `begin_transition_out`/`end_transition_out`, teardown with `destroy`.

mod constants;
mod dom;
mod events;
mod frame;
mod render;
mod texture;

use crate::constants::{
    CANVAS_CLASS, CANVAS_STYLE, FIXED_SELECTOR, FRAME_SELECTOR, HEIGHT_ATTR, HOVERABLE_SELECTOR,
    WIDTH_ATTR,
};
use crate::texture::MediaSource;
use glam::Vec2;
use instant::Instant;
use overlay_core::{MediaKind, OverlayEngine, SourceId, WaveConfig, MAX_PLANES};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("overlay-web loaded");
    Ok(())
}

/// One scanned media container: the hoverable root, the media element that
/// textures the plane, and the frame element whose box positions it.
pub struct SourceBinding {
    pub(crate) root: web::Element,
    pub(crate) media: MediaSource,
    pub(crate) frame: web::Element,
    pub(crate) fixed: bool,
}

pub struct App {
    pub(crate) canvas: web::HtmlCanvasElement,
    pub(crate) gpu: Option<render::GpuState<'static>>,
    pub(crate) engine: OverlayEngine,
    pub(crate) sources: Vec<SourceBinding>,
    pub(crate) listeners: Vec<dom::ListenerHandle>,
    pub(crate) running: bool,
    pub(crate) rendering: bool,
    pub(crate) camera_follow: bool,
    pub(crate) camera_y: f32,
    pub(crate) last_tick: Option<Instant>,
}

impl App {
    async fn init() -> anyhow::Result<App> {
        let (window, document) =
            dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
        let body = document
            .body()
            .ok_or_else(|| anyhow::anyhow!("no document body"))?;

        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        canvas.class_list().add_1(CANVAS_CLASS).ok();
        canvas.set_attribute("style", CANVAS_STYLE).ok();
        body.append_child(&canvas)
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        let viewport = dom::viewport_size();
        let dpr = window.device_pixel_ratio() as f32;
        canvas.set_width(((viewport.width * dpr) as u32).max(1));
        canvas.set_height(((viewport.height * dpr) as u32).max(1));

        // Leak a canvas clone to satisfy the surface's 'static lifetime.
        let leaked_canvas = Box::leak(Box::new(canvas.clone()));
        let gpu = render::GpuState::new(leaked_canvas, MAX_PLANES).await?;

        let engine = OverlayEngine::new(MAX_PLANES, WaveConfig::default(), viewport);
        log::info!(
            "overlay created: {}x{}, {} planes",
            viewport.width as i32,
            viewport.height as i32,
            MAX_PLANES
        );

        Ok(App {
            canvas,
            gpu: Some(gpu),
            engine,
            sources: Vec::new(),
            listeners: Vec::new(),
            running: false,
            rendering: false,
            camera_follow: true,
            camera_y: 0.0,
            last_tick: None,
        })
    }

    fn collect_sources(&mut self) {
        self.sources.clear();
        let Some((_, document)) = dom::window_document() else {
            return;
        };
        for (selector, fixed) in [(FIXED_SELECTOR, true), (HOVERABLE_SELECTOR, false)] {
            for root in dom::query_all(&document, selector) {
                let Some(media) = texture::resolve_media(&root) else {
                    log::debug!("overlay: container without media skipped");
                    continue;
                };
                let frame = root
                    .query_selector(FRAME_SELECTOR)
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| root.clone());
                self.sources.push(SourceBinding {
                    root,
                    media,
                    frame,
                    fixed,
                });
            }
        }
    }

    /// Bind a source to a plane and start (or skip, for `set`) its hover
    /// animation. Silently does nothing while a page transition runs or the
    /// media is not decodable yet; the next trigger retries.
    pub(crate) fn update_plane(&mut self, index: usize, set: bool) {
        let Some(source) = self.sources.get(index) else {
            return;
        };
        let media = source.media.clone();
        let frame_el = source.frame.clone();
        let Some(slot) = self.engine.bind(SourceId(index as u32)) else {
            return;
        };
        if !media.is_ready() {
            return;
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.set_plane_texture(slot, &media);
        }

        let rect = dom::rect_px(&frame_el);
        let scroll = dom::scroll_y();
        let (natural_w, natural_h) = media.natural_size();
        let tex_size = match &media {
            MediaSource::Video(_) => Vec2::new(natural_w as f32, natural_h as f32),
            MediaSource::Image(img) => Vec2::new(
                dom::attr_f32(&frame_el, WIDTH_ATTR).unwrap_or(img.width() as f32),
                dom::attr_f32(&frame_el, HEIGHT_ATTR).unwrap_or(img.height() as f32),
            ),
        };
        let kind = if media.is_video() {
            MediaKind::Video
        } else {
            MediaKind::Image
        };
        self.engine.layout(slot, kind, tex_size, rect, scroll);
        if set {
            self.engine.fast_bind(slot);
        } else {
            self.engine.activate(slot);
        }
    }

    pub(crate) fn leave_plane(&mut self, index: usize) {
        self.engine.leave_source(SourceId(index as u32));
    }

    /// Click/navigation hand-off: the plane takes over for the DOM element,
    /// which is faded out until the page replaces it.
    pub(crate) fn begin_transition_for(&mut self, index: usize) {
        let Some(source) = self.sources.get(index) else {
            return;
        };
        let element = source.media.element().clone();
        self.engine.begin_exit(SourceId(index as u32));
        dom::set_opacity(&element, 0.0);
    }

    pub(crate) fn handle_resize(&mut self) {
        let viewport = dom::viewport_size();
        self.engine.handle_resize(viewport);
        let dpr = web::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0) as f32;
        let width = ((viewport.width * dpr) as u32).max(1);
        let height = ((viewport.height * dpr) as u32).max(1);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(width, height);
        }
        log::info!(
            "overlay: resize {}x{}",
            viewport.width as i32,
            viewport.height as i32
        );
    }

    fn update_camera(&mut self) {
        if self.camera_follow {
            self.camera_y = -dom::scroll_y();
        }
    }

    pub(crate) fn frame(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|t| (now - t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.engine.tick(dt);
        self.update_camera();
        self.render_once();
    }

    pub(crate) fn render_once(&mut self) {
        let viewport = self.engine.viewport();
        let camera_y = self.camera_y;
        if let Some(gpu) = self.gpu.as_mut() {
            if let Err(e) = gpu.render(self.engine.pool(), viewport, camera_y) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

#[wasm_bindgen]
pub struct Overlay {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl Overlay {
    /// Build the overlay: canvas, GPU device and plane pool. Call once per
    /// page session.
    pub async fn create() -> Result<Overlay, JsValue> {
        App::init()
            .await
            .map(|app| Overlay {
                app: Rc::new(RefCell::new(app)),
            })
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    /// Scan the page for media containers, wire their listeners, fast-bind
    /// the fixed ones and start rendering. No-op when already active or when
    /// the page has no hoverable containers.
    pub fn activate(&self) {
        {
            let mut app = self.app.borrow_mut();
            if app.running {
                return;
            }
            app.collect_sources();
            if !app.sources.iter().any(|s| !s.fixed) {
                return;
            }
            app.listeners = events::wire(&self.app, &app.sources);
            app.update_camera();
            let fixed: Vec<usize> = app
                .sources
                .iter()
                .enumerate()
                .filter(|(_, s)| s.fixed)
                .map(|(i, _)| i)
                .collect();
            for index in fixed {
                app.update_plane(index, true);
            }
            app.running = true;
            log::info!("overlay: activate");
        }
        frame::play(&self.app);
    }

    /// Hide every plane (transitions excepted) and stop rendering.
    pub fn deactivate(&self) {
        let mut app = self.app.borrow_mut();
        if !app.running {
            return;
        }
        app.engine.hide_all();
        frame::stop(&mut app);
        app.running = false;
        log::info!("overlay: deactivate");
    }

    pub fn handle_resize(&self) {
        self.app.borrow_mut().handle_resize();
    }

    /// Hand a container's plane over to the page transition: the slot is
    /// shielded from hides and the DOM media is faded out.
    pub fn begin_transition_out(&self, element: web::Element) {
        let mut app = self.app.borrow_mut();
        let index = app
            .sources
            .iter()
            .position(|s| s.root == element || *s.media.element() == element);
        match index {
            Some(index) => app.begin_transition_for(index),
            None => log::debug!("overlay: transition-out for unknown element ignored"),
        }
    }

    /// Finish the pending transition-out with the mask wipe. Silent no-op
    /// when nothing is in transition.
    pub fn end_transition_out(&self) {
        self.app.borrow_mut().engine.end_exit();
    }

    pub fn set_transition_duration(&self, enter: f32, exit: f32) {
        self.app
            .borrow_mut()
            .engine
            .set_transition_durations(enter, exit);
    }

    /// Suspend plane binds while the host page runs a navigation transition.
    pub fn set_page_transition(&self, active: bool) {
        self.app.borrow_mut().engine.set_page_suspended(active);
    }

    pub fn set_camera_follow_scroll(&self, enabled: bool, override_y: Option<f32>) {
        let mut app = self.app.borrow_mut();
        app.camera_follow = enabled;
        if let Some(y) = override_y {
            app.camera_y = y;
        }
    }

    // Tuning surface: reads apply to animations started afterwards, except
    // the curve constants which push through immediately.

    pub fn set_altitude(&self, value: f32) {
        self.app.borrow_mut().engine.config.altitude = value;
    }

    pub fn set_amplitude(&self, value: f32) {
        self.app.borrow_mut().engine.config.amplitude = value;
    }

    pub fn set_curve(&self, curve_x: f32, curve_y: f32) {
        self.app.borrow_mut().engine.set_curve(curve_x, curve_y);
    }

    pub fn set_scale(&self, value: f32) {
        self.app.borrow_mut().engine.config.scale = value;
    }

    pub fn set_wave_speed(&self, value: f32) {
        self.app.borrow_mut().engine.config.wave_speed = value;
    }

    pub fn set_settle_speed(&self, value: f32) {
        self.app.borrow_mut().engine.config.settle_speed = value;
    }

    /// Tear the overlay down: unregister the frame callback and listeners,
    /// release GPU resources and remove the canvas.
    pub fn destroy(&self) {
        let mut app = self.app.borrow_mut();
        app.rendering = false;
        app.listeners.clear();
        app.sources.clear();
        app.engine.hide_all();
        app.gpu = None;
        app.canvas.remove();
        app.running = false;
        log::info!("overlay: destroy");
    }
}

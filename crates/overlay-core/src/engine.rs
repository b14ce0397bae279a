//! Per-slot transition state machine and overlay-wide bookkeeping.
//!
//! `OverlayEngine` owns the slot pool, the tween timeline and the shared
//! animation config. The frontend feeds it DOM geometry and events; the
//! engine decides slot assignment and drives every animated uniform. All
//! failure modes here are silent no-ops: a missing binding, a transition-end
//! with nothing in transition, or a suspended bind simply do nothing.

use crate::config::{TransitionDurations, WaveConfig};
use crate::constants::{LEAVE_DURATION, ZOOM_REBOUND_RATIO, ZOOM_SETTLE_DELAY_RATIO};
use crate::ease::{Ease, SETTLE_BEZIER};
use crate::geometry::{self, PageRect, Viewport};
use crate::pool::{Channel, MediaKind, PlanePool, SourceId};
use crate::tween::{Done, Segment, Timeline, Tween, TweenKey};
use glam::Vec2;

pub struct OverlayEngine {
    pool: PlanePool,
    timeline: Timeline,
    pub config: WaveConfig,
    durations: TransitionDurations,
    viewport: Viewport,
    page_suspended: bool,
}

impl OverlayEngine {
    pub fn new(max_planes: usize, config: WaveConfig, viewport: Viewport) -> Self {
        let mut pool = PlanePool::new(max_planes);
        for i in 0..pool.len() {
            let u = &mut pool.slot_mut(i).uniforms;
            u.curve_x = config.curve_x;
            u.curve_y = config.curve_y;
        }
        Self {
            pool,
            timeline: Timeline::new(),
            config,
            durations: TransitionDurations::default(),
            viewport,
            page_suspended: false,
        }
    }

    pub fn pool(&self) -> &PlanePool {
        &self.pool
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn durations(&self) -> TransitionDurations {
        self.durations
    }

    pub fn set_transition_durations(&mut self, enter: f32, exit: f32) {
        self.durations = TransitionDurations { enter, exit };
    }

    /// Suspend or resume plane binds while the host page runs a navigation
    /// transition.
    pub fn set_page_suspended(&mut self, suspended: bool) {
        self.page_suspended = suspended;
    }

    pub fn page_suspended(&self) -> bool {
        self.page_suspended
    }

    /// Reserve a slot for `source`. Returns `None` while binds are suspended.
    pub fn bind(&mut self, source: SourceId) -> Option<usize> {
        if self.page_suspended {
            return None;
        }
        Some(self.pool.acquire(source))
    }

    /// Lay a bound plane out over its source rect and reset its reveal mask.
    pub fn layout(
        &mut self,
        slot: usize,
        media: MediaKind,
        tex_size: Vec2,
        rect: PageRect,
        scroll_y: f32,
    ) {
        let position = geometry::map_rect(rect, scroll_y, self.viewport);
        let s = self.pool.slot_mut(slot);
        s.media = Some(media);
        s.visible = true;
        s.position = position;
        s.scale = Vec2::new(rect.width, rect.height);
        s.uniforms.size = Vec2::new(rect.width, rect.height);
        s.uniforms.tex_size = tex_size;
        s.uniforms.mask = 0.0;
    }

    /// Start the hover animation set on a slot: a two-phase zoom settle plus
    /// a wave sweep and progress ramp, all scaled by the target's on-screen
    /// size. Any zoom/progress/wave tween already running on the slot is
    /// cancelled first.
    pub fn activate(&mut self, slot: usize) {
        let size = self.pool.slot(slot).scale;
        let speed = geometry::speed_factor(size.x, size.y);
        let intensity = geometry::intensity_factor(size.x, size.y);
        let wave_duration = self.config.wave_speed * speed;
        let settle_duration = self.config.settle_speed * speed;
        {
            let u = &mut self.pool.slot_mut(slot).uniforms;
            u.altitude = self.config.altitude * intensity;
            u.amplitude = self.config.amplitude * intensity;
        }
        self.timeline
            .kill(slot, &[Channel::Zoom, Channel::Progress, Channel::Wave]);
        let rebound = 1.0 - (1.0 - self.config.scale) * ZOOM_REBOUND_RATIO;
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Zoom,
            },
            Tween::to(self.config.scale, settle_duration, SETTLE_BEZIER).then(Segment {
                from: None,
                to: rebound,
                duration: settle_duration,
                delay: settle_duration * ZOOM_SETTLE_DELAY_RATIO,
                ease: Ease::PowerOut(2),
            }),
        );
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Wave,
            },
            Tween::from_to(0.0, 1.0, wave_duration, SETTLE_BEZIER),
        );
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Progress,
            },
            Tween::to(1.0, wave_duration, SETTLE_BEZIER),
        );
        log::debug!("engine: activate slot {}", slot);
    }

    /// Reserve a slot without animating it (always-visible sources). The
    /// reservation holds until a transition or hide releases the slot.
    pub fn fast_bind(&mut self, slot: usize) {
        self.pool.slot_mut(slot).busy = true;
        log::debug!("engine: fast bind slot {}", slot);
    }

    /// Hover-out for a bound source. No-op when the source has no live
    /// binding or the slot is mid transition-out.
    pub fn leave_source(&mut self, source: SourceId) {
        if let Some(slot) = self.pool.find(source) {
            self.leave(slot);
        }
    }

    pub fn leave(&mut self, slot: usize) {
        if self.pool.slot(slot).in_transition {
            return;
        }
        self.timeline.kill(slot, &[Channel::Zoom, Channel::Progress]);
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Progress,
            },
            Tween::to(0.0, LEAVE_DURATION, Ease::PowerOut(1)),
        );
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Zoom,
            },
            Tween::to(1.0, LEAVE_DURATION, Ease::PowerOut(1)).with_done(Done::ReleaseSlot(slot)),
        );
        log::debug!("engine: leave slot {}", slot);
    }

    /// Mark a source's slot as leaving with the page. Binds the source first
    /// if it was not already bound. The slot is shielded from hides and
    /// reuse until [`end_exit`] completes.
    ///
    /// [`end_exit`]: OverlayEngine::end_exit
    pub fn begin_exit(&mut self, source: SourceId) -> usize {
        let slot = self.pool.acquire(source);
        self.pool.slot_mut(slot).in_transition = true;
        log::debug!("engine: begin exit on slot {}", slot);
        slot
    }

    /// Run the mask wipe on the single in-transition slot, releasing it on
    /// completion. Returns false (and does nothing) when no slot is in
    /// transition.
    pub fn end_exit(&mut self) -> bool {
        let Some(slot) = self.pool.find_in_transition() else {
            return false;
        };
        self.timeline.start(
            TweenKey {
                slot,
                channel: Channel::Mask,
            },
            Tween::to(1.0, self.durations.enter, SETTLE_BEZIER)
                .with_done(Done::FinishTransition(slot)),
        );
        log::debug!("engine: end exit on slot {}", slot);
        true
    }

    /// Advance animations by `dt` seconds and apply any completions.
    pub fn tick(&mut self, dt: f32) {
        for done in self.timeline.tick(&mut self.pool, dt) {
            match done {
                Done::ReleaseSlot(slot) => self.pool.release(slot),
                Done::FinishTransition(slot) => {
                    self.pool.slot_mut(slot).in_transition = false;
                    self.pool.release(slot);
                }
            }
        }
    }

    pub fn hide_all(&mut self) {
        self.pool.hide_all();
    }

    /// Cached geometry is invalid after a resize: hide everything (except
    /// in-transition slots) before adopting the new viewport.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.hide_all();
        self.viewport = viewport;
        log::debug!(
            "engine: resize {}x{}",
            viewport.width as i32,
            viewport.height as i32
        );
    }

    /// Whether the render loop may stop: an in-flight transition-out must
    /// keep rendering.
    pub fn can_stop(&self) -> bool {
        !self.pool.any_in_transition()
    }

    /// Push new curvature constants straight through to every slot.
    pub fn set_curve(&mut self, curve_x: f32, curve_y: f32) {
        self.config.curve_x = curve_x;
        self.config.curve_y = curve_y;
        for i in 0..self.pool.len() {
            let u = &mut self.pool.slot_mut(i).uniforms;
            u.curve_x = curve_x;
            u.curve_y = curve_y;
        }
    }

    pub fn timeline_is_empty(&self) -> bool {
        self.timeline.is_empty()
    }
}

//! Fixed-size pool of reusable render-plane slots.
//!
//! Slots are created once and only ever rebound: a slot holds a weak
//! association to a page source element (by stable index), a `busy`
//! reservation flag, and an `in_transition` flag that shields the slot from
//! reuse and from blanket hides while its exit animation runs.

use glam::Vec2;

/// Stable key for a page source element (its index in the frontend's scan).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Uniform set owned by one plane. `zoom`, `progress`, `wave` and `mask` are
/// written exclusively by the animation timeline while a tween is active.
#[derive(Clone, Debug)]
pub struct PlaneUniforms {
    pub zoom: f32,
    pub progress: f32,
    pub wave: f32,
    pub mask: f32,
    pub size: Vec2,
    pub tex_size: Vec2,
    pub altitude: f32,
    pub amplitude: f32,
    pub curve_x: f32,
    pub curve_y: f32,
}

impl Default for PlaneUniforms {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            progress: 0.0,
            wave: 0.0,
            mask: 0.0,
            size: Vec2::ZERO,
            tex_size: Vec2::ZERO,
            altitude: 0.0,
            amplitude: 0.0,
            curve_x: 0.0,
            curve_y: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlaneSlot {
    pub id: usize,
    pub source: Option<SourceId>,
    pub busy: bool,
    pub in_transition: bool,
    pub visible: bool,
    pub media: Option<MediaKind>,
    pub position: Vec2,
    pub scale: Vec2,
    pub uniforms: PlaneUniforms,
}

impl PlaneSlot {
    fn new(id: usize) -> Self {
        Self {
            id,
            source: None,
            busy: false,
            in_transition: false,
            visible: false,
            media: None,
            position: Vec2::ZERO,
            scale: Vec2::ZERO,
            uniforms: PlaneUniforms::default(),
        }
    }
}

/// Animated uniform channels addressable by the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Zoom,
    Progress,
    Wave,
    Mask,
}

pub struct PlanePool {
    slots: Vec<PlaneSlot>,
    cursor: usize,
}

impl PlanePool {
    pub fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(PlaneSlot::new).collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[PlaneSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> &PlaneSlot {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut PlaneSlot {
        &mut self.slots[index]
    }

    pub fn find(&self, source: SourceId) -> Option<usize> {
        self.slots.iter().position(|s| s.source == Some(source))
    }

    /// Bind `source` to a slot and return its index.
    ///
    /// Idempotent for an already-bound source. Otherwise allocates round-robin
    /// from the cursor, skipping reserved slots. Termination relies on the
    /// bind protocol keeping at least one slot non-busy; the scan is
    /// deliberately unguarded.
    pub fn acquire(&mut self, source: SourceId) -> usize {
        if let Some(i) = self.find(source) {
            return i;
        }
        while self.slots[self.cursor].busy {
            self.cursor = (self.cursor + 1) % self.slots.len();
        }
        let index = self.cursor;
        self.slots[index].source = Some(source);
        self.cursor = (self.cursor + 1) % self.slots.len();
        log::debug!("pool: bound source {:?} to slot {}", source, index);
        index
    }

    /// Drop a slot's binding and reservation and hide it.
    pub fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.source = None;
        slot.busy = false;
        slot.visible = false;
        slot.scale = Vec2::ZERO;
    }

    /// Release every slot that is not mid transition-out.
    pub fn hide_all(&mut self) {
        for i in 0..self.slots.len() {
            if self.slots[i].in_transition {
                continue;
            }
            self.release(i);
        }
    }

    pub fn find_in_transition(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.in_transition)
    }

    pub fn any_in_transition(&self) -> bool {
        self.slots.iter().any(|s| s.in_transition)
    }

    pub fn channel(&self, index: usize, channel: Channel) -> f32 {
        let u = &self.slots[index].uniforms;
        match channel {
            Channel::Zoom => u.zoom,
            Channel::Progress => u.progress,
            Channel::Wave => u.wave,
            Channel::Mask => u.mask,
        }
    }

    pub fn set_channel(&mut self, index: usize, channel: Channel, value: f32) {
        let u = &mut self.slots[index].uniforms;
        match channel {
            Channel::Zoom => u.zoom = value,
            Channel::Progress => u.progress = value,
            Channel::Wave => u.wave = value,
            Channel::Mask => u.mask = value,
        }
    }
}

//! Minimal tween timeline driving the animated plane uniforms.
//!
//! One tween per (slot, channel): starting a new tween on a key replaces the
//! old one, and a replaced or killed tween never fires its completion. A
//! tween is one or two segments; a later segment takes over from the moment
//! its delay elapses, capturing the current channel value as its start when
//! no explicit `from` is given.

use crate::ease::Ease;
use crate::pool::{Channel, PlanePool};
use fnv::FnvHashMap;
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub slot: usize,
    pub channel: Channel,
}

/// Action fired when a tween runs to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Done {
    ReleaseSlot(usize),
    FinishTransition(usize),
}

#[derive(Clone, Copy, Debug)]
pub struct Segment {
    /// Start value; `None` captures the channel's current value when the
    /// segment begins.
    pub from: Option<f32>,
    pub to: f32,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

pub struct Tween {
    pub segments: SmallVec<[Segment; 2]>,
    pub done: Option<Done>,
}

impl Tween {
    pub fn to(to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            segments: smallvec![Segment {
                from: None,
                to,
                duration,
                delay: 0.0,
                ease,
            }],
            done: None,
        }
    }

    pub fn from_to(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        let mut tween = Self::to(to, duration, ease);
        tween.segments[0].from = Some(from);
        tween
    }

    pub fn then(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_done(mut self, done: Done) -> Self {
        self.done = Some(done);
        self
    }
}

struct ActiveSegment {
    segment: Segment,
    start: f32,
    begun: bool,
}

struct ActiveTween {
    elapsed: f32,
    segments: SmallVec<[ActiveSegment; 2]>,
    done: Option<Done>,
}

#[derive(Default)]
pub struct Timeline {
    active: FnvHashMap<TweenKey, ActiveTween>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a tween on `key`, replacing any tween already running there.
    pub fn start(&mut self, key: TweenKey, tween: Tween) {
        let segments = tween
            .segments
            .into_iter()
            .map(|segment| ActiveSegment {
                segment,
                start: 0.0,
                begun: false,
            })
            .collect();
        self.active.insert(
            key,
            ActiveTween {
                elapsed: 0.0,
                segments,
                done: tween.done,
            },
        );
    }

    /// Cancel tweens on the given channels of one slot without firing their
    /// completions.
    pub fn kill(&mut self, slot: usize, channels: &[Channel]) {
        self.active
            .retain(|key, _| key.slot != slot || !channels.contains(&key.channel));
    }

    pub fn is_animating(&self, key: TweenKey) -> bool {
        self.active.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance all tweens by `dt` seconds, writing channel values into the
    /// pool. Returns the completion actions that fired this tick.
    pub fn tick(&mut self, pool: &mut PlanePool, dt: f32) -> SmallVec<[Done; 2]> {
        let mut fired = SmallVec::new();
        self.active.retain(|key, tween| {
            tween.elapsed += dt;
            let mut value = None;
            let mut end = 0.0f32;
            for active in tween.segments.iter_mut() {
                let seg = active.segment;
                end = end.max(seg.delay + seg.duration);
                if tween.elapsed < seg.delay {
                    continue;
                }
                if !active.begun {
                    active.begun = true;
                    // Hand-off: a segment beginning mid-tick continues from the
                    // value an earlier segment produced this same tick.
                    active.start = match seg.from {
                        Some(v) => v,
                        None => value.unwrap_or_else(|| pool.channel(key.slot, key.channel)),
                    };
                }
                let t = if seg.duration > 0.0 {
                    ((tween.elapsed - seg.delay) / seg.duration).min(1.0)
                } else {
                    1.0
                };
                value = Some(active.start + (seg.to - active.start) * seg.ease.apply(t));
            }
            if let Some(v) = value {
                pool.set_channel(key.slot, key.channel, v);
            }
            if tween.elapsed >= end {
                if let Some(done) = tween.done.take() {
                    fired.push(done);
                }
                false
            } else {
                true
            }
        });
        fired
    }
}

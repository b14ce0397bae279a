use overlay_core::{
    Channel, Done, Ease, PlanePool, Segment, SourceId, Timeline, Tween, TweenKey, SETTLE_BEZIER,
};

fn key(slot: usize, channel: Channel) -> TweenKey {
    TweenKey { slot, channel }
}

fn pool() -> PlanePool {
    let mut pool = PlanePool::new(2);
    pool.acquire(SourceId(0));
    pool
}

#[test]
fn to_tween_starts_from_current_value_and_reaches_target() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    // zoom rests at 1.0
    timeline.start(key(0, Channel::Zoom), Tween::to(0.5, 1.0, Ease::Linear));

    timeline.tick(&mut pool, 0.5);
    let halfway = pool.channel(0, Channel::Zoom);
    assert!((halfway - 0.75).abs() < 1e-5, "halfway was {}", halfway);

    timeline.tick(&mut pool, 0.5);
    assert!((pool.channel(0, Channel::Zoom) - 0.5).abs() < 1e-5);
    assert!(timeline.is_empty());
}

#[test]
fn from_to_tween_ignores_current_value() {
    let mut pool = pool();
    pool.set_channel(0, Channel::Wave, 0.7);
    let mut timeline = Timeline::new();
    timeline.start(
        key(0, Channel::Wave),
        Tween::from_to(0.0, 1.0, 2.0, Ease::Linear),
    );
    timeline.tick(&mut pool, 1.0);
    assert!((pool.channel(0, Channel::Wave) - 0.5).abs() < 1e-5);
}

#[test]
fn starting_a_tween_replaces_the_running_one_and_drops_its_completion() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    timeline.start(
        key(0, Channel::Zoom),
        Tween::to(0.0, 1.0, Ease::Linear).with_done(Done::ReleaseSlot(0)),
    );
    timeline.tick(&mut pool, 0.5);

    // Newest request wins; the replaced tween must not fire ReleaseSlot.
    timeline.start(key(0, Channel::Zoom), Tween::to(1.0, 0.2, Ease::Linear));
    let mut fired = Vec::new();
    for _ in 0..10 {
        fired.extend(timeline.tick(&mut pool, 0.1));
    }
    assert!(fired.is_empty());
    assert!((pool.channel(0, Channel::Zoom) - 1.0).abs() < 1e-5);
}

#[test]
fn kill_cancels_without_firing_completion() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    timeline.start(
        key(0, Channel::Progress),
        Tween::to(1.0, 0.5, Ease::Linear).with_done(Done::ReleaseSlot(0)),
    );
    timeline.start(key(0, Channel::Wave), Tween::to(1.0, 0.5, Ease::Linear));
    timeline.kill(0, &[Channel::Progress]);

    assert!(!timeline.is_animating(key(0, Channel::Progress)));
    assert!(timeline.is_animating(key(0, Channel::Wave)));
    let fired = timeline.tick(&mut pool, 1.0);
    assert!(fired.is_empty());
}

#[test]
fn kill_only_touches_the_given_slot() {
    let mut pool = pool();
    pool.acquire(SourceId(1));
    let mut timeline = Timeline::new();
    timeline.start(key(0, Channel::Zoom), Tween::to(0.5, 1.0, Ease::Linear));
    timeline.start(key(1, Channel::Zoom), Tween::to(0.5, 1.0, Ease::Linear));
    timeline.kill(0, &[Channel::Zoom]);
    assert!(timeline.is_animating(key(1, Channel::Zoom)));
}

#[test]
fn completion_fires_exactly_once() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    timeline.start(
        key(0, Channel::Zoom),
        Tween::to(1.0, 0.3, Ease::Linear).with_done(Done::ReleaseSlot(0)),
    );
    let first = timeline.tick(&mut pool, 1.0);
    assert_eq!(first.as_slice(), &[Done::ReleaseSlot(0)]);
    let second = timeline.tick(&mut pool, 1.0);
    assert!(second.is_empty());
}

#[test]
fn zero_duration_tween_completes_on_first_tick() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    timeline.start(
        key(0, Channel::Mask),
        Tween::to(1.0, 0.0, SETTLE_BEZIER).with_done(Done::FinishTransition(0)),
    );
    let fired = timeline.tick(&mut pool, 0.016);
    assert_eq!(fired.as_slice(), &[Done::FinishTransition(0)]);
    assert_eq!(pool.channel(0, Channel::Mask), 1.0);
}

#[test]
fn delayed_segment_takes_over_and_starts_from_current_value() {
    let mut pool = pool();
    let mut timeline = Timeline::new();
    // Phase one eases zoom down to 0.4 over 1s; phase two takes over at
    // t=0.5 and brings it to 0.8 over 1s.
    timeline.start(
        key(0, Channel::Zoom),
        Tween::to(0.4, 1.0, Ease::Linear).then(Segment {
            from: None,
            to: 0.8,
            duration: 1.0,
            delay: 0.5,
            ease: Ease::Linear,
        }),
    );

    timeline.tick(&mut pool, 0.5);
    let handoff = pool.channel(0, Channel::Zoom);
    assert!((handoff - 0.7).abs() < 1e-5, "handoff was {}", handoff);

    // Second phase interpolates handoff -> 0.8; after half of it: 0.75.
    timeline.tick(&mut pool, 0.5);
    let mid = pool.channel(0, Channel::Zoom);
    assert!((mid - 0.75).abs() < 1e-5, "mid was {}", mid);

    timeline.tick(&mut pool, 0.5);
    assert!((pool.channel(0, Channel::Zoom) - 0.8).abs() < 1e-5);
    assert!(timeline.is_empty());
}

#[test]
fn eases_preserve_endpoints() {
    for ease in [
        Ease::Linear,
        Ease::PowerIn(2),
        Ease::PowerOut(1),
        Ease::PowerOut(2),
        SETTLE_BEZIER,
    ] {
        assert!(ease.apply(0.0).abs() < 1e-4, "{:?} at 0", ease);
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-4, "{:?} at 1", ease);
    }
}

#[test]
fn settle_bezier_is_monotone_on_a_sampled_grid() {
    let mut prev = 0.0f32;
    for i in 1..=100 {
        let t = i as f32 / 100.0;
        let v = SETTLE_BEZIER.apply(t);
        assert!(v >= prev - 1e-4, "dip at t={}: {} < {}", t, v, prev);
        prev = v;
    }
}

#[test]
fn power_out_decelerates() {
    let ease = Ease::PowerOut(1);
    // Quadratic out: first half covers more than half of the range.
    assert!(ease.apply(0.5) > 0.5);
    assert!((ease.apply(0.5) - 0.75).abs() < 1e-5);
}

use overlay_core::{PlanePool, SourceId};

#[test]
fn distinct_sources_get_distinct_slots() {
    let mut pool = PlanePool::new(6);
    let a = pool.acquire(SourceId(0));
    let b = pool.acquire(SourceId(1));
    let c = pool.acquire(SourceId(2));
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

#[test]
fn rebinding_the_same_source_is_idempotent() {
    let mut pool = PlanePool::new(6);
    let first = pool.acquire(SourceId(7));
    let second = pool.acquire(SourceId(7));
    let third = pool.acquire(SourceId(7));
    assert_eq!(first, second);
    assert_eq!(second, third);
    // The cursor must not have advanced past slot 1 for the lookups.
    assert_eq!(pool.acquire(SourceId(8)), 1);
}

#[test]
fn round_robin_wraps_and_displaces_oldest_binding() {
    let mut pool = PlanePool::new(2);
    let a = pool.acquire(SourceId(0));
    let b = pool.acquire(SourceId(1));
    assert_eq!(a, 0);
    assert_eq!(b, 1);
    // Third source wraps back onto slot 0, displacing A's binding.
    let c = pool.acquire(SourceId(2));
    assert_eq!(c, 0);
    assert_eq!(pool.slot(0).source, Some(SourceId(2)));
    assert_eq!(pool.find(SourceId(0)), None);
}

#[test]
fn allocation_skips_busy_slots() {
    let mut pool = PlanePool::new(3);
    let reserved = pool.acquire(SourceId(0));
    pool.slot_mut(reserved).busy = true;

    // Cycle enough new sources to wrap the ring twice; the reserved slot must
    // never be handed out again.
    for id in 1..7 {
        let slot = pool.acquire(SourceId(id));
        assert_ne!(slot, reserved, "busy slot {} was reused", reserved);
    }
    // The reservation itself is still reachable by identity.
    assert_eq!(pool.acquire(SourceId(0)), reserved);
}

#[test]
fn allocation_terminates_with_all_but_one_slot_busy() {
    let mut pool = PlanePool::new(4);
    for id in 0..3 {
        let slot = pool.acquire(SourceId(id));
        pool.slot_mut(slot).busy = true;
    }
    let free = pool.acquire(SourceId(99));
    assert!(!pool.slot(free).busy);
}

#[test]
fn release_clears_binding_reservation_and_visibility() {
    let mut pool = PlanePool::new(2);
    let slot = pool.acquire(SourceId(3));
    {
        let s = pool.slot_mut(slot);
        s.busy = true;
        s.visible = true;
        s.scale = glam::Vec2::new(300.0, 200.0);
    }
    pool.release(slot);
    let s = pool.slot(slot);
    assert_eq!(s.source, None);
    assert!(!s.busy);
    assert!(!s.visible);
    assert_eq!(s.scale, glam::Vec2::ZERO);
}

#[test]
fn hide_all_spares_in_transition_slots() {
    let mut pool = PlanePool::new(3);
    let a = pool.acquire(SourceId(0));
    let b = pool.acquire(SourceId(1));
    pool.slot_mut(a).visible = true;
    pool.slot_mut(b).visible = true;
    pool.slot_mut(b).in_transition = true;

    pool.hide_all();

    assert_eq!(pool.slot(a).source, None);
    assert!(!pool.slot(a).visible);
    assert_eq!(pool.slot(b).source, Some(SourceId(1)));
    assert!(pool.slot(b).visible);
    assert!(pool.slot(b).in_transition);
}

#[test]
fn find_in_transition_locates_the_single_marked_slot() {
    let mut pool = PlanePool::new(4);
    assert_eq!(pool.find_in_transition(), None);
    assert!(!pool.any_in_transition());
    pool.slot_mut(2).in_transition = true;
    assert_eq!(pool.find_in_transition(), Some(2));
    assert!(pool.any_in_transition());
}

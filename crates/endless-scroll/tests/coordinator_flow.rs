//! End-to-end load flows: viewport signals in, fetches and scroll requests out.
//!
//! These tests wire a real paged list to a coordinator and drive it the way a
//! rendering surface would: one signal per layout pass, tasks handed to a
//! pump, scroll requests drained per cycle.

use endless_core::PagedListState;
use endless_scroll::{LoadPhase, ScrollCoordinator, ViewportSignal};
use endless_testing::{Gate, ScriptedSource, TaskPump};

fn seeded(n: u32, source: ScriptedSource<u32>) -> PagedListState<u32> {
    PagedListState::with_items((0..n).collect(), source)
}

#[test]
fn test_scrolling_to_end_loads_next_batch() {
    let source = ScriptedSource::new().then_batch((20..40).collect());
    let probe = source.probe();
    let list = seeded(20, source);
    let mut coordinator = ScrollCoordinator::with_key_fn(list.clone(), |item| u64::from(*item))
        .load_more_threshold(5);
    let mut pump = TaskPump::new();

    // Mid-list: nothing to do.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(0, 7, 20))
        .is_none());
    assert_eq!(probe.calls(), 0);

    // Last item visible: rising edge, fetch starts.
    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(12, 19, 20)) {
        pump.spawn(task);
    }
    assert_eq!(probe.calls(), 1);
    assert_eq!(coordinator.phase(), LoadPhase::Loading);

    pump.run_until_stalled();
    assert_eq!(list.len(), 40);
    assert_eq!(coordinator.phase(), LoadPhase::Idle);
    assert_eq!(probe.seen_lens(), vec![20], "source saw the pre-fetch snapshot");

    // The grown list reports a new total at the same position; the
    // predicate falls, which re-arms the detector for the next approach.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(12, 19, 40))
        .is_none());
    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(32, 39, 40)) {
        pump.spawn(task);
    }
    assert_eq!(probe.calls(), 2);
    pump.run_until_stalled();
    assert_eq!(list.len(), 40, "exhausted script answers an empty batch");
}

#[test]
fn test_threshold_boundary_through_coordinator() {
    let source = ScriptedSource::new().then_batch(vec![100]);
    let probe = source.probe();
    let list = seeded(100, source);
    let mut coordinator = ScrollCoordinator::with_key_fn(list, |item| u64::from(*item))
        .load_more_threshold(5);

    // Five items remain ahead of index 94: not yet near.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(90, 94, 100))
        .is_none());
    assert_eq!(probe.calls(), 0);

    // Four remain ahead of index 95: exactly one fetch.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(91, 95, 100))
        .is_some());
    assert_eq!(probe.calls(), 1);
}

#[test]
fn test_in_flight_edges_are_dropped_not_queued() {
    let gate = Gate::closed();
    let source = ScriptedSource::new().then_gated((10..15).collect(), &gate);
    let probe = source.probe();
    let list = seeded(10, source);
    let mut coordinator = ScrollCoordinator::with_key_fn(list.clone(), |item| u64::from(*item))
        .load_more_threshold(5);
    let mut pump = TaskPump::new();

    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(5, 9, 10)) {
        pump.spawn(task);
    }
    assert_eq!(probe.calls(), 1);
    pump.run_until_stalled();
    assert!(list.is_loading(), "gated fetch stays in flight");

    // Pan away and back while loading: a fresh rising edge, still dropped.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(0, 3, 10))
        .is_none());
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(5, 9, 10))
        .is_none());
    assert_eq!(probe.calls(), 1, "no fetch may be queued behind the in-flight one");

    gate.open();
    pump.run_until_stalled();
    assert_eq!(list.len(), 15);

    // Only a fresh approach after the commit fetches again.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(5, 9, 15))
        .is_none());
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(10, 14, 15))
        .is_some());
    assert_eq!(probe.calls(), 2);
}

#[test]
fn test_error_holds_until_explicit_retry() {
    let source = ScriptedSource::new()
        .then_fail("offline")
        .then_batch((10..20).collect());
    let probe = source.probe();
    let list = seeded(10, source);
    let mut coordinator = ScrollCoordinator::with_key_fn(list.clone(), |item| u64::from(*item))
        .load_more_threshold(5);
    let mut pump = TaskPump::new();

    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(5, 9, 10)) {
        pump.spawn(task);
    }
    pump.run_until_stalled();
    assert_eq!(coordinator.phase(), LoadPhase::Error);
    assert_eq!(list.len(), 10, "failed fetch leaves items unchanged");

    // Scrolling cannot leave the error phase, not even a fresh edge.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(0, 3, 10))
        .is_none());
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(5, 9, 10))
        .is_none());
    assert_eq!(probe.calls(), 1);

    let task = coordinator.retry().expect("retry starts a fresh fetch");
    assert_eq!(coordinator.phase(), LoadPhase::Loading);
    assert!(!list.has_error(), "error clears when the retry fetch starts");
    pump.spawn(task);
    pump.run_until_stalled();

    assert_eq!(coordinator.phase(), LoadPhase::Idle);
    assert_eq!(list.len(), 20);
    assert_eq!(probe.calls(), 2);
}

#[test]
fn test_selection_resolves_when_its_batch_arrives() {
    let source = ScriptedSource::new().then_batch((10..20).collect());
    let list = seeded(10, source);
    let mut coordinator = ScrollCoordinator::with_key_fn(list.clone(), |item| u64::from(*item))
        .load_more_threshold(5);
    let mut pump = TaskPump::new();

    // Key for an item two batches away: nothing to resolve yet.
    coordinator.set_selected_key(Some(15));
    assert_eq!(coordinator.selected_index(), None);
    assert_eq!(coordinator.take_scroll_request(), None);

    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(5, 9, 10)) {
        pump.spawn(task);
    }
    pump.run_until_stalled();
    assert_eq!(list.len(), 20);

    // The next layout pass re-resolves and asks the surface to scroll there.
    assert!(coordinator
        .handle_viewport(ViewportSignal::of(5, 9, 20))
        .is_none());
    assert_eq!(coordinator.selected_index(), Some(15));
    assert_eq!(coordinator.take_scroll_request(), Some(15));
    assert_eq!(coordinator.take_scroll_request(), None, "requests are consumed");
}

#[test]
fn test_activation_then_owner_confirms_selection() {
    let source = ScriptedSource::new();
    let list = seeded(10, source);
    let events: std::rc::Rc<std::cell::RefCell<Vec<(u32, Option<u32>)>>> =
        std::rc::Rc::default();
    let seen = std::rc::Rc::clone(&events);
    let mut coordinator = ScrollCoordinator::with_key_fn(list, |item| u64::from(*item))
        .selection_observer(move |item: &u32, previous: Option<&u32>| {
            seen.borrow_mut().push((*item, previous.copied()));
        });

    // Tap on index 6: the event reports no previous selection.
    coordinator.activate_item(6);
    assert_eq!(&*events.borrow(), &[(6, None)]);

    // The owner confirms the selection; both writes land in the same slot,
    // so the surface scrolls once.
    coordinator.set_selected_key(Some(6));
    assert_eq!(coordinator.selected_index(), Some(6));
    assert_eq!(coordinator.take_scroll_request(), Some(6));
    assert_eq!(coordinator.take_scroll_request(), None);

    // A later tap reports the current selection as previous.
    coordinator.activate_item(2);
    assert_eq!(&*events.borrow(), &[(6, None), (2, Some(6))]);
}

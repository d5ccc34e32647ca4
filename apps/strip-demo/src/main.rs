//! Headless drive of the endless pagination engine.
//!
//! Plays the role of a rendering surface: feeds viewport signals as a
//! pretend user flings through the list, drains scroll requests, and prints
//! what the engine decides. Two scenes: flinging a date strip back to a
//! selected day, and recovering a flaky feed through an explicit retry.

use anyhow::{ensure, Context, Result};
use chrono::{Datelike, Days, NaiveDate};
use endless_core::{BatchFuture, PagedListState};
use endless_datestrip::{DateStripConfig, DatePolicy, DateStripState};
use endless_scroll::{ScrollCoordinator, ViewportSignal};
use endless_testing::TaskPump;

/// Items visible at once in the pretend viewport.
const SPAN: usize = 7;

fn main() -> Result<()> {
    init_logging();

    println!("=== endless strip demo ===");
    println!("A headless surface drives the engine: viewport signals go in,");
    println!("fetch tasks and scroll requests come out.");
    println!("Run with RUST_LOG=debug to see the engine's side of it.");

    fling_to_selected_date()?;
    recover_flaky_feed()?;

    println!();
    println!("done.");
    Ok(())
}

fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Scene 1: a date strip seeded from today, weekends closed, with a selected
/// day far enough in the past that the strip has to grow before it can scroll
/// there.
fn fling_to_selected_date() -> Result<()> {
    println!();
    println!("--- scene 1: fling back to a selected day ---");

    let config = DateStripConfig::default();
    let origin = config.origin;
    let weekdays_only = DatePolicy::new().predicate(|d| d.weekday().num_days_from_monday() < 5);
    let mut strip = DateStripState::with_policy(config, weekdays_only).on_date_select(
        |date: &NaiveDate, previous: Option<&NaiveDate>| {
            println!("[surface] tap reported: {date} (previously {previous:?})");
        },
    );
    let mut pump = TaskPump::new();

    // A surface would re-render on every poke; here it narrates instead.
    let list = strip.list().clone();
    strip.list().on_change(move || {
        println!("[surface] re-render: {} day(s), {:?}", list.len(), list.status());
    });

    // 80 days back: 30 past the seeded window, so resolution has to wait
    // for the first fetched batch.
    let wanted = origin - Days::new(80);
    strip.set_selected_date(Some(wanted));
    println!(
        "[surface] selected {wanted}; resolved index: {:?}",
        strip.selected_index()
    );

    // Fling toward the past until the selected day is loaded and resolved.
    let mut first = 0;
    let mut frames = 0;
    while strip.selected_index().is_none() {
        frames += 1;
        ensure!(frames < 100, "selection never resolved while flinging");
        let total = strip.dates().len();
        let last = (first + SPAN - 1).min(total - 1);
        if let Some(task) = strip.handle_viewport(ViewportSignal::of(first, last, total)) {
            pump.spawn(task);
            pump.run_until_stalled();
        }
        if last + 1 < strip.dates().len() {
            first += SPAN;
        }
    }

    let target = strip
        .take_scroll_request()
        .context("resolving a selection should request a scroll")?;
    println!("[surface] scroll request to index {target}; jumping there");
    first = target;
    let total = strip.dates().len();
    let landed = ViewportSignal::of(first, (first + SPAN - 1).min(total - 1), total);
    if let Some(task) = strip.handle_viewport(landed) {
        pump.spawn(task);
        pump.run_until_stalled();
    }
    println!(
        "[surface] showing {first}..={}, {wanted} sits at index {:?}",
        (first + SPAN - 1).min(total - 1),
        strip.selected_index()
    );

    // Weekends are closed by policy: the tap never becomes an event.
    let closed = strip
        .dates()
        .iter()
        .enumerate()
        .skip(target)
        .find(|(_, d)| !strip.is_enabled(**d))
        .map(|(i, d)| (i, *d));
    if let Some((index, day)) = closed {
        strip.activate_date(index);
        println!(
            "[surface] tap on closed {day} swallowed; scroll request: {:?}",
            strip.take_scroll_request()
        );
    }

    // A weekday tap reports the event; the owner confirms it as the new
    // selection, and both land on the same scroll slot.
    let open = strip
        .dates()
        .iter()
        .enumerate()
        .skip(target + 1)
        .find(|(_, d)| strip.is_enabled(**d))
        .map(|(i, d)| (i, *d));
    if let Some((index, day)) = open {
        strip.activate_date(index);
        strip.set_selected_date(Some(day));
        println!(
            "[surface] confirmed {day}; scroll request: {:?}",
            strip.take_scroll_request()
        );
    }

    log::info!("scene 1 done with {} day(s) loaded", strip.dates().len());
    Ok(())
}

/// Scene 2: a plain numbered feed that fails on its second fetch. Scrolling
/// cannot leave the error phase; only the explicit retry does.
fn recover_flaky_feed() -> Result<()> {
    println!();
    println!("--- scene 2: flaky feed, explicit retry ---");

    let mut fetches = 0;
    let list = PagedListState::with_items(
        (0..20).collect::<Vec<u32>>(),
        move |current: &[u32]| {
            fetches += 1;
            let from = current.last().copied().unwrap_or(0);
            if fetches == 2 {
                Box::pin(async { Err("feed offline".into()) }) as BatchFuture<u32>
            } else {
                Box::pin(async move { Ok((from + 1..=from + 20).collect()) })
            }
        },
    );
    let mut coordinator =
        ScrollCoordinator::with_key_fn(list.clone(), |item: &u32| u64::from(*item));
    let mut pump = TaskPump::new();
    println!("[surface] seeded {} item(s), phase {:?}", list.len(), coordinator.phase());

    // First approach to the end: the fetch succeeds.
    frame(&mut coordinator, &mut pump, 9, 15);
    println!(
        "[surface] after first approach: {} item(s), phase {:?}",
        list.len(),
        coordinator.phase()
    );

    // The same window against the grown list is far from the end again,
    // which re-arms the near-end detector for the next approach.
    frame(&mut coordinator, &mut pump, 9, 15);

    // Second approach: the feed fails and the error sticks.
    frame(&mut coordinator, &mut pump, 29, 35);
    if let Some(err) = list.error() {
        println!("[surface] fetch failed: {}; phase {:?}", &*err, coordinator.phase());
    }

    // Panning around produces fresh near-end edges, but they are dropped
    // while the error is held.
    frame(&mut coordinator, &mut pump, 2, 8);
    frame(&mut coordinator, &mut pump, 29, 35);
    println!(
        "[surface] scrolled around, still {} item(s), phase {:?}",
        list.len(),
        coordinator.phase()
    );

    // The retry affordance is the only way forward.
    let task = coordinator.retry().context("retry should start a fetch")?;
    pump.spawn(task);
    pump.run_until_stalled();
    println!(
        "[surface] after retry: {} item(s), phase {:?}",
        list.len(),
        coordinator.phase()
    );

    log::info!("scene 2 done with {} item(s) loaded", list.len());
    Ok(())
}

/// One layout pass of the pretend surface: report the window, drive whatever
/// fetch it starts.
fn frame(coordinator: &mut ScrollCoordinator<u32>, pump: &mut TaskPump, first: usize, last: usize) {
    let total = coordinator.list().len();
    if let Some(task) = coordinator.handle_viewport(ViewportSignal::of(first, last, total)) {
        pump.spawn(task);
    }
    pump.run_until_stalled();
}

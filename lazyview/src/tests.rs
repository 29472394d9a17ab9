use crate::*;

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use std::format;
use std::string::String;
use std::vec;
use std::vec::Vec;

type Log = Rc<RefCell<Vec<String>>>;

struct Row {
    name: &'static str,
    log: Log,
    bounds: Cell<Option<ItemBounds>>,
    album: Option<AlbumId>,
}

impl Row {
    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", self.name));
    }
}

impl Item for Row {
    fn populate(&self) {
        self.record("populate");
    }

    fn bounds(&self) -> Option<ItemBounds> {
        self.bounds.get()
    }

    fn album_id(&self) -> Option<AlbumId> {
        self.album
    }

    fn update_state(&self) {
        self.record("state");
    }

    fn update_playing_indicator(&self) {
        self.record("indicator");
    }

    fn update_duration(&self, track_id: TrackId) {
        self.record(&format!("duration({})", track_id.0));
    }

    fn update_cover(&self) {
        self.record("cover");
    }

    fn show_overlay(&self, shown: bool) {
        self.record(&format!("overlay({shown})"));
    }

    fn stop(&self) {
        self.record("stop");
    }
}

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn row(name: &'static str, log: &Log) -> Rc<Row> {
    Rc::new(Row {
        name,
        log: Rc::clone(log),
        bounds: Cell::new(None),
        album: None,
    })
}

fn row_at(name: &'static str, log: &Log, y: f64, height: f64) -> Rc<Row> {
    let p = row(name, log);
    p.bounds.set(Some(ItemBounds::new(y, height)));
    p
}

fn setup() -> (Rc<ManualLoop>, LazyView<Row>) {
    let lp = Rc::new(ManualLoop::new());
    let view = LazyView::new(lp.clone(), LazyOptions::new());
    (lp, view)
}

fn taken(log: &Log) -> Vec<String> {
    core::mem::take(&mut *log.borrow_mut())
}

fn populated(log: &Log) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|e| e.ends_with(":populate"))
        .cloned()
        .collect()
}

#[test]
fn visibility_includes_one_item_height_above_the_fold() {
    let h = 50.0;
    let viewport = 400.0;
    assert!(is_visible(Some(ItemBounds::new(-h + 1.0, h)), viewport));
    assert!(is_visible(Some(ItemBounds::new(0.0, h)), viewport));
    assert!(is_visible(Some(ItemBounds::new(viewport - 1.0, h)), viewport));
    assert!(!is_visible(Some(ItemBounds::new(viewport, h)), viewport));
    assert!(!is_visible(Some(ItemBounds::new(-h, h)), viewport));
    assert!(!is_visible(Some(ItemBounds::new(-h - 1.0, h)), viewport));
}

#[test]
fn visibility_fails_open_without_geometry() {
    assert!(is_visible(None, 400.0));
    assert!(is_visible(None, 0.0));
}

#[test]
fn scroll_tracker_debounces_small_moves() {
    let mut t = ScrollTracker::new(200.0);
    assert_eq!(t.observe(100.0), None);
    assert_eq!(t.observe(200.0), None);
    assert_eq!(t.previous(), 0.0);
    assert_eq!(t.observe(201.0), Some(201.0));
    assert_eq!(t.previous(), 201.0);
    // Scrolling back up counts the same way.
    assert_eq!(t.observe(1.0), None);
    assert_eq!(t.observe(0.5), Some(0.5));
    assert_eq!(t.observe(f64::NAN), None);
    assert_eq!(t.previous(), 0.5);
}

#[test]
fn queue_holds_each_item_once() {
    let log = new_log();
    let a = row("a", &log);
    let b = row("b", &log);
    let mut q = LazyQueue::new();
    assert!(q.push_back(a.clone()));
    assert!(q.push_back(b.clone()));
    assert!(!q.push_back(a.clone()));
    assert_eq!(q.len(), 2);
    assert!(q.remove(&a));
    assert!(!q.remove(&a));
    assert!(Rc::ptr_eq(&q.pop_front().unwrap(), &b));
    assert!(q.is_empty());
}

#[test]
fn queue_membership_follows_pops_and_clears() {
    let log = new_log();
    let items: Vec<Rc<Row>> = (0..10_000).map(|_| row("row", &log)).collect();
    let mut q = LazyQueue::new();
    for it in &items {
        assert!(q.push_back(it.clone()));
    }
    assert!(!q.push_back(items[5_000].clone()));
    assert_eq!(q.len(), items.len());

    let first = q.pop_front().unwrap();
    assert!(Rc::ptr_eq(&first, &items[0]));
    assert!(!q.contains(&first));
    // A popped item may be queued again.
    assert!(q.push_back(first.clone()));
    assert!(q.contains(&first));

    assert!(q.remove(&items[9_999]));
    assert!(!q.contains(&items[9_999]));
    q.clear();
    assert!(q.is_empty());
    assert!(!q.contains(&items[1]));
    assert!(q.push_back(items[1].clone()));
}

#[test]
fn append_then_stop_never_populates() {
    let (lp, view) = setup();
    let log = new_log();
    let a = row("a", &log);
    view.append(a.clone());
    view.lazy_load_current(vec![]);
    view.stop();

    lp.run_to_completion();
    assert!(populated(&log).is_empty());
    assert_eq!(taken(&log), vec!["a:stop"]);
    assert_eq!(view.state(), SchedulerState::Stopped);
    assert_eq!(view.queue_len(), 0);
}

#[test]
fn append_after_stop_is_ignored() {
    let (lp, view) = setup();
    let log = new_log();
    view.stop();
    view.append(row("a", &log));
    view.lazy_load_current(vec![]);
    lp.run_to_completion();
    assert!(view.children().is_empty());
    assert!(log.borrow().is_empty());
}

#[test]
fn explicit_list_populates_each_item_once_in_order() {
    let (lp, view) = setup();
    let log = new_log();
    let items = vec![row("a", &log), row("b", &log), row("c", &log)];
    for it in &items {
        view.append(it.clone());
    }

    view.lazy_load_current(items.clone());
    lp.run_to_completion();

    assert_eq!(populated(&log), vec!["a:populate", "b:populate", "c:populate"]);
    assert_eq!(view.queue_len(), 0);
    assert_eq!(view.state(), SchedulerState::Idle);
}

#[test]
fn explicit_steps_are_throttled() {
    let (lp, view) = setup();
    let log = new_log();
    let a = row("a", &log);
    let b = row("b", &log);
    view.append(a.clone());
    view.append(b.clone());

    view.lazy_load_current(vec![a, b]);
    assert_eq!(lp.run_until_idle(), 1);
    assert_eq!(populated(&log), vec!["a:populate"]);
    assert_eq!(lp.pending_timers(), 1);
    assert_eq!(view.state(), SchedulerState::Draining);

    lp.advance(DEFAULT_THROTTLE_MS - 1);
    assert_eq!(lp.run_until_idle(), 0);

    lp.advance(1);
    lp.run_until_idle();
    assert_eq!(populated(&log), vec!["a:populate", "b:populate"]);
    assert_eq!(lp.pending(), 0);
}

#[test]
fn backlog_drains_through_idle_turns() {
    let (lp, view) = setup();
    let log = new_log();
    for name in ["a", "b", "c", "d"] {
        view.append(row(name, &log));
    }

    view.lazy_load_current(vec![]);
    for expected in 1..=4 {
        assert!(lp.run_once());
        assert_eq!(populated(&log).len(), expected);
        assert_eq!(lp.pending_timers(), 0);
    }
    // The final step finds nothing and ends the run.
    assert!(lp.run_once());
    assert_eq!(lp.pending(), 0);
    assert_eq!(view.state(), SchedulerState::Idle);
}

#[test]
fn explicit_item_is_pulled_out_of_the_backlog() {
    let (lp, view) = setup();
    let log = new_log();
    let a = row("a", &log);
    let b = row("b", &log);
    let c = row("c", &log);
    for it in [&a, &b, &c] {
        view.append(it.clone());
    }

    view.lazy_load_current(vec![b.clone()]);
    assert!(lp.run_once());
    assert_eq!(populated(&log), vec!["b:populate"]);
    assert!(view.is_queued(&a));
    assert!(!view.is_queued(&b));
    assert!(view.is_queued(&c));
    assert_eq!(view.queue_len(), 2);

    lp.run_to_completion();
    assert_eq!(populated(&log), vec!["b:populate", "a:populate", "c:populate"]);
}

#[test]
fn explicit_item_already_populated_is_skipped() {
    let (lp, view) = setup();
    let log = new_log();
    let a = row("a", &log);
    let b = row("b", &log);
    view.append(a.clone());
    view.lazy_load_current(vec![]);
    lp.run_to_completion();
    assert_eq!(populated(&log), vec!["a:populate"]);

    // `a` left the backlog; asking for it again moves on to the next queued item.
    view.append(b.clone());
    view.lazy_load_current(vec![a.clone(), b.clone()]);
    assert!(lp.run_once());
    assert_eq!(populated(&log), vec!["a:populate", "b:populate"]);

    lp.run_to_completion();
    view.lazy_load_current(vec![a, b]);
    lp.run_to_completion();
    assert_eq!(populated(&log), vec!["a:populate", "b:populate"]);
    assert_eq!(view.state(), SchedulerState::Idle);
}

#[test]
fn scroll_below_threshold_does_nothing() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));

    let t = view.options().scroll_threshold;
    assert!(!view.on_scroll_changed(t / 2.0));
    assert_eq!(lp.pending(), 0);
    assert_eq!(view.scroll_state().previous, 0.0);

    assert!(view.on_scroll_changed(t + 1.0));
    assert_eq!(lp.pending(), 1);
    assert_eq!(view.scroll_state().previous, t + 1.0);

    lp.run_once();
    assert_eq!(view.token(), ScrollToken(1));
    assert_eq!(view.scroll_state().current, t + 1.0);
}

#[test]
fn scroll_with_empty_backlog_does_nothing() {
    let (lp, view) = setup();
    assert!(!view.on_scroll_changed(10_000.0));
    assert_eq!(lp.pending(), 0);
    assert_eq!(view.scroll_state().previous, 0.0);
}

#[test]
fn scroll_populates_visible_items_first() {
    let (lp, view) = setup();
    let log = new_log();
    view.set_viewport_height(100.0);
    view.append(row_at("a", &log, -1000.0, 50.0));
    view.append(row_at("b", &log, -950.0, 50.0));
    view.append(row_at("c", &log, -20.0, 50.0));
    view.append(row_at("d", &log, 30.0, 50.0));
    view.append(row_at("e", &log, 100.0, 50.0));

    assert!(view.on_scroll_changed(1000.0));
    lp.run_to_completion();

    assert_eq!(
        populated(&log),
        vec![
            "c:populate",
            "d:populate",
            "a:populate",
            "b:populate",
            "e:populate"
        ]
    );
}

#[test]
fn stale_run_stops_once_a_newer_scroll_run_starts() {
    let (lp, view) = setup();
    let log = new_log();
    for name in ["a", "b", "c", "d", "e"] {
        view.append(row(name, &log));
    }

    view.lazy_load_current(vec![]);
    assert!(lp.run_once());
    assert_eq!(populated(&log), vec!["a:populate"]);

    // The recomputation is queued behind the old run's next step.
    assert!(view.on_scroll_changed(500.0));
    assert!(lp.run_once());
    assert_eq!(populated(&log).len(), 2);

    // Recomputation: the token moves on and a new run is queued.
    assert!(lp.run_once());
    assert_eq!(view.token(), ScrollToken(1));

    // The old run's next step sees the stale token and ends without populating.
    assert!(lp.run_once());
    assert_eq!(populated(&log).len(), 2);

    lp.run_to_completion();
    assert_eq!(
        populated(&log),
        vec![
            "a:populate",
            "b:populate",
            "c:populate",
            "d:populate",
            "e:populate"
        ]
    );
}

#[test]
fn run_with_old_token_does_nothing() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));

    assert!(view.on_scroll_changed(1000.0));
    view.lazy_load(vec![], ScrollToken(0));
    // Recomputation first, then the run stamped with the outdated token.
    assert!(lp.run_once());
    assert!(lp.run_once());
    assert!(populated(&log).is_empty());

    lp.run_to_completion();
    assert_eq!(populated(&log), vec!["a:populate"]);
}

#[test]
fn stop_ends_a_run_in_progress() {
    let (lp, view) = setup();
    let log = new_log();
    for name in ["a", "b", "c"] {
        view.append(row(name, &log));
    }
    view.lazy_load_current(vec![]);
    lp.run_once();
    view.stop();
    lp.run_to_completion();

    assert_eq!(
        taken(&log),
        vec!["a:populate", "a:stop", "b:stop", "c:stop"]
    );
    assert_eq!(view.state(), SchedulerState::Stopped);

    // Stopping twice does not stop the children twice.
    view.stop();
    assert!(log.borrow().is_empty());
}

#[test]
fn dropping_the_view_cancels_pending_work() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));
    view.lazy_load_current(vec![]);
    view.update_children();
    drop(view);

    lp.run_to_completion();
    assert!(log.borrow().is_empty());
}

#[test]
fn works_with_heterogeneous_items() {
    struct Header(Rc<Cell<usize>>);
    impl Item for Header {
        fn populate(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    let lp = Rc::new(ManualLoop::new());
    let view: LazyView<dyn Item> = LazyView::new(lp.clone(), LazyOptions::new());
    let log = new_log();
    let count = Rc::new(Cell::new(0));
    view.append(Rc::new(Header(count.clone())));
    view.append(row("row", &log));

    view.lazy_load_current(vec![]);
    lp.run_to_completion();
    assert_eq!(count.get(), 1);
    assert_eq!(populated(&log), vec!["row:populate"]);
}

#[test]
fn update_children_touches_one_child_per_turn() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));
    view.append(row("b", &log));

    view.update_children();
    assert!(lp.run_once());
    assert_eq!(taken(&log), vec!["a:state", "a:indicator"]);
    assert_eq!(lp.pending_idle(), 1);
    assert!(lp.run_once());
    assert_eq!(taken(&log), vec!["b:state", "b:indicator"]);
    assert_eq!(lp.pending(), 0);
}

#[test]
fn batches_end_when_the_view_stops() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));
    view.append(row("b", &log));

    view.update_duration(TrackId(7));
    lp.run_once();
    assert_eq!(taken(&log), vec!["a:duration(7)"]);
    view.stop();
    taken(&log);
    lp.run_to_completion();
    assert!(log.borrow().is_empty());
}

#[test]
fn pointer_leave_outside_disables_overlays() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(row("a", &log));

    assert!(!view.on_pointer_leave(10.0, 10.0, 100.0, 100.0));
    lp.run_to_completion();
    assert!(log.borrow().is_empty());

    assert!(view.on_pointer_leave(100.0, 10.0, 100.0, 100.0));
    lp.run_to_completion();
    assert_eq!(taken(&log), vec!["a:overlay(false)"]);

    assert!(view.on_pointer_leave(50.0, 0.0, 100.0, 100.0));
    lp.run_to_completion();
    assert_eq!(taken(&log), vec!["a:overlay(false)"]);
}

#[test]
fn cover_update_only_reaches_matching_album() {
    let (_lp, view) = setup();
    let log = new_log();
    let with_album = |name, album| {
        Rc::new(Row {
            name,
            log: Rc::clone(&log),
            bounds: Cell::new(None),
            album,
        })
    };
    view.append(with_album("a", Some(AlbumId(1))));
    view.append(with_album("b", Some(AlbumId(2))));
    view.append(with_album("c", None));

    view.update_cover(AlbumId(2));
    assert_eq!(taken(&log), vec!["b:cover"]);
}

#[test]
fn subscriptions_route_notifications_until_detached() {
    let (lp, view) = setup();
    let log = new_log();
    view.append(Rc::new(Row {
        name: "a",
        log: Rc::clone(&log),
        bounds: Cell::new(None),
        album: Some(AlbumId(3)),
    }));

    let player = PlayerSignals::new();
    let art = ArtSignals::new();
    view.subscribe(&player, &art);
    assert_eq!(player.current_changed.len(), 1);

    player.current_changed.emit(&());
    player.duration_changed.emit(&TrackId(9));
    art.album_artwork_changed.emit(&AlbumId(3));
    // Cover updates are synchronous, the rest waits for the loop.
    assert_eq!(taken(&log), vec!["a:cover"]);
    lp.run_to_completion();
    assert_eq!(
        taken(&log),
        vec!["a:state", "a:indicator", "a:duration(9)"]
    );

    view.detach();
    assert!(player.current_changed.is_empty());
    assert!(player.duration_changed.is_empty());
    assert!(art.album_artwork_changed.is_empty());
    player.current_changed.emit(&());
    art.album_artwork_changed.emit(&AlbumId(3));
    lp.run_to_completion();
    assert!(log.borrow().is_empty());
}

#[test]
fn dropping_the_view_disconnects_handlers() {
    let (_lp, view) = setup();
    let player = PlayerSignals::new();
    let art = ArtSignals::new();
    view.subscribe(&player, &art);
    drop(view);
    assert!(player.current_changed.is_empty());
    assert!(art.album_artwork_changed.is_empty());
}

#[test]
fn populate_may_append_to_the_view() {
    struct Grower {
        view: RefCell<Option<LazyView<dyn Item>>>,
        log: Log,
    }
    impl Item for Grower {
        fn populate(&self) {
            if let Some(view) = self.view.borrow_mut().take() {
                view.append(row("late", &self.log));
            }
        }
    }

    let lp = Rc::new(ManualLoop::new());
    let view: LazyView<dyn Item> = LazyView::new(lp.clone(), LazyOptions::new());
    let log = new_log();
    view.append(Rc::new(Grower {
        view: RefCell::new(Some(view.clone())),
        log: Rc::clone(&log),
    }));

    view.lazy_load_current(vec![]);
    lp.run_to_completion();
    assert_eq!(populated(&log), vec!["late:populate"]);
    assert_eq!(view.children().len(), 2);
}

#[test]
fn signal_handlers_may_unsubscribe_while_emitting() {
    let signal: Rc<Signal<u32>> = Rc::new(Signal::new());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let sub = {
        let seen = Rc::clone(&seen);
        let slot = Rc::clone(&slot);
        signal.connect(move |v| {
            seen.borrow_mut().push(*v);
            if let Some(sub) = slot.borrow_mut().take() {
                sub.unsubscribe();
            }
        })
    };
    *slot.borrow_mut() = Some(sub);

    signal.emit(&1);
    signal.emit(&2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert!(signal.is_empty());
}

#[test]
fn subscription_may_outlive_its_signal() {
    let signal: Signal<()> = Signal::new();
    let sub = signal.connect(|_| {});
    drop(signal);
    sub.unsubscribe();
}

#[test]
fn manual_loop_runs_due_timers_before_idle_tasks() {
    let lp = ManualLoop::new();
    let order = Rc::new(RefCell::new(Vec::new()));
    for (label, delay) in [("late", Some(20u64)), ("idle", None), ("soon", Some(5))] {
        let order = Rc::clone(&order);
        let task: Task = std::boxed::Box::new(move || order.borrow_mut().push(label));
        match delay {
            Some(ms) => lp.run_after_delay(ms, task),
            None => lp.run_when_idle(task),
        }
    }

    assert_eq!(lp.run_until_idle(), 1);
    assert_eq!(*order.borrow(), vec!["idle"]);

    lp.advance(5);
    lp.run_when_idle(std::boxed::Box::new({
        let order = Rc::clone(&order);
        move || order.borrow_mut().push("idle2")
    }));
    lp.run_until_idle();
    assert_eq!(*order.borrow(), vec!["idle", "soon", "idle2"]);

    assert_eq!(lp.run_to_completion(), 1);
    assert_eq!(lp.now_ms(), 20);
    assert_eq!(*order.borrow(), vec!["idle", "soon", "idle2", "late"]);
}

#[test]
fn options_builder() {
    let o = LazyOptions::new()
        .with_scroll_threshold(64.0)
        .with_throttle_ms(25);
    assert_eq!(o.scroll_threshold, 64.0);
    assert_eq!(o.throttle_ms, 25);
    assert_eq!(LazyOptions::default().scroll_threshold, BIG_ART_SIZE);
}

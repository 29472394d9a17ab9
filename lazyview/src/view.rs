use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::visibility::is_visible;
use crate::{
    AlbumId, ArtSignals, Batch, Executor, Item, LazyOptions, LazyQueue, PlayerSignals,
    SchedulerState, ScrollState, ScrollToken, ScrollTracker, Subscription, Task, TrackId,
};

struct ViewState<I: ?Sized> {
    queue: LazyQueue<I>,
    children: Vec<Rc<I>>,
    stopped: bool,
    token: ScrollToken,
    tracker: ScrollTracker,
    current_scroll: f64,
    viewport_height: f64,
    // Population steps and recomputations scheduled but not run yet.
    in_flight: usize,
}

struct Shared<I: ?Sized> {
    executor: Rc<dyn Executor>,
    options: LazyOptions,
    state: RefCell<ViewState<I>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

/// A scrollable list whose items are populated lazily, one per event-loop turn.
///
/// This type is UI-agnostic:
/// - It does not hold any toolkit objects; items are host handles implementing [`Item`].
/// - The host drives it with scroll values (`on_scroll_changed`), the viewport height
///   (`set_viewport_height`) and pointer events (`on_pointer_leave`).
/// - All deferred work goes through the host's [`Executor`].
///
/// Population order: items passed explicitly to [`LazyView::lazy_load`] first, then the
/// backlog in append order. Each scroll that moves further than
/// [`LazyOptions::scroll_threshold`] re-evaluates visibility and starts a new run that puts the
/// visible backlog items first; older runs notice their stale [`ScrollToken`] and end.
///
/// `LazyView` is a cheap handle: clones share the same view. Scheduled work only holds weak
/// references, so dropping the last handle cancels everything still pending.
pub struct LazyView<I: ?Sized> {
    shared: Rc<Shared<I>>,
}

impl<I: ?Sized> Clone for LazyView<I> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<I: Item + ?Sized + 'static> LazyView<I> {
    pub fn new(executor: Rc<dyn Executor>, options: LazyOptions) -> Self {
        ldebug!(
            scroll_threshold = options.scroll_threshold,
            throttle_ms = options.throttle_ms,
            "LazyView::new"
        );
        Self {
            shared: Rc::new(Shared {
                executor,
                options,
                state: RefCell::new(ViewState {
                    queue: LazyQueue::new(),
                    children: Vec::new(),
                    stopped: false,
                    token: ScrollToken::default(),
                    tracker: ScrollTracker::new(options.scroll_threshold),
                    current_scroll: 0.0,
                    viewport_height: 0.0,
                    in_flight: 0,
                }),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    fn from_shared(shared: Rc<Shared<I>>) -> Self {
        Self { shared }
    }

    pub fn options(&self) -> &LazyOptions {
        &self.shared.options
    }

    pub fn executor(&self) -> &Rc<dyn Executor> {
        &self.shared.executor
    }

    /// Adds `item` as a child of the view and queues it for population.
    ///
    /// Ignored once the view is stopped.
    pub fn append(&self, item: Rc<I>) {
        let mut st = self.shared.state.borrow_mut();
        if st.stopped {
            ldebug!("LazyView::append after stop, ignoring");
            return;
        }
        if st.queue.push_back(Rc::clone(&item)) {
            st.children.push(item);
        }
    }

    /// A snapshot of every appended item, populated or not, in append order.
    pub fn children(&self) -> Vec<Rc<I>> {
        self.shared.state.borrow().children.clone()
    }

    /// Number of items still waiting for population.
    pub fn queue_len(&self) -> usize {
        self.shared.state.borrow().queue.len()
    }

    pub fn is_queued(&self, item: &Rc<I>) -> bool {
        self.shared.state.borrow().queue.contains(item)
    }

    /// The token of the latest scroll-triggered run.
    pub fn token(&self) -> ScrollToken {
        self.shared.state.borrow().token
    }

    pub fn scroll_state(&self) -> ScrollState {
        let st = self.shared.state.borrow();
        ScrollState {
            current: st.current_scroll,
            previous: st.tracker.previous(),
        }
    }

    pub fn viewport_height(&self) -> f64 {
        self.shared.state.borrow().viewport_height
    }

    /// Records the scroll container's visible height, used for visibility checks.
    pub fn set_viewport_height(&self, height: f64) {
        self.shared.state.borrow_mut().viewport_height = height;
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.state.borrow().stopped
    }

    pub fn state(&self) -> SchedulerState {
        let st = self.shared.state.borrow();
        if st.stopped {
            SchedulerState::Stopped
        } else if st.in_flight > 0 {
            SchedulerState::Draining
        } else {
            SchedulerState::Idle
        }
    }

    /// Starts a population run stamped with `token`.
    ///
    /// `explicit` items are populated first, spaced by [`LazyOptions::throttle_ms`], then the
    /// backlog is drained through the idle primitive. The run ends when both are empty, when the
    /// view is stopped, or when `token` is no longer the view's current token.
    pub fn lazy_load(&self, explicit: Vec<Rc<I>>, token: ScrollToken) {
        ltrace!(explicit = explicit.len(), token = token.0, "LazyView::lazy_load");
        schedule_step(&self.shared, explicit.into(), token, None);
    }

    /// Starts a population run stamped with the current token.
    pub fn lazy_load_current(&self, explicit: Vec<Rc<I>>) {
        let token = self.token();
        self.lazy_load(explicit, token);
    }

    /// Feeds the scroll container's new position.
    ///
    /// Returns `true` when a visibility recomputation was scheduled: the backlog is non-empty
    /// and the position moved further than the threshold since the last recomputation.
    pub fn on_scroll_changed(&self, value: f64) -> bool {
        let accepted = {
            let mut st = self.shared.state.borrow_mut();
            if st.queue.is_empty() {
                return false;
            }
            st.tracker.observe(value)
        };
        let Some(value) = accepted else {
            return false;
        };

        ltrace!(value, "LazyView::on_scroll_changed: scheduling recomputation");
        self.shared.state.borrow_mut().in_flight += 1;
        let weak = Rc::downgrade(&self.shared);
        self.shared.executor.run_when_idle(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                recompute_visible(&shared, value);
            }
        }));
        true
    }

    /// Stops populating.
    ///
    /// Clears the backlog, tells every child to stop, and makes every pending step and batch
    /// end on its next turn.
    pub fn stop(&self) {
        let children = {
            let mut st = self.shared.state.borrow_mut();
            if st.stopped {
                return;
            }
            st.stopped = true;
            st.queue.clear();
            st.children.clone()
        };
        ldebug!(children = children.len(), "LazyView::stop");
        for child in children {
            child.stop();
        }
    }

    /// Refreshes state and playing indicator of every child, one per idle turn.
    pub fn update_children(&self) {
        self.spawn_batch(|child| {
            child.update_state();
            child.update_playing_indicator();
        });
    }

    /// Hides the overlay of every child, one per idle turn.
    pub fn disable_overlays(&self) {
        self.spawn_batch(|child| child.show_overlay(false));
    }

    /// Updates the displayed duration of `track_id` on every child, one per idle turn.
    pub fn update_duration(&self, track_id: TrackId) {
        self.spawn_batch(move |child| child.update_duration(track_id));
    }

    /// Reloads the cover of every child showing `album_id`.
    pub fn update_cover(&self, album_id: AlbumId) {
        for child in self.children() {
            if child.album_id() == Some(album_id) {
                child.update_cover();
            }
        }
    }

    /// The pointer left the scroll container.
    ///
    /// Children may miss their own leave event, so overlays are disabled when `(x, y)` lies on
    /// or outside the container's `width` x `height` allocation. Returns whether they were.
    pub fn on_pointer_leave(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        if x <= 0.0 || x >= width || y <= 0.0 || y >= height {
            self.disable_overlays();
            true
        } else {
            false
        }
    }

    /// Connects the view to the player and artwork notifications.
    ///
    /// - current track changed: [`LazyView::update_children`]
    /// - duration changed: [`LazyView::update_duration`]
    /// - album artwork changed: [`LazyView::update_cover`]
    ///
    /// The connections last until [`LazyView::detach`] or until the view is dropped.
    pub fn subscribe(&self, player: &PlayerSignals, art: &ArtSignals) {
        let current = {
            let weak = Rc::downgrade(&self.shared);
            player.current_changed.connect(move |_| {
                if let Some(shared) = weak.upgrade() {
                    LazyView::from_shared(shared).update_children();
                }
            })
        };
        let duration = {
            let weak = Rc::downgrade(&self.shared);
            player.duration_changed.connect(move |track_id| {
                if let Some(shared) = weak.upgrade() {
                    LazyView::from_shared(shared).update_duration(*track_id);
                }
            })
        };
        let cover = {
            let weak = Rc::downgrade(&self.shared);
            art.album_artwork_changed.connect(move |album_id| {
                if let Some(shared) = weak.upgrade() {
                    LazyView::from_shared(shared).update_cover(*album_id);
                }
            })
        };
        self.shared
            .subscriptions
            .borrow_mut()
            .extend([current, duration, cover]);
    }

    /// Drops every connection made by [`LazyView::subscribe`].
    pub fn detach(&self) {
        let subscriptions = core::mem::take(&mut *self.shared.subscriptions.borrow_mut());
        ldebug!(count = subscriptions.len(), "LazyView::detach");
        drop(subscriptions);
    }

    fn spawn_batch(&self, apply: impl Fn(&Rc<I>) + 'static) {
        if self.is_stopped() {
            return;
        }
        let weak: Weak<Shared<I>> = Rc::downgrade(&self.shared);
        Batch::spawn(
            Rc::clone(&self.shared.executor),
            self.children(),
            apply,
            move || weak.upgrade().is_none_or(|shared| shared.state.borrow().stopped),
        );
    }
}

fn schedule_step<I: Item + ?Sized + 'static>(
    shared: &Rc<Shared<I>>,
    explicit: VecDeque<Rc<I>>,
    token: ScrollToken,
    delay_ms: Option<u64>,
) {
    shared.state.borrow_mut().in_flight += 1;
    let weak = Rc::downgrade(shared);
    let task: Task = Box::new(move || {
        if let Some(shared) = weak.upgrade() {
            step(&shared, explicit, token);
        }
    });
    match delay_ms {
        Some(ms) => shared.executor.run_after_delay(ms, task),
        None => shared.executor.run_when_idle(task),
    }
}

fn step<I: Item + ?Sized + 'static>(
    shared: &Rc<Shared<I>>,
    mut explicit: VecDeque<Rc<I>>,
    token: ScrollToken,
) {
    let item = {
        let mut st = shared.state.borrow_mut();
        st.in_flight = st.in_flight.saturating_sub(1);
        if st.stopped {
            ltrace!(token = token.0, "LazyView: run ends, view stopped");
            return;
        }
        if st.token != token {
            ltrace!(
                token = token.0,
                current = st.token.0,
                "LazyView: run ends, stale token"
            );
            return;
        }
        // Explicit items that already left the backlog were populated (or the view let go of
        // them); they are skipped so nothing is populated twice.
        let mut next = None;
        while let Some(item) = explicit.pop_front() {
            if st.queue.remove(&item) {
                next = Some(item);
                break;
            }
            ltrace!(token = token.0, "LazyView: explicit item no longer queued, skipping");
        }
        next.or_else(|| st.queue.pop_front())
    };
    let Some(item) = item else {
        ltrace!(token = token.0, "LazyView: run drained");
        return;
    };

    // No borrow is held here: populate may append to the view.
    item.populate();

    if explicit.is_empty() {
        schedule_step(shared, explicit, token, None);
    } else {
        let throttle_ms = shared.options.throttle_ms;
        schedule_step(shared, explicit, token, Some(throttle_ms));
    }
}

fn recompute_visible<I: Item + ?Sized + 'static>(shared: &Rc<Shared<I>>, value: f64) {
    let (backlog, viewport_height, token) = {
        let mut st = shared.state.borrow_mut();
        st.in_flight = st.in_flight.saturating_sub(1);
        if st.stopped {
            return;
        }
        st.token = st.token.next();
        st.current_scroll = value;
        let backlog: Vec<Rc<I>> = st.queue.iter().cloned().collect();
        (backlog, st.viewport_height, st.token)
    };

    let visible: VecDeque<Rc<I>> = backlog
        .into_iter()
        .filter(|item| is_visible(item.bounds(), viewport_height))
        .collect();
    ldebug!(
        value,
        token = token.0,
        visible = visible.len(),
        "LazyView: visibility recomputed"
    );
    schedule_step(shared, visible, token, None);
}

impl<I: ?Sized> core::fmt::Debug for LazyView<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let st = self.shared.state.borrow();
        f.debug_struct("LazyView")
            .field("options", &self.shared.options)
            .field("children", &st.children.len())
            .field("queued", &st.queue.len())
            .field("stopped", &st.stopped)
            .field("token", &st.token)
            .field("in_flight", &st.in_flight)
            .finish_non_exhaustive()
    }
}

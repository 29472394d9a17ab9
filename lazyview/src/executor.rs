use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::RefCell;

/// A deferred unit of work. It runs once, on the thread that scheduled it.
pub type Task = Box<dyn FnOnce()>;

/// The host's deferred-execution facility.
///
/// Both primitives return immediately and run `task` later on the same thread:
/// - `run_when_idle`: after the current event-loop turn, as soon as the loop is idle
///   (e.g. `glib::idle_add_local_once`).
/// - `run_after_delay`: once `delay_ms` milliseconds have elapsed
///   (e.g. `glib::timeout_add_local_once`).
///
/// A task that wants to continue schedules its own continuation; a task that returns without
/// scheduling stops.
pub trait Executor {
    fn run_when_idle(&self, task: Task);
    fn run_after_delay(&self, delay_ms: u64, task: Task);
}

struct Timer {
    due_ms: u64,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct LoopState {
    now_ms: u64,
    seq: u64,
    idle: VecDeque<Task>,
    timers: Vec<Timer>,
}

impl LoopState {
    fn next_due_timer(&self) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)
    }

    fn earliest_due_ms(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_ms).min()
    }
}

/// A deterministic, single-threaded event loop with a virtual millisecond clock.
///
/// Nothing runs until the owner pumps the loop. Due timers run before idle tasks; tasks of the
/// same kind run in scheduling order. This is what tests and headless hosts drive a
/// [`crate::LazyView`] with.
#[derive(Default)]
pub struct ManualLoop {
    state: RefCell<LoopState>,
}

impl ManualLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of scheduled tasks, idle and timed.
    pub fn pending(&self) -> usize {
        let st = self.state.borrow();
        st.idle.len() + st.timers.len()
    }

    pub fn pending_idle(&self) -> usize {
        self.state.borrow().idle.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Moves the virtual clock forward. Does not run anything.
    pub fn advance(&self, ms: u64) {
        let mut st = self.state.borrow_mut();
        st.now_ms = st.now_ms.saturating_add(ms);
    }

    /// Runs a single task: the earliest due timer if any, otherwise the oldest idle task.
    ///
    /// Returns `false` when nothing was runnable at the current time.
    pub fn run_once(&self) -> bool {
        let task = {
            let mut st = self.state.borrow_mut();
            match st.next_due_timer() {
                Some(index) => Some(st.timers.swap_remove(index).task),
                None => st.idle.pop_front(),
            }
        };
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Runs tasks until nothing is runnable without moving the clock.
    ///
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0usize;
        while self.run_once() {
            ran = ran.saturating_add(1);
        }
        ran
    }

    /// Runs everything, jumping the clock to the next timer whenever only future timers remain.
    ///
    /// Returns the number of tasks run.
    pub fn run_to_completion(&self) -> usize {
        let mut ran = 0usize;
        loop {
            ran = ran.saturating_add(self.run_until_idle());
            let next = self.state.borrow().earliest_due_ms();
            match next {
                Some(due_ms) => {
                    let mut st = self.state.borrow_mut();
                    st.now_ms = st.now_ms.max(due_ms);
                }
                None => return ran,
            }
        }
    }
}

impl Executor for ManualLoop {
    fn run_when_idle(&self, task: Task) {
        self.state.borrow_mut().idle.push_back(task);
    }

    fn run_after_delay(&self, delay_ms: u64, task: Task) {
        let mut st = self.state.borrow_mut();
        let due_ms = st.now_ms.saturating_add(delay_ms);
        let seq = st.seq;
        st.seq = seq.wrapping_add(1);
        st.timers.push(Timer { due_ms, seq, task });
    }
}

impl core::fmt::Debug for ManualLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("ManualLoop")
            .field("now_ms", &st.now_ms)
            .field("idle", &st.idle.len())
            .field("timers", &st.timers.len())
            .finish()
    }
}

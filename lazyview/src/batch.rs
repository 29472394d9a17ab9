use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;

use crate::Executor;

/// Applies a side-effecting operation to a list of items, one item per idle turn.
///
/// Each turn pops the front item, applies the operation, and schedules the next turn while
/// items remain. The loop is never blocked for longer than one item's cost. `cancelled` is
/// checked before every item; once it returns `true` the batch ends without rescheduling.
pub struct Batch<T, F, C> {
    executor: Rc<dyn Executor>,
    items: VecDeque<T>,
    apply: F,
    cancelled: C,
}

impl<T, F, C> Batch<T, F, C>
where
    T: 'static,
    F: Fn(&T) + 'static,
    C: Fn() -> bool + 'static,
{
    /// Schedules the first turn. Does nothing for an empty list.
    pub fn spawn(
        executor: Rc<dyn Executor>,
        items: impl IntoIterator<Item = T>,
        apply: F,
        cancelled: C,
    ) {
        let batch = Self {
            executor,
            items: items.into_iter().collect(),
            apply,
            cancelled,
        };
        if batch.items.is_empty() {
            return;
        }
        ltrace!(len = batch.items.len(), "Batch::spawn");
        batch.schedule();
    }

    fn schedule(self) {
        let executor = Rc::clone(&self.executor);
        executor.run_when_idle(Box::new(move || self.turn()));
    }

    fn turn(mut self) {
        if (self.cancelled)() {
            ltrace!(remaining = self.items.len(), "Batch: cancelled");
            return;
        }
        let Some(item) = self.items.pop_front() else {
            return;
        };
        (self.apply)(&item);
        if !self.items.is_empty() {
            self.schedule();
        }
    }
}

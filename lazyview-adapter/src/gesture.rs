use core::cell::Cell;

/// Press-and-hold detection.
///
/// `press` arms the gesture and hands out a ticket; the host schedules a timer carrying that
/// ticket. Whichever comes first wins: `fire(ticket)` from the timer (a long press) or
/// `release` (a click). A ticket from an earlier press never fires, so timers never need to be
/// removed from the loop.
#[derive(Debug, Default)]
pub struct LongPress {
    generation: Cell<u64>,
    armed: Cell<bool>,
}

impl LongPress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    /// Arms the gesture. Returns the ticket the timer must present to `fire`.
    pub fn press(&self) -> u64 {
        let ticket = self.generation.get().wrapping_add(1);
        self.generation.set(ticket);
        self.armed.set(true);
        ticket
    }

    /// The hold timer elapsed. Returns `true` when this is a long press.
    pub fn fire(&self, ticket: u64) -> bool {
        if self.armed.get() && self.generation.get() == ticket {
            self.armed.set(false);
            true
        } else {
            false
        }
    }

    /// The pointer was released. Returns `true` when the timer had not fired yet (a click).
    pub fn release(&self) -> bool {
        self.armed.replace(false)
    }
}

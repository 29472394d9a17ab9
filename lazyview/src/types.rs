/// Identifier of a track known to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackId(pub i64);

/// Identifier of an album known to the art cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlbumId(pub i64);

/// An item's rectangle in the scroll axis, relative to the scroll container.
///
/// `y` is negative when the item's top edge is above the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemBounds {
    pub y: f64,
    pub height: f64,
}

impl ItemBounds {
    pub fn new(y: f64, height: f64) -> Self {
        Self { y, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Identifies one scroll-triggered population run.
///
/// Every visibility recomputation advances the view's token; a run carrying an older token is
/// stale and stops at its next step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToken(pub u64);

impl ScrollToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifecycle of a [`crate::LazyView`] scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerState {
    /// Nothing is scheduled.
    Idle,
    /// At least one population step or recomputation is pending on the executor.
    Draining,
    /// `stop()` was called; nothing will be populated anymore.
    Stopped,
}

/// Size of a "big" artwork tile, in pixels. Scrolling less than this never re-evaluates
/// visibility.
pub const BIG_ART_SIZE: f64 = 200.0;

/// Delay between two steps of a run that still has explicitly requested items.
pub const DEFAULT_THROTTLE_MS: u64 = 10;

/// Configuration for [`crate::LazyView`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize` so hosts can keep it
/// next to their own settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LazyOptions {
    /// Minimum scroll delta (exclusive) that triggers a visibility recomputation.
    pub scroll_threshold: f64,
    /// Delay before the next step while explicitly requested items remain.
    ///
    /// Backlog items are drained through the idle primitive instead, as fast as idle time
    /// allows.
    pub throttle_ms: u64,
}

impl Default for LazyOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LazyOptions {
    pub fn new() -> Self {
        Self {
            scroll_threshold: BIG_ART_SIZE,
            throttle_ms: DEFAULT_THROTTLE_MS,
        }
    }

    pub fn with_scroll_threshold(mut self, scroll_threshold: f64) -> Self {
        self.scroll_threshold = scroll_threshold;
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }
}

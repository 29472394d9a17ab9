/// A lightweight, serializable snapshot of the scroll position seen by the tracker.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    /// The last value a visibility recomputation ran for.
    pub current: f64,
    /// The last value that passed the threshold check.
    pub previous: f64,
}

/// Debounces scroll-position changes by a minimum pixel delta.
///
/// The tracker is pure state: it decides whether a new scroll value warrants a visibility
/// recomputation and remembers the value that last did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTracker {
    previous: f64,
    threshold: f64,
}

impl ScrollTracker {
    pub fn new(threshold: f64) -> Self {
        let valid = threshold.is_finite() && threshold >= 0.0;
        if !valid {
            lwarn!(threshold, "ScrollTracker: invalid threshold, using 0");
            debug_assert!(valid, "ScrollTracker: invalid threshold ({threshold})");
        }
        Self {
            previous: 0.0,
            threshold: if valid { threshold } else { 0.0 },
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Feeds a new scroll value.
    ///
    /// Returns `Some(value)` and records it as the new baseline when it moved more than the
    /// threshold away from the previous baseline; returns `None` otherwise.
    pub fn observe(&mut self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            lwarn!(value, "ScrollTracker: ignoring non-finite scroll value");
            return None;
        }
        let diff = self.previous - value;
        if diff > self.threshold || diff < -self.threshold {
            self.previous = value;
            Some(value)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}

//! A headless lazy-population scheduler for scrollable list views.
//!
//! Populating a long list of rich rows (album covers, playlist rows) in one go blocks the UI
//! thread. This crate defers every row's expensive first render to the host's event loop, one
//! row per turn, and re-prioritizes the rows that scroll into view.
//!
//! It is UI-agnostic. A GTK/egui/TUI layer is expected to provide:
//! - a deferred-execution facility ([`Executor`]: run-when-idle and run-after-delay)
//! - list items implementing [`Item`] (populate, geometry, update hooks)
//! - the viewport height and scroll values of the scroll container
//!
//! Player and artwork change notifications are plain [`Signal`]s ([`PlayerSignals`],
//! [`ArtSignals`]) that a view can subscribe to.
//!
//! For the now-playing toolbar presenter, see the `lazyview-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod batch;
mod events;
mod executor;
mod item;
mod options;
mod queue;
mod signal;
mod state;
mod types;
mod view;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use batch::Batch;
pub use events::{ArtSignals, PlayerSignals};
pub use executor::{Executor, ManualLoop, Task};
pub use item::Item;
pub use options::{BIG_ART_SIZE, DEFAULT_THROTTLE_MS, LazyOptions};
pub use queue::LazyQueue;
pub use signal::{Signal, Subscription};
pub use state::{ScrollState, ScrollTracker};
pub use types::{AlbumId, ItemBounds, SchedulerState, ScrollToken, TrackId};
pub use view::LazyView;
pub use visibility::is_visible;

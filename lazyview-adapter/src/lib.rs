//! Adapter utilities for the `lazyview` crate.
//!
//! The `lazyview` crate schedules lazy list population and routes player/artwork
//! notifications. This crate provides the pieces a music player's chrome needs on top of it:
//!
//! - A headless now-playing toolbar presenter (cover, title, artist, loading spinner)
//! - Press-and-hold detection driven by the host's executor
//! - Tooltip markup helpers
//!
//! This crate is intentionally framework-agnostic (no GTK/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod gesture;
mod markup;
mod options;
mod toolbar;
mod track;


pub use gesture::LongPress;
pub use markup::{escape_markup, now_playing_tooltip};
pub use options::{DEFAULT_LONG_PRESS_MS, SMALL_ART_SIZE, ToolbarOptions};
pub use toolbar::{PRIMARY_BUTTON, ToolbarAction, ToolbarModel, ToolbarPresenter};
pub use track::{ArtCache, PlayerState, Track, TrackKind};

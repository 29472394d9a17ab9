use alloc::string::String;

use crate::{AlbumId, Signal, TrackId};

/// Change notifications published by the player service.
#[derive(Debug, Default)]
pub struct PlayerSignals {
    /// The current track changed.
    pub current_changed: Signal<()>,
    /// The duration of a track became known or changed.
    pub duration_changed: Signal<TrackId>,
    /// The player started loading a new stream.
    pub loading_changed: Signal<()>,
}

impl PlayerSignals {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Change notifications published by the artwork cache.
#[derive(Debug, Default)]
pub struct ArtSignals {
    /// The artwork of an album was (re)loaded.
    pub album_artwork_changed: Signal<AlbumId>,
    /// The logo of a radio station, identified by name, was (re)loaded.
    pub radio_artwork_changed: Signal<String>,
}

impl ArtSignals {
    pub fn new() -> Self {
        Self::default()
    }
}

use alloc::string::String;

use lazyview::{AlbumId, TrackId};

/// What the player is currently playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackKind {
    /// Nothing is loaded.
    #[default]
    None,
    /// A track from the local collection.
    Local(TrackId),
    /// A web radio stream.
    Radio,
    /// A file opened from outside the collection.
    Externals,
}

/// A snapshot of the player's current track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub kind: TrackKind,
    pub title: String,
    pub artist: String,
    pub album_id: Option<AlbumId>,
    /// For radios, the station name.
    pub album_artist: String,
}

impl Track {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn local(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        album_id: AlbumId,
    ) -> Self {
        let artist = artist.into();
        Self {
            kind: TrackKind::Local(id),
            title: title.into(),
            album_artist: artist.clone(),
            artist,
            album_id: Some(album_id),
        }
    }

    pub fn radio(station: impl Into<String>, title: impl Into<String>) -> Self {
        let station = station.into();
        Self {
            kind: TrackKind::Radio,
            title: title.into(),
            artist: station.clone(),
            album_id: None,
            album_artist: station,
        }
    }

    pub fn external(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            kind: TrackKind::Externals,
            title: title.into(),
            artist: artist.into(),
            album_id: None,
            album_artist: String::new(),
        }
    }
}

/// Read access to the player's state.
pub trait PlayerState {
    fn current_track(&self) -> Track;
}

/// Artwork lookups. Implementations usually cache decoded images.
pub trait ArtCache {
    /// Whatever the host draws: a surface, a texture, a path.
    type Artwork: Clone;

    fn album_artwork(&self, album_id: AlbumId, size: u32, scale: u32) -> Option<Self::Artwork>;

    fn radio_artwork(&self, name: &str, size: u32) -> Option<Self::Artwork>;
}

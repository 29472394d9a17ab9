use crate::{AlbumId, ItemBounds, TrackId};

/// A displayable list element owned by the host, e.g. an album cover tile or a playlist row.
///
/// Every method runs synchronously on the UI thread and takes `&self`: hosts are expected to
/// use interior mutability (widgets usually already do). Only [`Item::populate`] is required;
/// the update hooks default to no-ops.
pub trait Item {
    /// Expensive first render. The view calls this at most once per queued item.
    fn populate(&self);

    /// The item's rectangle relative to the scroll container.
    ///
    /// Return `None` when the item is not attached or not laid out yet; the view then treats
    /// it as visible.
    fn bounds(&self) -> Option<ItemBounds> {
        None
    }

    /// The album whose artwork this item displays, if any.
    fn album_id(&self) -> Option<AlbumId> {
        None
    }

    fn update_state(&self) {}

    fn update_playing_indicator(&self) {}

    fn update_duration(&self, _track_id: TrackId) {}

    fn update_cover(&self) {}

    fn show_overlay(&self, _shown: bool) {}

    /// The view is being torn down; stop any work the item runs on its own.
    fn stop(&self) {}
}

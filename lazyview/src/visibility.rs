use crate::ItemBounds;

/// Decides whether an item currently shows in its scroll container.
///
/// An item counts as visible when its top edge is below `-height` (so up to one item-height
/// above the fold is included) and above the container's bottom edge. There is no margin below
/// the fold.
///
/// `None` means the host could not translate the item's coordinates (not attached or not laid
/// out yet). Such items are reported visible so they never get stuck unpopulated.
pub fn is_visible(bounds: Option<ItemBounds>, viewport_height: f64) -> bool {
    let Some(b) = bounds else {
        ltrace!("is_visible: no bounds, failing open");
        return true;
    };
    (b.y > -b.height || b.y >= 0.0) && b.y < viewport_height
}

/// Size of the small artwork used before the toolbar learns its real height.
pub const SMALL_ART_SIZE: u32 = 33;

/// How long the title must be held down before the track menu opens.
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Configuration for [`crate::ToolbarPresenter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolbarOptions {
    pub long_press_ms: u64,
    /// Cover size until `on_realize` reports the allocated height.
    pub art_size: u32,
}

impl Default for ToolbarOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolbarOptions {
    pub fn new() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            art_size: SMALL_ART_SIZE,
        }
    }

    pub fn with_long_press_ms(mut self, long_press_ms: u64) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub fn with_art_size(mut self, art_size: u32) -> Self {
        self.art_size = art_size;
        self
    }
}

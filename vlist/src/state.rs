/// A lightweight, serializable snapshot of the viewport binding.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, so adapters
/// can persist and restore scroll position across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub scroll_offset: u64,
    pub viewport_height: u32,
    pub is_scrolling: bool,
}

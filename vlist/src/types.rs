/// Alignment for programmatic scroll-to-index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// Inclusive index range of rows to render.
///
/// The "nothing visible" sentinel is `Option<RowRange>` (`None` when the list is empty or
/// the viewport height is zero).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// A computed, ephemeral geometry record for one item at one point in time.
///
/// Rows are produced fresh on every recalculation and never mutated in place. `index` is
/// transient (it changes when the collection is reordered); `key` is the durable identity
/// that measurement caching is addressed by.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row<K> {
    pub key: K,
    pub index: usize,
    /// Height in pixels (measured, estimated, or fixed).
    pub height: u32,
    /// Offset from the list start, in pixels: the sum of all prior row heights.
    pub offset_top: u64,
}

impl<K> Row<K> {
    pub fn bottom(&self) -> u64 {
        self.offset_top.saturating_add(self.height as u64)
    }
}

/// Default key type for lists keyed by index.
pub type ItemKey = u64;

/// Bound for key types usable with the measurement cache.
#[cfg(feature = "std")]
pub trait RowKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> RowKey for K {}

#[cfg(not(feature = "std"))]
pub trait RowKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> RowKey for K {}

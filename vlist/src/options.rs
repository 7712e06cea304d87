use alloc::sync::Arc;

use crate::virtualizer::Virtualizer;
use crate::{ConfigError, ItemKey};

/// A per-index pixel-height function (fixed heights or estimates).
pub type HeightFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Maps an index to the item's stable key.
pub type KeyFn<K> = Arc<dyn Fn(usize) -> K + Send + Sync>;

/// A callback fired after every committed state change.
///
/// The second argument is `is_scrolling`. Observers should re-query the virtualizer
/// (ranges, rows, total height) rather than cache geometry; every query reads the latest
/// committed state.
pub type OnChangeCallback<K> = Arc<dyn Fn(&Virtualizer<K>, bool) + Send + Sync>;

/// Configuration for [`crate::Virtualizer`].
///
/// Cheap to clone: closures are stored in `Arc`s so adapters can tweak a few fields and
/// call `Virtualizer::set_options` without reallocating.
pub struct ListOptions<K = ItemKey> {
    /// Number of items in the collection. Finite and known.
    pub count: usize,

    /// Stable key for the item at `index`, pure within one collection identity.
    ///
    /// Measurements follow keys, not positions: reordering the collection keeps each
    /// item's measured height as long as the key mapping moves with the data.
    pub get_item_key: KeyFn<K>,

    /// Fixed per-index height. When present, measurement is bypassed entirely.
    pub item_height: Option<HeightFn>,

    /// Estimated height for items not yet measured. Required when `item_height` is absent.
    pub estimate_height: Option<HeightFn>,

    /// Extra rows rendered beyond the strictly visible range, each direction.
    pub overscan: usize,

    /// Debounce window, in milliseconds, after which `is_scrolling` resets when no further
    /// scroll event arrives.
    pub scrolling_reset_delay_ms: u64,

    /// Optional callback fired when the virtualizer's state changes.
    pub on_change: Option<OnChangeCallback<K>>,
}

impl ListOptions<ItemKey> {
    /// Options for an estimated-height list keyed by index (`ItemKey = u64`).
    ///
    /// `estimate_height(i)` is used for any item that has not been measured yet.
    pub fn new(count: usize, estimate_height: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            count,
            get_item_key: Arc::new(|i| i as u64),
            item_height: None,
            estimate_height: Some(Arc::new(estimate_height)),
            overscan: 3,
            scrolling_reset_delay_ms: 150,
            on_change: None,
        }
    }

    /// Options for a fixed-height list keyed by index. Measurement is bypassed.
    pub fn fixed(count: usize, item_height: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            count,
            get_item_key: Arc::new(|i| i as u64),
            item_height: Some(Arc::new(item_height)),
            estimate_height: None,
            overscan: 3,
            scrolling_reset_delay_ms: 150,
            on_change: None,
        }
    }
}

impl<K> ListOptions<K> {
    /// Options with a custom key mapping.
    ///
    /// Use this when you want measurements to follow items across reordering/replacement.
    pub fn new_with_key(
        count: usize,
        estimate_height: impl Fn(usize) -> u32 + Send + Sync + 'static,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            get_item_key: Arc::new(get_item_key),
            item_height: None,
            estimate_height: Some(Arc::new(estimate_height)),
            overscan: 3,
            scrolling_reset_delay_ms: 150,
            on_change: None,
        }
    }

    /// Rejects configurations that can never resolve a height.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_height.is_none() && self.estimate_height.is_none() {
            return Err(ConfigError::MissingHeightSource);
        }
        Ok(())
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(get_item_key);
        self
    }

    pub fn with_item_height(
        mut self,
        item_height: Option<impl Fn(usize) -> u32 + Send + Sync + 'static>,
    ) -> Self {
        self.item_height = item_height.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_estimate_height(
        mut self,
        estimate_height: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        self.estimate_height = Some(Arc::new(estimate_height));
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Virtualizer<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K> Clone for ListOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            get_item_key: Arc::clone(&self.get_item_key),
            item_height: self.item_height.clone(),
            estimate_height: self.estimate_height.clone(),
            overscan: self.overscan,
            scrolling_reset_delay_ms: self.scrolling_reset_delay_ms,
            on_change: self.on_change.clone(),
        }
    }
}

impl<K> core::fmt::Debug for ListOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("count", &self.count)
            .field("fixed_height", &self.item_height.is_some())
            .field("overscan", &self.overscan)
            .field("scrolling_reset_delay_ms", &self.scrolling_reset_delay_ms)
            .finish_non_exhaustive()
    }
}

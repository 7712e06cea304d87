use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::layout;
use crate::{
    Align, ConfigError, HeightCache, ItemKey, ListOptions, Row, RowKey, RowRange, ViewportState,
};

/// The virtualizer engine: viewport state, geometry cache, and the recompute pump.
///
/// This type is intentionally UI-agnostic. An adapter drives it by delivering scroll,
/// resize, timer, and measurement events; after every committed change the `on_change`
/// callback fires and observers re-query ranges, rows, and the total height. Geometry is
/// recomputed from the latest committed state on every query; rows are never cached, so
/// what a renderer reads is always consistent with the state that produced it.
///
/// All mutation happens on one event-processing sequence; there is no internal
/// concurrency and no locking.
#[derive(Clone, Debug)]
pub struct Virtualizer<K = ItemKey> {
    options: ListOptions<K>,
    cache: HeightCache<K>,

    scroll_offset: u64,
    viewport_height: u32,
    is_scrolling: bool,
    last_scroll_event_ms: Option<u64>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K: RowKey> Virtualizer<K> {
    /// Creates a new virtualizer.
    ///
    /// Fails fast when the options carry no height source at all; such a configuration
    /// can never resolve a row height.
    pub fn new(options: ListOptions<K>) -> Result<Self, ConfigError> {
        options.validate()?;
        vdebug!(
            count = options.count,
            overscan = options.overscan,
            fixed = options.item_height.is_some(),
            "Virtualizer::new"
        );
        Ok(Self {
            options,
            cache: HeightCache::new(),
            scroll_offset: 0,
            viewport_height: 0,
            is_scrolling: false,
            last_scroll_event_ms: None,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        })
    }

    pub fn options(&self) -> &ListOptions<K> {
        &self.options
    }

    /// Replaces the options wholesale. The measurement cache is kept: entries are
    /// addressed by key, so they stay valid as long as the collection identity does.
    pub fn set_options(&mut self, options: ListOptions<K>) -> Result<(), ConfigError> {
        options.validate()?;
        self.options = options;
        vtrace!(
            count = self.options.count,
            overscan = self.options.overscan,
            "Virtualizer::set_options"
        );
        self.notify();
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut ListOptions<K>),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Virtualizer<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame an adapter updates viewport height, scroll offset, and the
    /// scrolling flag together; without batching each setter would notify separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    /// Updates the item count within the same collection identity.
    ///
    /// Measurements are keyed by item identity and survive count changes.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.notify();
    }

    /// Replaces the collection wholesale (a new collection identity).
    ///
    /// Cached measurements belong to the old identity and are dropped so that unrelated
    /// items which happen to reuse a key cannot inherit stale heights.
    pub fn replace_items(&mut self, count: usize) {
        vdebug!(count, dropped = self.cache.len(), "replace_items");
        self.options.count = count;
        self.cache.clear();
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn set_get_item_key(&mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) {
        self.options.get_item_key = Arc::new(f);
        self.notify();
    }

    pub fn set_estimate_height(&mut self, f: impl Fn(usize) -> u32 + Send + Sync + 'static) {
        self.options.estimate_height = Some(Arc::new(f));
        self.notify();
    }

    pub fn set_scrolling_reset_delay_ms(&mut self, delay_ms: u64) {
        self.options.scrolling_reset_delay_ms = delay_ms;
        self.notify();
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_item_key)(index)
    }

    // ---- viewport state ------------------------------------------------------------

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if self.viewport_height == height {
            return;
        }
        self.viewport_height = height;
        self.notify();
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        self.scroll_offset = offset;
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies a scroll offset update from the UI layer (wheel/drag) and marks the
    /// virtualizer as scrolling.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        vtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|v| {
            v.set_scroll_offset(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_offset_event`, but clamps the offset.
    pub fn apply_scroll_offset_event_clamped(&mut self, offset: u64, now_ms: u64) {
        vtrace!(offset, now_ms, "apply_scroll_offset_event_clamped");
        self.batch_update(|v| {
            v.set_scroll_offset_clamped(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn set_viewport_and_scroll(&mut self, viewport_height: u32, scroll_offset: u64) {
        self.batch_update(|v| {
            v.set_viewport_height(viewport_height);
            v.set_scroll_offset(scroll_offset);
        });
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    /// Records a scroll event at `now_ms` and sets the scrolling flag.
    ///
    /// Each event re-arms the debounce window; the flag resets only once
    /// `update_scrolling` observes a quiet period of `scrolling_reset_delay_ms`.
    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Debounced deactivation of the scrolling flag. Adapters call this on their timer
    /// tick; the flag is advisory output only and never gates geometry.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    /// Captures the current viewport binding as a snapshot.
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport_height,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Restores a previously captured snapshot.
    ///
    /// When the snapshot was taken mid-scroll, the debounce timer is re-armed as if a
    /// scroll event happened at `now_ms`.
    pub fn restore_viewport_state(&mut self, state: ViewportState, now_ms: u64) {
        self.batch_update(|v| {
            v.set_viewport_height(state.viewport_height);
            v.set_scroll_offset(state.scroll_offset);
            if state.is_scrolling {
                v.notify_scroll_event(now_ms);
            } else {
                v.set_is_scrolling(false);
            }
        });
    }

    // ---- measurement ---------------------------------------------------------------

    /// Resolves the height for `index`: fixed function, else cached measurement by key,
    /// else estimate.
    pub fn height_of(&self, index: usize) -> u32 {
        if let Some(fixed) = &self.options.item_height {
            return fixed(index);
        }
        if let Some(measured) = self.cache.get(&self.key_for(index)) {
            return measured;
        }
        match &self.options.estimate_height {
            Some(estimate) => estimate(index),
            // `validate()` rejects options with no height source.
            None => 0,
        }
    }

    /// The cached measured height for the item at `index`, if any.
    ///
    /// Always `None` in fixed-height mode (nothing is ever cached there).
    pub fn measured_height(&self, index: usize) -> Option<u32> {
        if index >= self.options.count {
            return None;
        }
        self.cache.get(&self.key_for(index))
    }

    pub fn is_measured(&self, index: usize) -> bool {
        if self.options.item_height.is_some() {
            return true;
        }
        index < self.options.count && self.cache.contains(&self.key_for(index))
    }

    /// Commits a measured height without scroll compensation.
    ///
    /// Use this for initial measurements, where nothing above the viewport reflows.
    pub fn measure(&mut self, index: usize, height: u32) {
        if self.options.item_height.is_some() || index >= self.options.count {
            return;
        }
        vtrace!(index, height, "measure");
        self.cache.set(self.key_for(index), height);
        self.notify();
    }

    /// Commits a changed height, compensating the scroll position when the row lies
    /// above the current offset.
    ///
    /// Returns the compensation delta that was applied to `scroll_offset` (0 when the
    /// row is inside or below the viewport, or when the height did not change). The
    /// offset is adjusted *before* the cache commit, so the recomputation triggered by
    /// the commit already sees the compensated position.
    pub fn resize_item(&mut self, index: usize, height: u32) -> i64 {
        if self.options.item_height.is_some() || index >= self.options.count {
            return 0;
        }
        let prev = self.height_of(index);
        let delta = height as i64 - prev as i64;
        if delta == 0 {
            self.cache.set(self.key_for(index), height);
            self.notify();
            return 0;
        }
        vtrace!(index, height, delta, "resize_item");

        let offset_top = self.row_start_inner(index);
        let adjusted = offset_top < self.scroll_offset;
        if adjusted {
            self.scroll_offset = if delta > 0 {
                self.scroll_offset.saturating_add(delta as u64)
            } else {
                self.scroll_offset.saturating_sub(delta.unsigned_abs())
            };
        }

        self.cache.set(self.key_for(index), height);
        self.notify();
        if adjusted { delta } else { 0 }
    }

    pub fn reset_measurements(&mut self) {
        self.cache.clear();
        self.notify();
    }

    /// Number of cached measured heights (key → px).
    pub fn measurement_cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Exports the cached measurements (useful for persistence).
    pub fn export_measurement_cache(&self) -> Vec<(K, u32)>
    where
        K: Clone,
    {
        self.cache.iter().map(|(k, h)| (k.clone(), h)).collect()
    }

    /// Replaces the cached measurements from an iterator (useful when restoring state).
    pub fn import_measurement_cache(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.cache.clear();
        let mut n = 0usize;
        for (k, h) in entries {
            self.cache.set(k, h);
            n = n.saturating_add(1);
        }
        vdebug!(entries = n, "import_measurement_cache");
        self.notify();
    }

    // ---- geometry queries ----------------------------------------------------------

    /// Total scrollable height in pixels (0 for an empty collection).
    pub fn total_height(&self) -> u64 {
        layout::offset_of(self.options.count, |i| self.height_of(i))
    }

    /// The strictly visible range (no overscan), or `None` when the collection is empty
    /// or the viewport height is zero.
    pub fn visible_range(&self) -> Option<RowRange> {
        self.scan().visible
    }

    /// The visible range widened by `overscan`, clamped to the collection.
    pub fn virtual_range(&self) -> Option<RowRange> {
        self.virtual_range_for(self.scroll_offset, self.viewport_height)
    }

    pub fn visible_range_for(&self, scroll_offset: u64, viewport_height: u32) -> Option<RowRange> {
        self.scan_for(scroll_offset, viewport_height).visible
    }

    pub fn virtual_range_for(&self, scroll_offset: u64, viewport_height: u32) -> Option<RowRange> {
        self.scan_for(scroll_offset, viewport_height)
            .visible
            .map(|r| layout::widen(r, self.options.count, self.options.overscan))
    }

    /// Visits the rows of the overscanned range in index order, without allocating.
    ///
    /// Rows are computed fresh from the current state on every call.
    pub fn for_each_row(&self, f: impl FnMut(Row<K>)) {
        self.for_each_row_for(self.scroll_offset, self.viewport_height, f);
    }

    pub fn for_each_row_for(
        &self,
        scroll_offset: u64,
        viewport_height: u32,
        mut f: impl FnMut(Row<K>),
    ) {
        let Some(range) = self.virtual_range_for(scroll_offset, viewport_height) else {
            return;
        };
        let mut offset_top = self.row_start_inner(range.start_index);
        for index in range.start_index..=range.end_index {
            let height = self.height_of(index);
            f(Row {
                key: self.key_for(index),
                index,
                height,
                offset_top,
            });
            offset_top = offset_top.saturating_add(height as u64);
        }
    }

    /// Collects the overscanned rows into `out` (clears `out` first).
    ///
    /// Convenience wrapper around [`Self::for_each_row`]; adapters that care about
    /// allocations should reuse a scratch buffer.
    pub fn collect_rows(&self, out: &mut Vec<Row<K>>) {
        self.collect_rows_for(self.scroll_offset, self.viewport_height, out);
    }

    pub fn collect_rows_for(
        &self,
        scroll_offset: u64,
        viewport_height: u32,
        out: &mut Vec<Row<K>>,
    ) {
        out.clear();
        self.for_each_row_for(scroll_offset, viewport_height, |row| out.push(row));
    }

    /// The geometry record for one row, or `None` when `index` is out of bounds.
    pub fn row(&self, index: usize) -> Option<Row<K>> {
        (index < self.options.count).then(|| Row {
            key: self.key_for(index),
            index,
            height: self.height_of(index),
            offset_top: self.row_start_inner(index),
        })
    }

    pub fn row_start(&self, index: usize) -> Option<u64> {
        (index < self.options.count).then(|| self.row_start_inner(index))
    }

    pub fn row_height(&self, index: usize) -> Option<u32> {
        (index < self.options.count).then(|| self.height_of(index))
    }

    pub fn row_bottom(&self, index: usize) -> Option<u64> {
        let start = self.row_start(index)?;
        Some(start.saturating_add(self.height_of(index) as u64))
    }

    /// The index of the row containing `offset`, or `None` when the collection is empty
    /// or the offset lies past the total height.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.options.count == 0 {
            return None;
        }
        let mut top = 0u64;
        for i in 0..self.options.count {
            let bottom = top.saturating_add(self.height_of(i) as u64);
            if bottom > offset {
                return Some(i);
            }
            top = bottom;
        }
        None
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_height()
            .saturating_sub(self.viewport_height as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    // ---- programmatic scrolling ----------------------------------------------------

    /// Scrolls to an index (no animation) and returns the applied, clamped offset.
    ///
    /// This does not mark the virtualizer as "scrolling"; wrap the returned offset in
    /// `apply_scroll_offset_event_clamped` for user-scroll semantics.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        if self.options.count == 0 {
            return 0;
        }
        let index = index.min(self.options.count - 1);
        let top = self.row_start_inner(index);
        let height = self.height_of(index) as u64;
        let bottom = top.saturating_add(height);
        let view = self.viewport_height as u64;

        let target = match align {
            Align::Start => top,
            Align::End => bottom.saturating_sub(view),
            Align::Center => top
                .saturating_add(height / 2)
                .saturating_sub(view / 2),
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if top >= cur && bottom <= cur_end {
                    cur
                } else if top < cur {
                    top
                } else {
                    bottom.saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    // ---- internals -----------------------------------------------------------------

    fn scan(&self) -> layout::Scan {
        self.scan_for(self.scroll_offset, self.viewport_height)
    }

    fn scan_for(&self, scroll_offset: u64, viewport_height: u32) -> layout::Scan {
        layout::scan(self.options.count, scroll_offset, viewport_height, |i| {
            self.height_of(i)
        })
    }

    fn row_start_inner(&self, index: usize) -> u64 {
        layout::offset_of(index, |i| self.height_of(i))
    }
}

use vlist::{ConfigError, ListOptions, RowKey, Virtualizer};

/// Handle to the scrollable container element, supplied by the UI layer.
///
/// Reads must reflect the live container (the bridge reads through this handle on every
/// event); `scroll_by` must move the real scroll position, since it is how measurement
/// compensation keeps content visually stable.
pub trait Viewport {
    fn scroll_offset(&self) -> u64;
    fn height(&self) -> u32;
    fn scroll_by(&mut self, delta: i64);
}

/// Binds a [`Virtualizer`] to a scrollable viewport.
///
/// The UI layer drives it by calling:
/// - `bind` / `unbind` when the viewport element appears, changes, or goes away
/// - `on_scroll` / `on_resize` when the container reports those events
/// - `tick(now_ms)` on its timer, for the debounced `is_scrolling` reset
///
/// After `unbind`, every event entry point is a no-op: no observation survives the
/// binding.
#[derive(Clone, Debug)]
pub struct ViewportBridge<K, V> {
    v: Virtualizer<K>,
    viewport: Option<V>,
}

impl<K: RowKey, V: Viewport> ViewportBridge<K, V> {
    pub fn new(options: ListOptions<K>) -> Result<Self, ConfigError> {
        Ok(Self {
            v: Virtualizer::new(options)?,
            viewport: None,
        })
    }

    pub fn from_virtualizer(v: Virtualizer<K>) -> Self {
        Self { v, viewport: None }
    }

    pub fn virtualizer(&self) -> &Virtualizer<K> {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer<K> {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> Virtualizer<K> {
        self.v
    }

    pub fn is_bound(&self) -> bool {
        self.viewport.is_some()
    }

    /// Binds a viewport, reading its height and scroll offset synchronously so the first
    /// recomputation reflects the actual position rather than zero.
    ///
    /// Re-binding replaces the previous viewport; the old handle is returned.
    pub fn bind(&mut self, viewport: V) -> Option<V> {
        let height = viewport.height();
        let offset = viewport.scroll_offset();
        vtrace!(height, offset, "ViewportBridge::bind");
        let previous = self.viewport.replace(viewport);
        self.v.set_viewport_and_scroll(height, offset);
        previous
    }

    /// Releases the viewport binding.
    ///
    /// The pending scrolling-debounce state is cleared synchronously; events delivered
    /// after this call are ignored.
    pub fn unbind(&mut self) -> Option<V> {
        vtrace!("ViewportBridge::unbind");
        self.v.set_is_scrolling(false);
        self.viewport.take()
    }

    /// Delivers a scroll event: reads the live offset and marks the engine as scrolling.
    pub fn on_scroll(&mut self, now_ms: u64) {
        let Some(viewport) = &self.viewport else {
            return;
        };
        let offset = viewport.scroll_offset();
        self.v.apply_scroll_offset_event(offset, now_ms);
    }

    /// Delivers a viewport box-size change: reads the live height.
    pub fn on_resize(&mut self) {
        let Some(viewport) = &self.viewport else {
            return;
        };
        let height = viewport.height();
        self.v.set_viewport_height(height);
    }

    /// Advances the debounce clock; resets `is_scrolling` after a quiet period.
    pub fn tick(&mut self, now_ms: u64) {
        if self.viewport.is_none() {
            return;
        }
        self.v.update_scrolling(now_ms);
    }

    /// Commits a measured height, mirroring any scroll compensation onto the live
    /// viewport.
    ///
    /// The engine adjusts its internal offset before the cache commit; the same delta is
    /// then applied to the real container, all within this synchronous call, so a
    /// renderer re-querying afterwards never observes the uncompensated state.
    pub fn apply_measurement(&mut self, index: usize, height: u32) -> i64 {
        let delta = self.v.resize_item(index, height);
        if delta != 0 {
            if let Some(viewport) = &mut self.viewport {
                viewport.scroll_by(delta);
            }
        }
        delta
    }
}

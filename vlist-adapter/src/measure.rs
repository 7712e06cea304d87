#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use vlist::RowKey;

use crate::{MeasureError, Viewport, ViewportBridge};

#[cfg(feature = "std")]
type ObservedMap = HashMap<u64, usize>;
#[cfg(not(feature = "std"))]
type ObservedMap = BTreeMap<u64, usize>;

/// A live rendered row element, as seen by the measurement coordinator.
///
/// The renderer tags each row's root element with its current index; `element_id` must be
/// stable for the lifetime of the element so observation bookkeeping stays idempotent.
pub trait RowElement {
    /// Stable identity of this element (not the item key).
    fn element_id(&self) -> u64;
    /// Whether the element is still attached to the viewport's document.
    fn is_attached(&self) -> bool;
    /// The externally-tagged index attribute, verbatim.
    fn index_attribute(&self) -> Option<&str>;
    /// Direct geometry query: the element's current rendered height in pixels.
    fn measured_height(&self) -> u32;
}

/// Reconciles rendered element sizes against the geometry cache.
///
/// The renderer calls [`register`](Self::register) once per rendered row element (and
/// again with `None` on unmount); a resize-observation layer forwards box-size changes
/// through [`element_resized`](Self::element_resized). Committed heights go through
/// [`ViewportBridge::apply_measurement`], which compensates the scroll position when a
/// row above the viewport changes size.
///
/// Per-row lifecycle is implicit: unmeasured → measured on first registration → updated
/// on any subsequent resize with a differing height. A row never regresses to unmeasured
/// while its key stays cached.
#[derive(Clone, Debug, Default)]
pub struct MeasurementCoordinator {
    observed: ObservedMap,
}

impl MeasurementCoordinator {
    pub fn new() -> Self {
        Self {
            observed: ObservedMap::new(),
        }
    }

    /// Number of elements currently under observation.
    pub fn observed_len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_observing(&self, element_id: u64) -> bool {
        self.observed.contains_key(&element_id)
    }

    /// Stops observing everything. Call when the viewport binding is torn down.
    pub fn unbind(&mut self) {
        self.observed.clear();
    }

    /// Registers a rendered row element (or its unmount, with `None`).
    ///
    /// - `None` is the no-op unregister path for already-detached elements.
    /// - A detached element is dropped from observation and is not an error.
    /// - A missing, unparsable, or out-of-range index attribute is a renderer contract
    ///   violation: reported and ignored, no cache mutation.
    /// - An initial registration whose key is already cached is skipped, so redundant
    ///   registration calls for unchanged elements cost nothing.
    ///
    /// `None` carries no element identity, so it cannot prune the observation map. An
    /// element that unmounts without re-registering as detached stays observed until
    /// [`unbind`](Self::unbind); the map is bounded by the number of distinct elements the
    /// renderer ever attaches under one binding.
    pub fn register<K: RowKey, V: Viewport, E: RowElement>(
        &mut self,
        bridge: &mut ViewportBridge<K, V>,
        element: Option<&E>,
    ) -> Result<(), MeasureError> {
        let Some(element) = element else {
            return Ok(());
        };
        if !element.is_attached() {
            self.observed.remove(&element.element_id());
            return Ok(());
        }
        if bridge.virtualizer().options().item_height.is_some() {
            // Fixed-height mode: nothing to measure.
            return Ok(());
        }

        let index = parse_index(element, bridge.virtualizer().count())?;
        let first_observation = self
            .observed
            .insert(element.element_id(), index)
            .is_none();

        if first_observation && bridge.virtualizer().is_measured(index) {
            return Ok(());
        }

        self.commit(bridge, index, element.measured_height());
        Ok(())
    }

    /// Forwards a box-size change reported for an already-rendered element.
    ///
    /// `box_height` is the height from the resize observation entry; the element is not
    /// re-queried for geometry.
    pub fn element_resized<K: RowKey, V: Viewport, E: RowElement>(
        &mut self,
        bridge: &mut ViewportBridge<K, V>,
        element: &E,
        box_height: u32,
    ) -> Result<(), MeasureError> {
        if !element.is_attached() {
            self.observed.remove(&element.element_id());
            return Ok(());
        }
        if bridge.virtualizer().options().item_height.is_some() {
            return Ok(());
        }

        let index = parse_index(element, bridge.virtualizer().count())?;
        self.observed.insert(element.element_id(), index);
        self.commit(bridge, index, box_height);
        Ok(())
    }

    fn commit<K: RowKey, V: Viewport>(
        &mut self,
        bridge: &mut ViewportBridge<K, V>,
        index: usize,
        height: u32,
    ) {
        // Equal to the cached value: skip, avoiding a redundant re-render trigger.
        if bridge.virtualizer().measured_height(index) == Some(height) {
            return;
        }
        vtrace!(index, height, "commit measurement");
        bridge.apply_measurement(index, height);
    }
}

fn parse_index<E: RowElement>(element: &E, count: usize) -> Result<usize, MeasureError> {
    let Some(attr) = element.index_attribute() else {
        vwarn!(
            element_id = element.element_id(),
            "row element is missing its index attribute"
        );
        return Err(MeasureError::MissingIndex);
    };
    let Ok(index) = attr.parse::<usize>() else {
        vwarn!(
            element_id = element.element_id(),
            attr, "row element index attribute is not an integer"
        );
        return Err(MeasureError::InvalidIndex(attr.into()));
    };
    if index >= count {
        vwarn!(index, count, "row element index attribute is out of bounds");
        return Err(MeasureError::OutOfBounds { index, count });
    }
    Ok(index)
}

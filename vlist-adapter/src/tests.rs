use crate::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use vlist::{ItemKey, ListOptions};

#[derive(Clone, Debug, Default)]
struct FakeViewportState {
    offset: u64,
    height: u32,
    scroll_by_calls: Vec<i64>,
}

/// A scroll container driven by hand in tests. Shared via `Rc` so the test can play the
/// role of the UI layer while the bridge owns a handle.
#[derive(Clone, Debug, Default)]
struct FakeViewport(Rc<RefCell<FakeViewportState>>);

impl FakeViewport {
    fn new(height: u32, offset: u64) -> Self {
        Self(Rc::new(RefCell::new(FakeViewportState {
            offset,
            height,
            scroll_by_calls: Vec::new(),
        })))
    }

    fn set_offset(&self, offset: u64) {
        self.0.borrow_mut().offset = offset;
    }

    fn set_height(&self, height: u32) {
        self.0.borrow_mut().height = height;
    }

    fn scroll_by_calls(&self) -> Vec<i64> {
        self.0.borrow().scroll_by_calls.clone()
    }
}

impl Viewport for FakeViewport {
    fn scroll_offset(&self) -> u64 {
        self.0.borrow().offset
    }

    fn height(&self) -> u32 {
        self.0.borrow().height
    }

    fn scroll_by(&mut self, delta: i64) {
        let mut state = self.0.borrow_mut();
        state.offset = if delta >= 0 {
            state.offset.saturating_add(delta as u64)
        } else {
            state.offset.saturating_sub(delta.unsigned_abs())
        };
        state.scroll_by_calls.push(delta);
    }
}

#[derive(Clone, Debug)]
struct FakeElement {
    id: u64,
    attached: bool,
    index_attr: Option<String>,
    height: u32,
}

impl FakeElement {
    fn new(id: u64, index: usize, height: u32) -> Self {
        Self {
            id,
            attached: true,
            index_attr: Some(index.to_string()),
            height,
        }
    }
}

impl RowElement for FakeElement {
    fn element_id(&self) -> u64 {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn index_attribute(&self) -> Option<&str> {
        self.index_attr.as_deref()
    }

    fn measured_height(&self) -> u32 {
        self.height
    }
}

fn bridge_with(
    count: usize,
    estimate: u32,
    viewport: &FakeViewport,
) -> ViewportBridge<ItemKey, FakeViewport> {
    let mut bridge = ViewportBridge::new(ListOptions::new(count, move |_| estimate)).unwrap();
    bridge.bind(viewport.clone());
    bridge
}

#[test]
fn bind_reads_the_viewport_synchronously() {
    let viewport = FakeViewport::new(600, 4_000);
    let bridge = bridge_with(1_000, 16, &viewport);

    // First render reflects the actual position, not zero.
    assert_eq!(bridge.virtualizer().scroll_offset(), 4_000);
    assert_eq!(bridge.virtualizer().viewport_height(), 600);
    assert!(!bridge.virtualizer().is_scrolling());
}

#[test]
fn scroll_and_resize_events_read_the_live_container() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(1_000, 16, &viewport);

    viewport.set_offset(800);
    bridge.on_scroll(1_000);
    assert_eq!(bridge.virtualizer().scroll_offset(), 800);
    assert!(bridge.virtualizer().is_scrolling());

    viewport.set_height(300);
    bridge.on_resize();
    assert_eq!(bridge.virtualizer().viewport_height(), 300);

    // Debounce: quiet for the full delay resets the flag.
    bridge.tick(1_149);
    assert!(bridge.virtualizer().is_scrolling());
    bridge.tick(1_150);
    assert!(!bridge.virtualizer().is_scrolling());
}

#[test]
fn unbind_silences_all_later_events() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(1_000, 16, &viewport);

    viewport.set_offset(500);
    bridge.on_scroll(1_000);
    assert!(bridge.virtualizer().is_scrolling());

    let released = bridge.unbind();
    assert!(released.is_some());
    assert!(!bridge.is_bound());
    // Pending debounce state is cleared synchronously.
    assert!(!bridge.virtualizer().is_scrolling());

    viewport.set_offset(900);
    bridge.on_scroll(2_000);
    bridge.on_resize();
    bridge.tick(3_000);
    assert_eq!(bridge.virtualizer().scroll_offset(), 500);
    assert!(!bridge.virtualizer().is_scrolling());
}

#[test]
fn rebinding_replaces_the_previous_viewport() {
    let first = FakeViewport::new(600, 100);
    let mut bridge = bridge_with(1_000, 16, &first);

    let second = FakeViewport::new(250, 700);
    let old = bridge.bind(second);
    assert!(old.is_some());
    assert_eq!(bridge.virtualizer().viewport_height(), 250);
    assert_eq!(bridge.virtualizer().scroll_offset(), 700);
}

#[test]
fn register_none_is_a_noop() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let result = coordinator.register(&mut bridge, None::<&FakeElement>);
    assert_eq!(result, Ok(()));
    assert_eq!(coordinator.observed_len(), 0);
    assert_eq!(bridge.virtualizer().measurement_cache_len(), 0);
}

#[test]
fn unregister_without_identity_keeps_the_observation_entry() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let element = FakeElement::new(9, 4, 40);
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    assert!(coordinator.is_observing(9));

    // `None` carries no identity, so the entry survives an anonymous unregister.
    coordinator
        .register(&mut bridge, None::<&FakeElement>)
        .unwrap();
    assert!(coordinator.is_observing(9));

    coordinator.unbind();
    assert!(!coordinator.is_observing(9));
}

#[test]
fn detached_element_is_dropped_from_observation_without_error() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let mut element = FakeElement::new(7, 3, 40);
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    assert!(coordinator.is_observing(7));

    element.attached = false;
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    assert!(!coordinator.is_observing(7));
    // The measurement it produced while attached stays cached.
    assert_eq!(bridge.virtualizer().measured_height(3), Some(40));
}

#[test]
fn invalid_index_attribute_is_rejected_without_cache_mutation() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let mut element = FakeElement::new(1, 0, 40);
    element.index_attr = None;
    assert_eq!(
        coordinator.register(&mut bridge, Some(&element)),
        Err(MeasureError::MissingIndex)
    );

    element.index_attr = Some("not-a-number".to_string());
    assert_eq!(
        coordinator.register(&mut bridge, Some(&element)),
        Err(MeasureError::InvalidIndex("not-a-number".to_string()))
    );

    element.index_attr = Some("100".to_string());
    assert_eq!(
        coordinator.register(&mut bridge, Some(&element)),
        Err(MeasureError::OutOfBounds {
            index: 100,
            count: 100
        })
    );

    assert_eq!(coordinator.observed_len(), 0);
    assert_eq!(bridge.virtualizer().measurement_cache_len(), 0);
    assert!(viewport.scroll_by_calls().is_empty());
}

#[test]
fn initial_registration_commits_the_rendered_height() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let element = FakeElement::new(1, 5, 48);
    coordinator.register(&mut bridge, Some(&element)).unwrap();

    assert!(coordinator.is_observing(1));
    assert_eq!(bridge.virtualizer().measured_height(5), Some(48));
    // Scrolled to the top: nothing above to compensate for.
    assert!(viewport.scroll_by_calls().is_empty());
}

#[test]
fn re_registration_with_cached_key_is_idempotent() {
    let viewport = FakeViewport::new(100, 500);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let element = FakeElement::new(1, 5, 48);
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    let compensations = viewport.scroll_by_calls().len();
    let cached = bridge.virtualizer().measured_height(5);

    // Same element, unchanged size: no cache mutation, no scroll adjustment.
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    assert_eq!(bridge.virtualizer().measured_height(5), cached);
    assert_eq!(viewport.scroll_by_calls().len(), compensations);

    // A fresh element for the same, already-measured row is likewise skipped.
    let remount = FakeElement::new(2, 5, 999);
    coordinator.register(&mut bridge, Some(&remount)).unwrap();
    assert_eq!(bridge.virtualizer().measured_height(5), Some(48));
}

#[test]
fn resize_above_the_viewport_compensates_the_container_exactly_once() {
    let viewport = FakeViewport::new(100, 500);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    // Row 5 sits well above offset 500 (estimated top = 80).
    let element = FakeElement::new(1, 5, 16);
    coordinator.register(&mut bridge, Some(&element)).unwrap();

    coordinator.element_resized(&mut bridge, &element, 48).unwrap();
    assert_eq!(viewport.scroll_by_calls(), std::vec![32]);
    assert_eq!(bridge.virtualizer().scroll_offset(), 532);
    assert_eq!(viewport.scroll_offset(), 532);

    // The same notification again changes nothing.
    coordinator.element_resized(&mut bridge, &element, 48).unwrap();
    assert_eq!(viewport.scroll_by_calls(), std::vec![32]);
    assert_eq!(bridge.virtualizer().scroll_offset(), 532);
}

#[test]
fn resize_below_the_viewport_does_not_touch_the_container() {
    let viewport = FakeViewport::new(100, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    let element = FakeElement::new(1, 50, 16);
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    coordinator.element_resized(&mut bridge, &element, 64).unwrap();

    assert_eq!(bridge.virtualizer().measured_height(50), Some(64));
    assert!(viewport.scroll_by_calls().is_empty());
    assert_eq!(viewport.scroll_offset(), 0);
}

#[test]
fn fixed_height_mode_bypasses_the_measurement_pipeline() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge: ViewportBridge<ItemKey, FakeViewport> =
        ViewportBridge::new(ListOptions::fixed(100, |_| 20)).unwrap();
    bridge.bind(viewport.clone());
    let mut coordinator = MeasurementCoordinator::new();

    let element = FakeElement::new(1, 5, 48);
    coordinator.register(&mut bridge, Some(&element)).unwrap();
    coordinator.element_resized(&mut bridge, &element, 48).unwrap();

    assert_eq!(coordinator.observed_len(), 0);
    assert_eq!(bridge.virtualizer().measurement_cache_len(), 0);
    assert_eq!(bridge.virtualizer().row_height(5), Some(20));
}

#[test]
fn coordinator_unbind_clears_observation() {
    let viewport = FakeViewport::new(600, 0);
    let mut bridge = bridge_with(100, 16, &viewport);
    let mut coordinator = MeasurementCoordinator::new();

    for i in 0..10u64 {
        let element = FakeElement::new(i, i as usize, 20 + i as u32);
        coordinator.register(&mut bridge, Some(&element)).unwrap();
    }
    assert_eq!(coordinator.observed_len(), 10);

    coordinator.unbind();
    assert_eq!(coordinator.observed_len(), 0);
}

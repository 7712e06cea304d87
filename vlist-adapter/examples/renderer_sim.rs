// Example: a simulated renderer loop driving the bridge and the measurement coordinator.
use std::cell::RefCell;
use std::rc::Rc;

use vlist::ListOptions;
use vlist_adapter::{MeasurementCoordinator, RowElement, Viewport, ViewportBridge};

#[derive(Clone, Default)]
struct SimViewport(Rc<RefCell<(u64, u32)>>); // (offset, height)

impl Viewport for SimViewport {
    fn scroll_offset(&self) -> u64 {
        self.0.borrow().0
    }
    fn height(&self) -> u32 {
        self.0.borrow().1
    }
    fn scroll_by(&mut self, delta: i64) {
        let mut state = self.0.borrow_mut();
        state.0 = state.0.saturating_add_signed(delta);
    }
}

struct SimElement {
    id: u64,
    index_attr: String,
    height: u32,
}

impl RowElement for SimElement {
    fn element_id(&self) -> u64 {
        self.id
    }
    fn is_attached(&self) -> bool {
        true
    }
    fn index_attribute(&self) -> Option<&str> {
        Some(&self.index_attr)
    }
    fn measured_height(&self) -> u32 {
        self.height
    }
}

fn main() -> Result<(), vlist::ConfigError> {
    let viewport = SimViewport(Rc::new(RefCell::new((1_000, 300))));
    let mut bridge: ViewportBridge<u64, SimViewport> =
        ViewportBridge::new(ListOptions::new(10_000, |_| 20))?;
    bridge.bind(viewport.clone());
    let mut coordinator = MeasurementCoordinator::new();

    // Frame 1: render the virtual range and register each mounted row.
    let mut rows = Vec::new();
    bridge.virtualizer().collect_rows(&mut rows);
    println!("frame 1: rendering rows {}..={}", rows[0].index, rows[rows.len() - 1].index);
    for row in &rows {
        let element = SimElement {
            id: row.index as u64,
            index_attr: row.index.to_string(),
            height: 20 + (row.index % 3) as u32 * 8, // real sizes differ from the estimate
        };
        // Indexes come straight from the rendered rows, so registration cannot fail.
        coordinator.register(&mut bridge, Some(&element)).unwrap();
    }
    println!("frame 1: offset after measurement {}", viewport.scroll_offset());

    // The user scrolls; the bridge reads the live container.
    viewport.0.borrow_mut().0 = 2_500;
    bridge.on_scroll(16);
    println!("frame 2: is_scrolling={}", bridge.virtualizer().is_scrolling());

    // The debounce timer fires after a quiet period.
    bridge.tick(16 + 150);
    println!("frame 3: is_scrolling={}", bridge.virtualizer().is_scrolling());

    println!("total_height={}", bridge.virtualizer().total_height());
    Ok(())
}

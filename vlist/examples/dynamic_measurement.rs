// Example: estimated heights refined by measurements, with scroll compensation.
use vlist::{ListOptions, Virtualizer};

fn main() -> Result<(), vlist::ConfigError> {
    let mut v = Virtualizer::new(ListOptions::new(100, |_| 20))?;
    v.set_viewport_and_scroll(200, 400);

    println!("estimated total={}", v.total_height());

    // Rows 0 and 1 render taller than estimated; both sit above the viewport, so the
    // scroll offset shifts by the delta and the content on screen stays put.
    let applied = v.resize_item(0, 60);
    println!("row 0 measured 60: compensated by {applied}, offset={}", v.scroll_offset());

    let applied = v.resize_item(1, 35);
    println!("row 1 measured 35: compensated by {applied}, offset={}", v.scroll_offset());

    // A row inside the viewport does not move the scroll position.
    let applied = v.resize_item(25, 50);
    println!("row 25 measured 50: compensated by {applied}, offset={}", v.scroll_offset());

    println!("measured total={}", v.total_height());
    Ok(())
}

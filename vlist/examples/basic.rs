// Example: minimal usage with fixed-height rows and scroll-to.
use vlist::{Align, ListOptions, Virtualizer};

fn main() -> Result<(), vlist::ConfigError> {
    let mut v = Virtualizer::new(ListOptions::fixed(1_000_000, |_| 24))?;
    v.set_viewport_and_scroll(600, 123_456);

    let mut rows = Vec::new();
    v.collect_rows(&mut rows);
    println!("total_height={}", v.total_height());
    println!("virtual_range={:?}", v.virtual_range());
    println!("first_rendered={:?}", rows.first());

    let off = v.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={off}");
    Ok(())
}

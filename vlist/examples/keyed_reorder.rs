// Example: measurements follow item identity, not position.
use std::sync::Arc;

use vlist::{ListOptions, Virtualizer};

fn main() -> Result<(), vlist::ConfigError> {
    let ids: Arc<Vec<u64>> = Arc::new((0..5).map(|i| 1_000 + i).collect());

    let mut v = Virtualizer::new(ListOptions::new_with_key(ids.len(), |_| 20, {
        let ids = Arc::clone(&ids);
        move |i| ids[i]
    }))?;

    v.measure(0, 64); // item 1000
    println!("heights before reorder: {:?}", heights(&v));

    // Reverse the collection; item 1000 is now last but keeps its measured height.
    let reversed: Arc<Vec<u64>> = Arc::new(ids.iter().rev().copied().collect());
    v.set_get_item_key(move |i| reversed[i]);
    println!("heights after reorder:  {:?}", heights(&v));
    Ok(())
}

fn heights(v: &Virtualizer<u64>) -> Vec<u32> {
    (0..v.count()).filter_map(|i| v.row_height(i)).collect()
}

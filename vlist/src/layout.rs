use core::cmp;

use crate::RowRange;

/// Result of one geometry pass over the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Scan {
    /// Sum of all row heights.
    pub total_height: u64,
    /// Visible range (no overscan), or `None` when nothing can be visible.
    pub visible: Option<RowRange>,
}

/// Computes total height and the visible boundary pair in a single prefix-sum pass.
///
/// Boundary rule:
/// - `start` is the smallest `i` whose bottom edge lies below the scroll offset
///   (`offset_top(i) + height(i) > scroll_offset`);
/// - `end` is the smallest `i` whose bottom edge reaches the viewport end
///   (`offset_top(i) + height(i) >= scroll_offset + viewport_height`).
///
/// Either boundary defaults to the last index when the viewport extends past the total
/// content. The scan is O(count) by design: recomputation is triggered by scroll, resize,
/// and measurement events, not per frame.
pub(crate) fn scan(
    count: usize,
    scroll_offset: u64,
    viewport_height: u32,
    mut height_of: impl FnMut(usize) -> u32,
) -> Scan {
    if count == 0 {
        return Scan {
            total_height: 0,
            visible: None,
        };
    }

    let scroll_end = scroll_offset.saturating_add(viewport_height as u64);
    let mut start = None;
    let mut end = None;
    let mut offset = 0u64;

    for i in 0..count {
        let bottom = offset.saturating_add(height_of(i) as u64);
        if start.is_none() && bottom > scroll_offset {
            start = Some(i);
        }
        if end.is_none() && bottom >= scroll_end {
            end = Some(i);
        }
        offset = bottom;
    }

    // The total is still wanted when nothing is visible (e.g. to size a spacer while the
    // viewport is collapsed).
    if viewport_height == 0 {
        return Scan {
            total_height: offset,
            visible: None,
        };
    }

    let last = count - 1;
    Scan {
        total_height: offset,
        visible: Some(RowRange {
            start_index: start.unwrap_or(last),
            end_index: end.unwrap_or(last),
        }),
    }
}

/// Widens a visible range by `overscan` rows in each direction, clamped to the collection.
pub(crate) fn widen(range: RowRange, count: usize, overscan: usize) -> RowRange {
    RowRange {
        start_index: range.start_index.saturating_sub(overscan),
        end_index: cmp::min(
            count.saturating_sub(1),
            range.end_index.saturating_add(overscan),
        ),
    }
}

/// Prefix sum of all row heights before `index`.
pub(crate) fn offset_of(index: usize, mut height_of: impl FnMut(usize) -> u32) -> u64 {
    let mut offset = 0u64;
    for i in 0..index {
        offset = offset.saturating_add(height_of(i) as u64);
    }
    offset
}

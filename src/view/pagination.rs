//! Page slicing and the virtual-list window

use std::ops::Range;

/// Number of pages for `total` rows, never less than one
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Clamp a 1-based page into `1..=page_count`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

/// Rows of the requested page. The full range when pagination is off or
/// everything fits on one page.
pub fn page_window(total: usize, enabled: bool, page: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    if !enabled || total <= page_size {
        return 0..total;
    }

    let page = clamp_page(page, total, page_size);
    let start = (page - 1) * page_size;
    start..(start + page_size).min(total)
}

/// Under virtualization the whole sequence is handed to the virtual list
pub fn virtual_window(total: usize) -> Range<usize> {
    0..total
}

/// The window the table renders; virtualization wins over page slicing
pub fn select_window(total: usize, virtualized: bool, enabled: bool, page: usize, page_size: usize) -> Range<usize> {
    if virtualized {
        virtual_window(total)
    } else {
        page_window(total, enabled, page, page_size)
    }
}

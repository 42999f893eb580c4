//! The data-shaping pipeline: filter, sort, then window

pub mod filter;
pub mod pagination;
pub mod sort;


pub use filter::{filter_records, has_active_filter, Filters};
pub use pagination::{clamp_page, page_count, page_window, select_window, virtual_window};
pub use sort::{sort_records, sorted_indices, Sorter};

use crate::column::ColumnLayout;
use crate::record::Record;

/// Filter the tree then sort its top level. Pure: same inputs, same output.
pub fn process(records: &[Record], filters: &Filters, sorter: Option<&Sorter>, layout: &ColumnLayout) -> Vec<Record> {
    let mut data = filter_records(records, filters, layout);
    sort_records(&mut data, sorter, layout);
    data
}

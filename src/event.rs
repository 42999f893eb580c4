use crate::column::SortDirection;

/// Notifications emitted to the caller, in the order they happen
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    Expand { key: String },
    ExpandedChange { keys: Vec<String> },
    Select { keys: Vec<String>, key: String },
    SelectAll { checked: bool },
    SelectionChange { keys: Vec<String> },
    SorterChange { data_index: String, direction: Option<SortDirection> },
    FilterChange { data_index: String, values: Vec<String> },
    PageChange { page: usize },
    PageSizeChange { page_size: usize },
    CellClick { key: String, data_index: String },
    RowClick { key: String },
    HeaderClick { data_index: String },
}

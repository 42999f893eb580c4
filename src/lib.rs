//! Headless data table view-state.
//!
//! Columns (optionally grouped) and a tree of records go in; the filtered,
//! sorted and windowed rows come out, together with the selection and
//! expansion state the rendering layer reads.

pub mod column;
pub mod config;
pub mod event;
pub mod expansion;
pub mod fileio;
pub mod predicate;
pub mod record;
pub mod render;
pub mod rows;
pub mod selection;
pub mod state;
pub mod value;
pub mod view;

pub use column::{Column, ColumnLayout, Filterable, FixedSide, HeaderCell, SortDirection, Sortable};
pub use config::TableConfig;
pub use event::TableEvent;
pub use record::Record;
pub use state::TableState;
pub use value::Value;

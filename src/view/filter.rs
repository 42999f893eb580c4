//! Tree-wide filtering of the record set

use std::collections::BTreeMap;

use crate::column::{ColumnLayout, FilterFn};
use crate::record::Record;

/// Active filter values per column data index
pub type Filters = BTreeMap<String, Vec<String>>;

/// Filters that actually apply: the column exists, has a predicate and a
/// non-empty value list. Kept in column order.
fn active_filters<'a>(filters: &'a Filters, layout: &'a ColumnLayout) -> Vec<(&'a FilterFn, &'a [String])> {
    layout
        .data_columns
        .iter()
        .filter_map(|column| {
            let values = filters.get(&column.data_index)?;
            let filter = column.filterable.as_ref()?.filter.as_ref()?;
            if values.is_empty() {
                None
            } else {
                Some((filter, values.as_slice()))
            }
        })
        .collect()
}

pub fn has_active_filter(filters: &Filters, layout: &ColumnLayout) -> bool {
    !active_filters(filters, layout).is_empty()
}

/// Keep records passing every active filter. Children of kept records are
/// re-filtered with the same set. The input is never modified.
pub fn filter_records(records: &[Record], filters: &Filters, layout: &ColumnLayout) -> Vec<Record> {
    let active = active_filters(filters, layout);
    if active.is_empty() {
        return records.to_vec();
    }
    apply(records, &active)
}

fn apply(records: &[Record], active: &[(&FilterFn, &[String])]) -> Vec<Record> {
    records
        .iter()
        .filter(|&record| active.iter().all(|&(filter, values)| filter(values, record)))
        .map(|record| Record {
            key: record.key.clone(),
            disabled: record.disabled,
            expand: record.expand.clone(),
            fields: record.fields.clone(),
            children: record.children.as_deref().map(|children| apply(children, active)),
        })
        .collect()
}

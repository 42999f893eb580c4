use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::TableConfig;
use crate::predicate::BuiltinFilter;
use crate::record::Record;
use crate::value::Value;

/// Filter predicate: `(active values, record) -> keep`
pub type FilterFn = Arc<dyn Fn(&[String], &Record) -> bool + Send + Sync>;

/// Sort comparator over two field values
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascend,
    Descend,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ascend" | "asc" => Some(SortDirection::Ascend),
            "descend" | "desc" => Some(SortDirection::Descend),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascend => f.write_str("ascend"),
            SortDirection::Descend => f.write_str("descend"),
        }
    }
}

#[derive(Clone, Default)]
pub struct Filterable {
    pub filter: Option<FilterFn>,
    /// Caller-controlled active values; overrides interaction state
    pub filtered_value: Option<Vec<String>>,
    pub default_filtered_value: Option<Vec<String>>,
}

impl Filterable {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&[String], &Record) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Some(Arc::new(filter)),
            ..Default::default()
        }
    }

    /// Filter backed by a named predicate on `data_index`
    pub fn builtin(kind: BuiltinFilter, data_index: &str) -> Self {
        let field = data_index.to_string();
        Self::new(move |values, record| kind.evaluate(&field, values, record))
    }
}

impl fmt::Debug for Filterable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filterable")
            .field("filter", &self.filter.is_some())
            .field("filtered_value", &self.filtered_value)
            .field("default_filtered_value", &self.default_filtered_value)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct Sortable {
    pub sorter: Option<CompareFn>,
    /// Caller-controlled direction; overrides interaction state
    pub sort_order: Option<SortDirection>,
    pub default_sort_order: Option<SortDirection>,
}

impl Sortable {
    pub fn with_sorter<F>(sorter: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        Self {
            sorter: Some(Arc::new(sorter)),
            ..Default::default()
        }
    }
}

impl fmt::Debug for Sortable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sortable")
            .field("sorter", &self.sorter.is_some())
            .field("sort_order", &self.sort_order)
            .field("default_sort_order", &self.default_sort_order)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Column {
    pub title: String,
    /// Field of the record this column shows. Group headers may leave it empty.
    pub data_index: String,
    pub fixed: Option<FixedSide>,
    pub width: Option<usize>,
    pub ellipsis: bool,
    pub filterable: Option<Filterable>,
    pub sortable: Option<Sortable>,
    pub children: Vec<Column>,
}

impl Column {
    pub fn new(title: &str, data_index: &str) -> Self {
        Self {
            title: title.to_string(),
            data_index: data_index.to_string(),
            ..Default::default()
        }
    }

    pub fn group(title: &str, children: Vec<Column>) -> Self {
        Self {
            title: title.to_string(),
            children,
            ..Default::default()
        }
    }

    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    pub fn filterable(mut self, filterable: Filterable) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn sortable(mut self, sortable: Sortable) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Column::leaf_count).sum()
        }
    }

    fn depth(&self) -> usize {
        1 + self.children.iter().map(Column::depth).max().unwrap_or(0)
    }
}

/// One cell of a header row
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub title: String,
    pub data_index: String,
    pub fixed: Option<FixedSide>,
    /// Position of the first covered leaf
    pub start: usize,
    pub col_span: usize,
    pub row_span: usize,
    /// Position in `data_columns` for leaf cells
    pub leaf: Option<usize>,
}

/// Leaf columns in display order plus the grouped header rows
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    pub data_columns: Vec<Column>,
    pub group_columns: Vec<Vec<HeaderCell>>,
}

impl ColumnLayout {
    pub fn resolve(columns: &[Column]) -> Self {
        let max_depth = columns.iter().map(Column::depth).max().unwrap_or(0);
        let mut layout = Self {
            data_columns: Vec::new(),
            group_columns: vec![Vec::new(); max_depth],
        };
        layout.travel(columns, 0, max_depth);
        layout
    }

    fn travel(&mut self, columns: &[Column], level: usize, max_depth: usize) {
        for column in columns {
            let start = self.data_columns.len();
            let leaf = if column.is_leaf() {
                let mut data_column = column.clone();
                data_column.children = Vec::new();
                self.data_columns.push(data_column);
                Some(self.data_columns.len() - 1)
            } else {
                None
            };

            self.group_columns[level].push(HeaderCell {
                title: column.title.clone(),
                data_index: column.data_index.clone(),
                fixed: column.fixed,
                start,
                col_span: column.leaf_count(),
                row_span: if leaf.is_some() { max_depth - level } else { 1 },
                leaf,
            });

            if !column.is_leaf() {
                self.travel(&column.children, level + 1, max_depth);
            }
        }
    }

    pub fn column(&self, data_index: &str) -> Option<&Column> {
        self.data_columns.iter().find(|c| c.data_index == data_index)
    }

    pub fn has_left_fixed(&self) -> bool {
        self.data_columns.iter().any(|c| c.fixed == Some(FixedSide::Left))
    }

    pub fn has_right_fixed(&self) -> bool {
        self.data_columns.iter().any(|c| c.fixed == Some(FixedSide::Right))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Expand,
    Selection,
}

/// Built-in leading column for the expand button or the selection box
#[derive(Debug, Clone, PartialEq)]
pub struct OperationColumn {
    pub kind: OperationKind,
    pub title: Option<String>,
    pub width: usize,
    pub fixed: bool,
}

pub const DEFAULT_OPERATION_WIDTH: usize = 40;

/// Operation columns in display order: expand first, then selection
pub fn operation_columns(layout: &ColumnLayout, config: &TableConfig) -> Vec<OperationColumn> {
    let has_fixed_column = layout.has_left_fixed() || layout.has_right_fixed();
    let mut operations = Vec::new();

    if let Some(expandable) = &config.expandable {
        operations.push(OperationColumn {
            kind: OperationKind::Expand,
            title: expandable.title.clone(),
            width: expandable.width.unwrap_or(DEFAULT_OPERATION_WIDTH),
            fixed: expandable.fixed || has_fixed_column,
        });
    }

    if let Some(selection) = &config.row_selection {
        operations.push(OperationColumn {
            kind: OperationKind::Selection,
            title: selection.title.clone(),
            width: selection.width.unwrap_or(DEFAULT_OPERATION_WIDTH),
            fixed: selection.fixed || has_fixed_column,
        });
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExpandableConfig, RowSelectionConfig};

    fn grouped() -> Vec<Column> {
        vec![
            Column::new("Name", "name").fixed(FixedSide::Left),
            Column::group(
                "Info",
                vec![
                    Column::new("Age", "age"),
                    Column::group(
                        "Address",
                        vec![Column::new("City", "city"), Column::new("Street", "street")],
                    ),
                ],
            ),
            Column::new("Email", "email"),
        ]
    }

    #[test]
    fn flat_columns_are_one_header_row() {
        let layout = ColumnLayout::resolve(&[Column::new("A", "a"), Column::new("B", "b")]);
        assert_eq!(layout.data_columns.len(), 2);
        assert_eq!(layout.group_columns.len(), 1);
        assert!(layout.group_columns[0].iter().all(|c| c.row_span == 1 && c.col_span == 1));
    }

    #[test]
    fn leaves_follow_depth_first_order() {
        let layout = ColumnLayout::resolve(&grouped());
        let order: Vec<&str> = layout.data_columns.iter().map(|c| c.data_index.as_str()).collect();
        assert_eq!(order, vec!["name", "age", "city", "street", "email"]);
    }

    #[test]
    fn group_headers_span() {
        let layout = ColumnLayout::resolve(&grouped());
        assert_eq!(layout.group_columns.len(), 3);

        let top = &layout.group_columns[0];
        assert_eq!(top.len(), 3);
        assert_eq!((top[0].title.as_str(), top[0].row_span, top[0].col_span), ("Name", 3, 1));
        assert_eq!((top[1].title.as_str(), top[1].row_span, top[1].col_span), ("Info", 1, 3));
        assert_eq!((top[2].title.as_str(), top[2].row_span, top[2].col_span), ("Email", 3, 1));
        assert_eq!(top[2].leaf, Some(4));

        let middle = &layout.group_columns[1];
        assert_eq!((middle[0].title.as_str(), middle[0].row_span), ("Age", 2));
        assert_eq!((middle[1].title.as_str(), middle[1].col_span), ("Address", 2));

        let bottom = &layout.group_columns[2];
        assert_eq!(bottom.len(), 2);
        assert_eq!(bottom[0].leaf, Some(2));
        assert_eq!((middle[1].start, bottom[1].start), (2, 3));
    }

    #[test]
    fn empty_columns() {
        let layout = ColumnLayout::resolve(&[]);
        assert!(layout.data_columns.is_empty());
        assert!(layout.group_columns.is_empty());
    }

    #[test]
    fn fixed_detection() {
        let layout = ColumnLayout::resolve(&grouped());
        assert!(layout.has_left_fixed());
        assert!(!layout.has_right_fixed());
        assert!(layout.column("city").is_some());
        assert!(layout.column("Info").is_none());
    }

    #[test]
    fn operations_order_and_fixed() {
        let layout = ColumnLayout::resolve(&grouped());
        let config = TableConfig {
            row_selection: Some(RowSelectionConfig::default()),
            expandable: Some(ExpandableConfig { width: Some(60), ..Default::default() }),
            ..Default::default()
        };

        let ops = operation_columns(&layout, &config);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, OperationKind::Expand);
        assert_eq!(ops[0].width, 60);
        assert_eq!(ops[1].kind, OperationKind::Selection);
        assert_eq!(ops[1].width, DEFAULT_OPERATION_WIDTH);
        // a fixed data column pins the operation columns
        assert!(ops.iter().all(|op| op.fixed));

        let plain = ColumnLayout::resolve(&[Column::new("A", "a")]);
        assert!(operation_columns(&plain, &config).iter().all(|op| !op.fixed));
        assert!(operation_columns(&plain, &TableConfig::default()).is_empty());
    }
}

use std::ops::Range;

use tracing::debug;

use crate::column::{operation_columns, Column, ColumnLayout, OperationColumn, SortDirection};
use crate::config::{TableConfig, DEFAULT_CURRENT, DEFAULT_PAGE_SIZE};
use crate::event::TableEvent;
use crate::expansion::ExpansionState;
use crate::record::Record;
use crate::rows::{render_rows, RenderRow};
use crate::selection::{CheckState, KeyUniverse, SelectionState};
use crate::view::{self, clamp_page, page_count, Filters, Sorter};

/// Owns the table's inputs and interaction state and derives the view.
///
/// Filter, sort, page and page size each resolve the same way: a value the
/// caller supplies wins and interaction does not overwrite it; otherwise
/// the internal value, seeded once from the declared default, is used.
pub struct TableState {
    config: TableConfig,
    columns: Vec<Column>,
    slot_columns: Option<Vec<Column>>,
    layout: ColumnLayout,
    data: Vec<Record>,
    universe: KeyUniverse,

    filters: Filters,
    sorter: Option<Sorter>,
    page: usize,
    page_size: usize,
    selection: Option<SelectionState>,
    expansion: ExpansionState,

    // Filtered and sorted top level, rebuilt when dirty
    processed: Vec<Record>,
    dirty: bool,

    events: Vec<TableEvent>,
}

impl TableState {
    pub fn new(columns: Vec<Column>, data: Vec<Record>, config: TableConfig) -> Self {
        let layout = ColumnLayout::resolve(&columns);
        let universe = KeyUniverse::compute(&data);
        let options = config.pagination.options();

        let page = options.and_then(|o| o.default_current).unwrap_or(DEFAULT_CURRENT);
        let page_size = options.and_then(|o| o.default_page_size).unwrap_or(DEFAULT_PAGE_SIZE);
        let selection = config.row_selection.as_ref().map(SelectionState::new);
        let expansion = ExpansionState::new(config.expandable.as_ref(), &universe);

        let mut state = Self {
            config,
            columns,
            slot_columns: None,
            layout,
            data,
            universe,
            filters: Filters::new(),
            sorter: None,
            page,
            page_size,
            selection,
            expansion,
            processed: Vec::new(),
            dirty: true,
            events: Vec::new(),
        };
        state.filters = state.default_filters();
        state.sorter = state.default_sorter();
        state
    }

    // === Inputs ===

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn universe(&self) -> &KeyUniverse {
        &self.universe
    }

    pub fn set_data(&mut self, data: Vec<Record>) {
        self.universe = KeyUniverse::compute(&data);
        self.data = data;
        self.dirty = true;
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.resolve_columns();
    }

    /// Columns declared through the slot take precedence over `set_columns`
    pub fn set_slot_columns(&mut self, columns: Option<Vec<Column>>) {
        self.slot_columns = columns;
        self.resolve_columns();
    }

    fn resolve_columns(&mut self) {
        let source = self.slot_columns.as_ref().unwrap_or(&self.columns);
        self.layout = ColumnLayout::resolve(source);
        self.dirty = true;
    }

    pub fn set_config(&mut self, config: TableConfig) {
        self.selection = match (&config.row_selection, self.selection.take()) {
            (Some(c), Some(mut s)) if s.kind() == c.kind => {
                s.set_controlled(c.selected_keys.clone());
                Some(s)
            }
            (Some(c), _) => Some(SelectionState::new(c)),
            (None, _) => None,
        };
        self.expansion
            .set_controlled(config.expandable.as_ref().and_then(|e| e.expanded_keys.clone()));
        self.config = config;
    }

    // === Resolved filter / sort / page ===

    fn default_filters(&self) -> Filters {
        self.layout
            .data_columns
            .iter()
            .filter_map(|c| {
                let values = c.filterable.as_ref()?.default_filtered_value.clone()?;
                Some((c.data_index.clone(), values))
            })
            .collect()
    }

    fn default_sorter(&self) -> Option<Sorter> {
        self.layout.data_columns.iter().find_map(|c| {
            let direction = c.sortable.as_ref()?.default_sort_order?;
            Some(Sorter::new(&c.data_index, direction))
        })
    }

    fn outer_filters(&self) -> Filters {
        self.layout
            .data_columns
            .iter()
            .filter_map(|c| {
                let values = c.filterable.as_ref()?.filtered_value.clone()?;
                Some((c.data_index.clone(), values))
            })
            .collect()
    }

    /// First column with a caller-supplied order
    fn outer_sorter(&self) -> Option<Sorter> {
        self.layout.data_columns.iter().find_map(|c| {
            let direction = c.sortable.as_ref()?.sort_order?;
            Some(Sorter::new(&c.data_index, direction))
        })
    }

    pub fn filters(&self) -> Filters {
        let mut filters = self.filters.clone();
        filters.extend(self.outer_filters());
        filters
    }

    pub fn sorter(&self) -> Option<Sorter> {
        self.outer_sorter().or_else(|| self.sorter.clone())
    }

    /// Requested page before clamping
    pub fn page(&self) -> usize {
        self.config
            .pagination
            .options()
            .and_then(|o| o.current)
            .unwrap_or(self.page)
    }

    pub fn page_size(&self) -> usize {
        self.config
            .pagination
            .options()
            .and_then(|o| o.page_size)
            .unwrap_or(self.page_size)
            .max(1)
    }

    // === Derived view ===

    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        let filters = self.filters();
        let sorter = self.sorter();
        self.processed = view::process(&self.data, &filters, sorter.as_ref(), &self.layout);
        self.dirty = false;
        debug!(
            input = self.data.len(),
            output = self.processed.len(),
            sorted = sorter.is_some(),
            "recomputed table view"
        );
    }

    /// Filtered and sorted top-level rows
    pub fn processed(&mut self) -> &[Record] {
        self.refresh();
        &self.processed
    }

    /// Row count the pagination controls work over
    pub fn total(&mut self) -> usize {
        self.processed().len()
    }

    pub fn current_page(&mut self) -> usize {
        let (page, size) = (self.page(), self.page_size());
        clamp_page(page, self.total(), size)
    }

    pub fn page_count(&mut self) -> usize {
        let size = self.page_size();
        page_count(self.total(), size)
    }

    pub fn page_window(&mut self) -> Range<usize> {
        let (enabled, page, size) = (self.config.pagination.is_enabled(), self.page(), self.page_size());
        view::page_window(self.total(), enabled, page, size)
    }

    pub fn virtual_window(&mut self) -> Range<usize> {
        view::virtual_window(self.total())
    }

    pub fn window_range(&mut self) -> Range<usize> {
        if self.config.is_virtual() {
            self.virtual_window()
        } else {
            self.page_window()
        }
    }

    /// Top-level rows on screen: the page slice, or everything when virtualized
    pub fn window(&mut self) -> &[Record] {
        let range = self.window_range();
        &self.processed[range]
    }

    pub fn is_empty(&mut self) -> bool {
        self.window().is_empty()
    }

    pub fn visible_keys(&mut self) -> Vec<String> {
        self.window().iter().map(|r| r.key.clone()).collect()
    }

    pub fn visible_enabled_keys(&mut self) -> Vec<String> {
        self.window()
            .iter()
            .filter(|r| !r.disabled)
            .map(|r| r.key.clone())
            .collect()
    }

    pub fn render_rows(&mut self) -> Vec<RenderRow<'_>> {
        let range = self.window_range();
        render_rows(
            &self.processed[range],
            &self.expansion,
            self.selection.as_ref(),
            self.config.indent_size,
        )
    }

    pub fn operations(&self) -> Vec<OperationColumn> {
        operation_columns(&self.layout, &self.config)
    }

    pub fn has_left_fixed(&self) -> bool {
        let op_fixed = self.config.row_selection.as_ref().is_some_and(|s| s.fixed)
            || self.config.expandable.as_ref().is_some_and(|e| e.fixed);
        op_fixed || self.layout.has_left_fixed()
    }

    pub fn has_right_fixed(&self) -> bool {
        self.layout.has_right_fixed()
    }

    // === Selection and expansion ===

    pub fn selected_keys(&self) -> &[String] {
        self.selection.as_ref().map(|s| s.selected_keys()).unwrap_or_default()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selection.as_ref().is_some_and(|s| s.is_selected(key))
    }

    pub fn current_selected_keys(&mut self) -> Vec<String> {
        let visible = self.visible_keys();
        self.selection
            .as_ref()
            .map(|s| s.current_selected(&visible))
            .unwrap_or_default()
    }

    pub fn check_state(&mut self) -> CheckState {
        let visible = self.visible_enabled_keys();
        self.selection
            .as_ref()
            .map_or(CheckState::Unchecked, |s| s.check_state(&visible))
    }

    pub fn all_selected(&mut self) -> bool {
        self.check_state() == CheckState::Checked
    }

    pub fn indeterminate(&mut self) -> bool {
        self.check_state() == CheckState::Indeterminate
    }

    pub fn expanded_keys(&self) -> &[String] {
        self.expansion.expanded_keys()
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expansion.is_expanded(key)
    }

    // === Interaction ===

    pub fn change_filter(&mut self, data_index: &str, values: Vec<String>) {
        let controlled = self
            .layout
            .column(data_index)
            .and_then(|c| c.filterable.as_ref())
            .is_some_and(|f| f.filtered_value.is_some());
        if !controlled {
            self.filters.insert(data_index.to_string(), values.clone());
            self.dirty = true;
        }
        debug!(data_index, ?values, controlled, "filter changed");
        self.events.push(TableEvent::FilterChange {
            data_index: data_index.to_string(),
            values,
        });
    }

    /// `None` clears the sort
    pub fn change_sorter(&mut self, data_index: &str, direction: Option<SortDirection>) {
        let controlled = self.outer_sorter().is_some();
        if !controlled {
            self.sorter = direction.map(|d| Sorter::new(data_index, d));
            self.dirty = true;
        }
        debug!(data_index, ?direction, controlled, "sorter changed");
        self.events.push(TableEvent::SorterChange {
            data_index: data_index.to_string(),
            direction,
        });
    }

    fn page_controlled(&self) -> bool {
        self.config.pagination.options().is_some_and(|o| o.current.is_some())
    }

    fn page_size_controlled(&self) -> bool {
        self.config.pagination.options().is_some_and(|o| o.page_size.is_some())
    }

    pub fn change_page(&mut self, page: usize) {
        let size = self.page_size();
        let page = clamp_page(page, self.total(), size);
        let controlled = self.page_controlled();
        if !controlled {
            self.page = page;
        }
        debug!(page, controlled, "page changed");
        self.events.push(TableEvent::PageChange { page });
    }

    /// A page beyond the new page count moves to the last page
    pub fn change_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let controlled = self.page_size_controlled();
        if !controlled {
            self.page_size = page_size;
        }
        debug!(page_size, controlled, "page size changed");
        self.events.push(TableEvent::PageSizeChange { page_size });

        if controlled || self.page_controlled() {
            return;
        }
        let size = self.page_size();
        let clamped = clamp_page(self.page, self.total(), size);
        if clamped != self.page {
            self.page = clamped;
            self.events.push(TableEvent::PageChange { page: clamped });
        }
    }

    pub fn select(&mut self, key: &str, checked: bool) {
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        if let Some(keys) = selection.select(key, checked, &self.universe) {
            self.events.push(TableEvent::Select {
                keys: keys.clone(),
                key: key.to_string(),
            });
            self.events.push(TableEvent::SelectionChange { keys });
        }
    }

    pub fn select_all(&mut self, checked: bool) {
        let visible = self.visible_enabled_keys();
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        if let Some(keys) = selection.select_all(checked, &visible) {
            self.events.push(TableEvent::SelectAll { checked });
            self.events.push(TableEvent::SelectionChange { keys });
        }
    }

    pub fn toggle_expand(&mut self, key: &str) {
        let keys = self.expansion.toggle(key);
        self.events.push(TableEvent::Expand { key: key.to_string() });
        self.events.push(TableEvent::ExpandedChange { keys });
    }

    pub fn click_cell(&mut self, key: &str, data_index: &str) {
        self.events.push(TableEvent::CellClick {
            key: key.to_string(),
            data_index: data_index.to_string(),
        });
    }

    pub fn click_row(&mut self, key: &str) {
        self.events.push(TableEvent::RowClick { key: key.to_string() });
    }

    pub fn click_header(&mut self, data_index: &str) {
        self.events.push(TableEvent::HeaderClick {
            data_index: data_index.to_string(),
        });
    }

    /// Drain emitted events in order
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }
}

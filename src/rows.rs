use crate::expansion::ExpansionState;
use crate::record::Record;
use crate::selection::SelectionState;

/// A row as the rendering layer draws it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRow<'a> {
    pub record: &'a Record,
    pub depth: usize,
    pub indent: usize,
    pub expanded: bool,
    pub selected: bool,
    /// Detail text to show below the row
    pub expand_content: Option<&'a str>,
}

impl RenderRow<'_> {
    pub fn key(&self) -> &str {
        &self.record.key
    }

    pub fn has_children(&self) -> bool {
        self.record.has_children()
    }

    pub fn disabled(&self) -> bool {
        self.record.disabled
    }
}

/// Flatten the window into display order. Children of an expanded row
/// follow it one level deeper.
pub fn render_rows<'a>(
    window: &'a [Record],
    expansion: &ExpansionState,
    selection: Option<&SelectionState>,
    indent_size: usize,
) -> Vec<RenderRow<'a>> {
    let mut rows = Vec::new();
    push_rows(&mut rows, window, 0, expansion, selection, indent_size);
    rows
}

fn push_rows<'a>(
    rows: &mut Vec<RenderRow<'a>>,
    records: &'a [Record],
    depth: usize,
    expansion: &ExpansionState,
    selection: Option<&SelectionState>,
    indent_size: usize,
) {
    for record in records {
        let expanded = expansion.is_expanded(&record.key);
        rows.push(RenderRow {
            record,
            depth,
            indent: depth * indent_size,
            expanded,
            selected: selection.is_some_and(|s| s.is_selected(&record.key)),
            expand_content: if expanded { record.expand.as_deref() } else { None },
        });

        if expanded {
            if let Some(children) = &record.children {
                push_rows(rows, children, depth + 1, expansion, selection, indent_size);
            }
        }
    }
}

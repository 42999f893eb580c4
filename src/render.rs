//! Plain-text rendering of the derived view, used by the command line

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::column::ColumnLayout;
use crate::rows::RenderRow;
use crate::state::TableState;

const MIN_COL_WIDTH: usize = 3;
const SEPARATOR: &str = " | ";

/// Pad or cut `s` to exactly `width` display columns. A cut string ends
/// in `…` when `ellipsis` is set.
fn fit(s: &str, width: usize, ellipsis: bool) -> String {
    let mut out = String::new();
    let mut used = 0;

    if s.width() > width {
        let room = if ellipsis { width.saturating_sub(1) } else { width };
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > room {
                break;
            }
            out.push(ch);
            used += w;
        }
        if ellipsis {
            out.push('…');
            used += 1;
        }
    } else {
        out.push_str(s);
        used = s.width();
    }

    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn row_prefix(row: &RenderRow<'_>) -> String {
    " ".repeat(row.depth * 2)
}

fn column_widths(layout: &ColumnLayout, rows: &[RenderRow<'_>], max_col_width: usize) -> Vec<usize> {
    layout
        .data_columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let content = rows
                .iter()
                .map(|row| {
                    let prefix = if i == 0 { row_prefix(row).len() } else { 0 };
                    prefix + row.record.get(&column.data_index).to_string().width()
                })
                .max()
                .unwrap_or(0);
            let width = column.width.unwrap_or_else(|| content.max(column.title.width()));
            width.clamp(MIN_COL_WIDTH, max_col_width.max(MIN_COL_WIDTH))
        })
        .collect()
}

fn span_width(widths: &[usize], start: usize, span: usize) -> usize {
    let end = (start + span).min(widths.len());
    widths[start..end].iter().sum::<usize>() + SEPARATOR.len() * span.saturating_sub(1)
}

fn header_lines(layout: &ColumnLayout, widths: &[usize], lead: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for row in &layout.group_columns {
        let mut parts = Vec::new();
        let mut pos = 0;
        while pos < widths.len() {
            match row.iter().find(|cell| cell.start == pos) {
                Some(cell) => {
                    parts.push(fit(&cell.title, span_width(widths, pos, cell.col_span), true));
                    pos += cell.col_span.max(1);
                }
                None => {
                    parts.push(" ".repeat(widths[pos]));
                    pos += 1;
                }
            }
        }
        lines.push(format!("{}{}", lead, parts.join(SEPARATOR)).trim_end().to_string());
    }
    lines
}

/// Render header, rows and the pager line
pub fn render_text(state: &mut TableState, max_col_width: usize) -> String {
    let selectable = state.config().row_selection.is_some();
    let radio = state.config().is_radio();
    let paginated = state.config().pagination.is_enabled() && !state.config().is_virtual();
    let pager_on_top = paginated && state.config().page_position.is_top();
    let (page, pages, total) = (state.current_page(), state.page_count(), state.total());
    let layout = state.layout().clone();

    let rows = state.render_rows();
    let widths = column_widths(&layout, &rows, max_col_width);
    let lead = if selectable { "    ".repeat(2) } else { "    ".to_string() };

    let pager = format!("Page {}/{} ({} rows)", page, pages, total);
    let mut lines = Vec::new();
    if pager_on_top {
        lines.push(pager.clone());
    }
    lines.extend(header_lines(&layout, &widths, &lead));
    let rule_width = lead.len() + span_width(&widths, 0, widths.len());
    lines.push("-".repeat(rule_width));

    if rows.is_empty() {
        lines.push(format!("{}No data", lead));
    }

    for row in &rows {
        let mut line = String::new();
        line.push_str(match (row.has_children() || row.record.expand.is_some(), row.expanded) {
            (true, true) => "[-] ",
            (true, false) => "[+] ",
            (false, _) => "    ",
        });
        if selectable {
            line.push_str(match (radio, row.disabled(), row.selected) {
                (_, true, _) => "[/] ",
                (true, false, true) => "(o) ",
                (true, false, false) => "( ) ",
                (false, false, true) => "[x] ",
                (false, false, false) => "[ ] ",
            });
        }

        let cells: Vec<String> = layout
            .data_columns
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (column, width))| {
                let value = row.record.get(&column.data_index).to_string();
                let text = if i == 0 { format!("{}{}", row_prefix(row), value) } else { value };
                fit(&text, *width, column.ellipsis)
            })
            .collect();
        line.push_str(&cells.join(SEPARATOR));
        lines.push(line.trim_end().to_string());

        if let Some(detail) = row.expand_content {
            lines.push(format!("{}{}> {}", lead, row_prefix(row), detail));
        }
    }

    lines.push("-".repeat(rule_width));
    if !paginated {
        lines.push(format!("{} rows", total));
    } else if !pager_on_top {
        lines.push(pager);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::config::{ExpandableConfig, PagePosition, RowSelectionConfig, SelectionKind, TableConfig};
    use crate::record::Record;

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit("ab", 4, true), "ab  ");
        assert_eq!(fit("abcdef", 4, true), "abc…");
        assert_eq!(fit("abcdef", 4, false), "abcd");
        assert_eq!(fit("日本語", 4, true), "日… ");
        assert_eq!(fit("日本語", 5, false), "日本 ");
    }

    #[test]
    fn renders_grouped_header_and_tree() {
        let columns = vec![
            Column::new("Name", "name"),
            Column::group("Info", vec![Column::new("Age", "age"), Column::new("City", "city")]),
        ];
        let data = vec![
            Record::new("1").with("name", "Jane").with("age", 30).with("city", "Oslo"),
            Record::new("2")
                .with("name", "Bob")
                .with("age", 20)
                .with_children(vec![Record::new("2-1").with("name", "Tim").with("age", 10)]),
        ];
        let config = TableConfig {
            row_selection: Some(RowSelectionConfig::default()),
            expandable: Some(ExpandableConfig::default()),
            ..Default::default()
        };
        let mut state = TableState::new(columns, data, config);
        state.toggle_expand("2");
        state.select("1", true);

        let text = render_text(&mut state, 20);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Name") && lines[0].contains("Info"));
        assert!(!lines[1].contains("Name"));
        assert!(lines[1].contains("Age") && lines[1].contains("City"));
        assert!(lines.iter().any(|l| l.starts_with("    [x] Jane")));
        assert!(lines.iter().any(|l| l.starts_with("[-] [ ] Bob")));
        assert!(lines.iter().any(|l| l.starts_with("    [ ]   Tim")));
        assert_eq!(lines.last(), Some(&"Page 1/1 (2 rows)"));
    }

    #[test]
    fn pager_follows_page_position() {
        let data = vec![Record::new("1").with("a", "x"), Record::new("2").with("a", "y")];
        let bottom = TableConfig::default();
        let top = TableConfig {
            page_position: PagePosition::Top,
            ..Default::default()
        };

        let text = render_text(&mut TableState::new(vec![Column::new("A", "a")], data.clone(), bottom), 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    A");
        assert_eq!(lines.last(), Some(&"Page 1/1 (2 rows)"));

        let text = render_text(&mut TableState::new(vec![Column::new("A", "a")], data, top), 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Page 1/1 (2 rows)");
        assert_eq!(lines[1], "    A");
        assert!(lines.last().is_some_and(|l| l.starts_with('-')));
    }

    #[test]
    fn radio_rows_use_round_markers() {
        let config = TableConfig {
            row_selection: Some(RowSelectionConfig {
                kind: SelectionKind::Radio,
                ..Default::default()
            }),
            ..Default::default()
        };
        let data = vec![Record::new("1").with("a", "x"), Record::new("2").with("a", "y")];
        let mut state = TableState::new(vec![Column::new("A", "a")], data, config);
        state.select("2", true);

        let text = render_text(&mut state, 20);
        assert!(text.lines().any(|l| l.starts_with("    ( ) x")));
        assert!(text.lines().any(|l| l.starts_with("    (o) y")));
    }

    #[test]
    fn renders_empty_placeholder() {
        let mut state = TableState::new(vec![Column::new("A", "a")], Vec::new(), TableConfig::default());
        let text = render_text(&mut state, 20);
        assert!(text.contains("No data"));
    }
}

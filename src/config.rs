use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_CURRENT: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_INDENT_SIZE: usize = 16;

/// `pagination = false` or `pagination = { page_size = 20 }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaginationSetting {
    Enabled(bool),
    Options(PaginationConfig),
}

impl Default for PaginationSetting {
    fn default() -> Self {
        PaginationSetting::Enabled(true)
    }
}

impl PaginationSetting {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, PaginationSetting::Enabled(false))
    }

    pub fn options(&self) -> Option<&PaginationConfig> {
        match self {
            PaginationSetting::Options(options) => Some(options),
            PaginationSetting::Enabled(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Caller-controlled page
    pub current: Option<usize>,
    /// Caller-controlled page size
    pub page_size: Option<usize>,
    pub default_current: Option<usize>,
    pub default_page_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    #[default]
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowSelectionConfig {
    pub kind: SelectionKind,
    /// Caller-controlled selection
    pub selected_keys: Option<Vec<String>>,
    pub default_selected_keys: Vec<String>,
    pub fixed: bool,
    pub title: Option<String>,
    pub width: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpandableConfig {
    /// Caller-controlled expansion
    pub expanded_keys: Option<Vec<String>>,
    pub default_expanded_keys: Vec<String>,
    pub default_expand_all_rows: bool,
    pub fixed: bool,
    pub title: Option<String>,
    pub width: Option<usize>,
}

/// Parameters handed through to the external virtual list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualListConfig {
    pub height: Option<usize>,
    pub item_height: Option<usize>,
    pub threshold: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePosition {
    Tl,
    Top,
    Tr,
    Bl,
    Bottom,
    #[default]
    Br,
}

impl PagePosition {
    pub fn is_top(&self) -> bool {
        matches!(self, PagePosition::Tl | PagePosition::Top | PagePosition::Tr)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub pagination: PaginationSetting,
    pub row_selection: Option<RowSelectionConfig>,
    pub expandable: Option<ExpandableConfig>,
    pub virtual_list: Option<VirtualListConfig>,
    pub page_position: PagePosition,
    pub indent_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationSetting::default(),
            row_selection: None,
            expandable: None,
            virtual_list: None,
            page_position: PagePosition::default(),
            indent_size: DEFAULT_INDENT_SIZE,
        }
    }
}

impl TableConfig {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    pub fn is_virtual(&self) -> bool {
        self.virtual_list.is_some()
    }

    pub fn is_radio(&self) -> bool {
        matches!(&self.row_selection, Some(s) if s.kind == SelectionKind::Radio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let config: TableConfig = toml::from_str("").unwrap();
        assert_eq!(config, TableConfig::default());
        assert!(config.pagination.is_enabled());
        assert_eq!(config.indent_size, DEFAULT_INDENT_SIZE);
        assert!(!config.page_position.is_top());
    }

    #[test]
    fn pagination_forms() {
        let off: TableConfig = toml::from_str("pagination = false").unwrap();
        assert!(!off.pagination.is_enabled());

        let options: TableConfig = toml::from_str("pagination = { page_size = 2, default_current = 3 }").unwrap();
        assert!(options.pagination.is_enabled());
        let opts = options.pagination.options().unwrap();
        assert_eq!(opts.page_size, Some(2));
        assert_eq!(opts.default_current, Some(3));
        assert_eq!(opts.current, None);
    }

    #[test]
    fn selection_and_expandable() {
        let config: TableConfig = toml::from_str(
            r#"
            page_position = "top"
            [row_selection]
            kind = "radio"
            default_selected_keys = ["1"]
            [expandable]
            default_expand_all_rows = true
            [virtual_list]
            height = 300
            "#,
        )
        .unwrap();

        assert!(config.is_radio());
        assert!(config.is_virtual());
        assert!(config.page_position.is_top());
        assert_eq!(config.row_selection.unwrap().default_selected_keys, vec!["1".to_string()]);
        assert!(config.expandable.unwrap().default_expand_all_rows);
    }

    #[test]
    fn from_file_reports_errors() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "indent_size = \"wide\"").unwrap();

        let err = TableConfig::from_file(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));

        let missing = TableConfig::from_file(Path::new("/nonexistent/table.toml")).unwrap_err();
        assert!(missing.starts_with("Failed to read config file"));
    }
}

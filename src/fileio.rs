use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::column::{Column, Filterable, FixedSide, SortDirection, Sortable};
use crate::config::TableConfig;
use crate::predicate::BuiltinFilter;
use crate::record::Record;
use crate::state::TableState;
use crate::value::{parse_number, Value};

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Toml(toml::de::Error),
    Csv(csv::Error),
    InvalidColumn(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Failed to read document: {}", e),
            LoadError::Toml(e) => write!(f, "Failed to parse document: {}", e),
            LoadError::Csv(e) => write!(f, "Failed to parse CSV: {}", e),
            LoadError::InvalidColumn(msg) => write!(f, "Invalid column: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Toml(e) => Some(e),
            LoadError::Csv(e) => Some(e),
            LoadError::InvalidColumn(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Toml(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}

/// Detected document format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Toml,
    Csv,
    Tsv,
}

impl FileFormat {
    /// Detect format from file extension
    fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "toml" => Some(FileFormat::Toml),
            "csv" => Some(FileFormat::Csv),
            "tsv" => Some(FileFormat::Tsv),
            _ => None,
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            FileFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Column as written in a document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    pub title: String,
    pub data_index: String,
    pub fixed: Option<FixedSide>,
    pub width: Option<usize>,
    pub ellipsis: bool,
    pub filter: Option<BuiltinFilter>,
    pub filtered_value: Option<Vec<String>>,
    pub default_filtered_value: Option<Vec<String>>,
    pub sortable: bool,
    pub sort_order: Option<SortDirection>,
    pub default_sort_order: Option<SortDirection>,
    pub children: Vec<ColumnSpec>,
}

impl ColumnSpec {
    pub fn into_column(self) -> Result<Column, LoadError> {
        let is_group = !self.children.is_empty();
        if !is_group && self.data_index.is_empty() {
            return Err(LoadError::InvalidColumn(format!("'{}' has no data_index", self.title)));
        }
        if is_group && (self.filter.is_some() || self.sortable) {
            return Err(LoadError::InvalidColumn(format!(
                "group '{}' cannot filter or sort",
                self.title
            )));
        }

        let filterable = self.filter.map(|kind| Filterable {
            filtered_value: self.filtered_value.clone(),
            default_filtered_value: self.default_filtered_value.clone(),
            ..Filterable::builtin(kind, &self.data_index)
        });

        let sortable = (self.sortable || self.sort_order.is_some() || self.default_sort_order.is_some())
            .then(|| Sortable {
                sorter: None,
                sort_order: self.sort_order,
                default_sort_order: self.default_sort_order,
            });

        let children = self
            .children
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Column {
            title: self.title,
            data_index: self.data_index,
            fixed: self.fixed,
            width: self.width,
            ellipsis: self.ellipsis,
            filterable,
            sortable,
            children,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentFile {
    config: TableConfig,
    columns: Vec<ColumnSpec>,
    data: Vec<Record>,
}

/// Columns, records and config loaded from disk
#[derive(Debug)]
pub struct Document {
    pub columns: Vec<Column>,
    pub data: Vec<Record>,
    pub config: TableConfig,
}

impl Document {
    /// Load a document, picking the reader from the extension (TOML by default)
    pub fn load(path: &PathBuf) -> Result<Self, LoadError> {
        match FileFormat::from_extension(path) {
            Some(format @ (FileFormat::Csv | FileFormat::Tsv)) => Self::read_csv(path, format),
            Some(FileFormat::Toml) | None => Self::read_toml(path),
        }
    }

    pub fn parse_toml(content: &str) -> Result<Self, LoadError> {
        let file: DocumentFile = toml::from_str(content)?;
        let columns = file
            .columns
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            data: file.data,
            config: file.config,
        })
    }

    fn read_toml(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let doc = Self::parse_toml(&content)?;
        debug!(path = %path.display(), columns = doc.columns.len(), records = doc.data.len(), "loaded document");
        Ok(doc)
    }

    /// One leaf column per header cell, one flat record per line
    fn read_csv(path: &Path, format: FileFormat) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(1 << 20, file);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter())
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let columns = headers
            .iter()
            .map(|h| {
                Column::new(h, h)
                    .filterable(Filterable::builtin(BuiltinFilter::Compare, h))
                    .sortable(Sortable::default())
            })
            .collect();

        let mut data = Vec::new();
        for (line, row) in csv_reader.records().enumerate() {
            let row = row?;
            let mut record = Record::new((line + 1).to_string());
            for (header, cell) in headers.iter().zip(row.iter()) {
                let value = match parse_number(cell) {
                    Some(n) if !cell.is_empty() => Value::Number(n),
                    _ => Value::Text(cell.to_string()),
                };
                record.fields.insert(header.clone(), value);
            }
            data.push(record);
        }

        debug!(path = %path.display(), columns = headers.len(), records = data.len(), "loaded csv");
        Ok(Self {
            columns,
            data,
            config: TableConfig::default(),
        })
    }

    pub fn into_state(self) -> TableState {
        TableState::new(self.columns, self.data, self.config)
    }
}

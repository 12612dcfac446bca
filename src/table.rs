//! Column-oriented table model consumed by the extractor.
//!
//! A [`Table`] is an ordered set of named columns that all share one row
//! count. Each column has a single logical type (see [`ColumnType`]); cells
//! are read through the borrowed [`CellValue`] union so the extractor never
//! needs to know how a column stores its data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell, borrowed from its column.
///
/// `Int` and `Float` are the two numeric representations. `Missing` is an
/// absent value and is distinct from `Text("")`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
    Missing,
}

impl CellValue<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{:?}", fl),
            CellValue::Missing => write!(f, "null"),
        }
    }
}

/// Logical type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Categorical => "categorical",
        };
        write!(f, "{}", name)
    }
}

/// Column storage. `None` entries are missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Column {
    Text {
        values: Vec<Option<String>>,
    },
    Integer {
        values: Vec<Option<i64>>,
    },
    /// `NaN` entries are read back as missing.
    Float {
        values: Vec<Option<f64>>,
    },
    /// Dictionary-encoded text: each row holds an index into `categories`.
    Categorical {
        categories: Vec<String>,
        codes: Vec<Option<u32>>,
    },
}

impl Column {
    /// Build a text column from optional string-likes.
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Column::Text {
            values: values.into_iter().map(|v| v.map(Into::into)).collect(),
        }
    }

    pub fn integer(values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Column::Integer {
            values: values.into_iter().collect(),
        }
    }

    pub fn float(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Column::Float {
            values: values.into_iter().collect(),
        }
    }

    /// Build a categorical column from an explicit category list and codes.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCategoryCode`] if any code is not a
    /// valid index into `categories`.
    pub fn categorical(
        categories: Vec<String>,
        codes: Vec<Option<u32>>,
    ) -> Result<Self, TableError> {
        for (row, code) in codes.iter().enumerate() {
            if let Some(code) = *code {
                if code as usize >= categories.len() {
                    return Err(TableError::InvalidCategoryCode {
                        row,
                        code,
                        categories: categories.len(),
                    });
                }
            }
        }
        Ok(Column::Categorical { categories, codes })
    }

    /// Dictionary-encode a sequence of labels. Categories are assigned in
    /// order of first appearance.
    pub fn categorical_from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut index: IndexMap<String, u32> = IndexMap::new();
        let codes = labels
            .into_iter()
            .map(|label| {
                label.map(|l| {
                    let next = index.len() as u32;
                    *index.entry(l.as_ref().to_string()).or_insert(next)
                })
            })
            .collect();
        Column::Categorical {
            categories: index.into_keys().collect(),
            codes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text { values } => values.len(),
            Column::Integer { values } => values.len(),
            Column::Float { values } => values.len(),
            Column::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Text { .. } => ColumnType::Text,
            Column::Integer { .. } => ColumnType::Integer,
            Column::Float { .. } => ColumnType::Float,
            Column::Categorical { .. } => ColumnType::Categorical,
        }
    }

    /// Read one cell. Returns `None` if `row` is out of range.
    pub fn cell(&self, row: usize) -> Option<CellValue<'_>> {
        let cell = match self {
            Column::Text { values } => match values.get(row)? {
                Some(s) => CellValue::Text(s),
                None => CellValue::Missing,
            },
            Column::Integer { values } => match values.get(row)? {
                Some(i) => CellValue::Int(*i),
                None => CellValue::Missing,
            },
            Column::Float { values } => match values.get(row)? {
                Some(f) if !f.is_nan() => CellValue::Float(*f),
                _ => CellValue::Missing,
            },
            Column::Categorical { categories, codes } => match codes.get(row)? {
                Some(code) => categories
                    .get(*code as usize)
                    .map_or(CellValue::Missing, |label| CellValue::Text(label)),
                None => CellValue::Missing,
            },
        };
        Some(cell)
    }
}

/// Errors raised while assembling a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    DuplicateColumn(String),
    InvalidCategoryCode {
        row: usize,
        code: u32,
        categories: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::RowCountMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Column '{}' has {} rows, expected {}",
                column, actual, expected
            ),
            TableError::DuplicateColumn(name) => write!(f, "Duplicate column: {}", name),
            TableError::InvalidCategoryCode {
                row,
                code,
                categories,
            } => write!(
                f,
                "Category code {} at row {} is out of range ({} categories)",
                code, row, categories
            ),
        }
    }
}

impl std::error::Error for TableError {}

/// Read/write access a table must offer to be transformed.
///
/// The extractor only reads cells of the source column and writes one
/// text-or-missing column, so any columnar store can implement this.
pub trait TabularData {
    /// Number of rows shared by every column.
    fn row_count(&self) -> usize;

    /// Column names in table order.
    fn column_names(&self) -> Vec<&str>;

    /// Logical type of a column, or `None` if it does not exist.
    fn column_type(&self, column: &str) -> Option<ColumnType>;

    /// Read one cell, or `None` if the column or row does not exist.
    fn cell(&self, row: usize, column: &str) -> Option<CellValue<'_>>;

    /// Replace `column` with a text column, or append it if absent.
    ///
    /// `values` must hold exactly [`row_count`](Self::row_count) entries.
    fn set_text_column(&mut self, column: &str, values: Vec<Option<String>>);
}

/// An in-memory table with insertion-ordered columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from `(name, column)` pairs.
    ///
    /// # Errors
    ///
    /// Fails if two columns share a name or differ in length.
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut table = Table::default();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Append a column. The first column fixes the table's row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(TableError::RowCountMismatch {
                column: name,
                expected: self.row_count,
                actual: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TabularData for Table {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).map(Column::column_type)
    }

    fn cell(&self, row: usize, column: &str) -> Option<CellValue<'_>> {
        self.columns.get(column)?.cell(row)
    }

    fn set_text_column(&mut self, column: &str, values: Vec<Option<String>>) {
        debug_assert!(
            self.columns.is_empty() || values.len() == self.row_count,
            "text column length must match the table's row count"
        );
        if self.columns.is_empty() {
            self.row_count = values.len();
        }
        // IndexMap::insert keeps the position of an existing key.
        self.columns
            .insert(column.to_string(), Column::Text { values });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Table::new(vec![
            ("A", Column::text(vec![Some("a"), Some("b")])),
            ("B", Column::integer(vec![Some(1)])),
        ]);

        assert_eq!(
            result,
            Err(TableError::RowCountMismatch {
                column: "B".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let result = Table::new(vec![
            ("A", Column::integer(vec![Some(1)])),
            ("A", Column::integer(vec![Some(2)])),
        ]);

        assert_eq!(result, Err(TableError::DuplicateColumn("A".to_string())));
    }

    #[test]
    fn test_cells_by_type() {
        let table = Table::new(vec![
            ("t", Column::text(vec![Some("x"), None])),
            ("i", Column::integer(vec![Some(7), None])),
            ("f", Column::float(vec![Some(f64::NAN), Some(2.5)])),
        ])
        .unwrap();

        assert_eq!(table.cell(0, "t"), Some(CellValue::Text("x")));
        assert_eq!(table.cell(1, "t"), Some(CellValue::Missing));
        assert_eq!(table.cell(0, "i"), Some(CellValue::Int(7)));
        assert_eq!(table.cell(0, "f"), Some(CellValue::Missing));
        assert_eq!(table.cell(1, "f"), Some(CellValue::Float(2.5)));
        assert_eq!(table.cell(2, "t"), None);
        assert_eq!(table.cell(0, "nope"), None);
    }

    #[test]
    fn test_categorical_from_labels() {
        let column = Column::categorical_from_labels(vec![Some("b"), Some("a"), None, Some("b")]);

        assert_eq!(
            column,
            Column::Categorical {
                categories: vec!["b".to_string(), "a".to_string()],
                codes: vec![Some(0), Some(1), None, Some(0)],
            }
        );
        assert_eq!(column.cell(3), Some(CellValue::Text("b")));
        assert_eq!(column.cell(2), Some(CellValue::Missing));
    }

    #[test]
    fn test_categorical_rejects_bad_code() {
        let result = Column::categorical(vec!["a".to_string()], vec![Some(0), Some(1)]);

        assert_eq!(
            result,
            Err(TableError::InvalidCategoryCode {
                row: 1,
                code: 1,
                categories: 1,
            })
        );
    }

    #[test]
    fn test_set_text_column_replaces_in_place() {
        let mut table = Table::new(vec![
            ("A", Column::integer(vec![Some(1), Some(2)])),
            ("B", Column::integer(vec![Some(3), Some(4)])),
        ])
        .unwrap();

        table.set_text_column("A", vec![Some("x".to_string()), None]);
        table.set_text_column("C", vec![None, Some("y".to_string())]);

        assert_eq!(table.column_names(), vec!["A", "B", "C"]);
        assert_eq!(table.column_type("A"), Some(ColumnType::Text));
        assert_eq!(table.cell(1, "C"), Some(CellValue::Text("y")));
    }
}

//! Table serialization.
//!
//! Tables travel as a JSON document listing columns in order:
//!
//! ```json
//! {"columns": [
//!   {"name": "A", "type": "text", "values": ["abc", null]},
//!   {"name": "C", "type": "categorical", "categories": ["x"], "codes": [0, null]}
//! ]}
//! ```
//!
//! `null` is a missing value. [`NdjsonWriter`] writes a table as one JSON
//! object per row instead.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::io::{Read, Write};

use crate::table::{CellValue, Column, Table, TableError, TabularData};

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    JsonError(serde_json::Error),
    IoError(std::io::Error),
    InvalidTable(TableError),
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        SerializationError::JsonError(err)
    }
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::IoError(err)
    }
}

impl From<TableError> for SerializationError {
    fn from(err: TableError) -> Self {
        SerializationError::InvalidTable(err)
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::JsonError(e) => write!(f, "JSON error: {}", e),
            SerializationError::IoError(e) => write!(f, "IO error: {}", e),
            SerializationError::InvalidTable(e) => write!(f, "Invalid table: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {}

#[derive(Deserialize)]
struct TableDocument {
    columns: Vec<ColumnDocument>,
}

#[derive(Deserialize)]
struct ColumnDocument {
    name: String,
    #[serde(flatten)]
    column: Column,
}

#[derive(Serialize)]
struct TableDocumentRef<'a> {
    columns: Vec<ColumnDocumentRef<'a>>,
}

#[derive(Serialize)]
struct ColumnDocumentRef<'a> {
    name: &'a str,
    #[serde(flatten)]
    column: &'a Column,
}

impl TableDocument {
    fn into_table(self) -> Result<Table, TableError> {
        let mut table = Table::default();
        for ColumnDocument { name, column } in self.columns {
            // Re-check codes the derive accepted unvalidated.
            let column = match column {
                Column::Categorical { categories, codes } => {
                    Column::categorical(categories, codes)?
                }
                other => other,
            };
            table.push_column(name, column)?;
        }
        Ok(table)
    }
}

/// Read a table document.
pub fn read_table<R: Read>(reader: R) -> Result<Table, SerializationError> {
    let doc: TableDocument = serde_json::from_reader(reader)?;
    Ok(doc.into_table()?)
}

/// Parse a table document from a string.
pub fn table_from_str(s: &str) -> Result<Table, SerializationError> {
    let doc: TableDocument = serde_json::from_str(s)?;
    Ok(doc.into_table()?)
}

fn document(table: &Table) -> TableDocumentRef<'_> {
    TableDocumentRef {
        columns: table
            .iter()
            .map(|(name, column)| ColumnDocumentRef { name, column })
            .collect(),
    }
}

/// Write a table document.
pub fn write_table<W: Write>(mut writer: W, table: &Table) -> Result<(), SerializationError> {
    serde_json::to_writer(&mut writer, &document(table))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Render a table document as a string.
pub fn table_to_string(table: &Table) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(&document(table))?)
}

impl Serialize for CellValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::Missing => serializer.serialize_none(),
        }
    }
}

/// One table row, serialized as an object in column order.
struct RowRef<'a> {
    table: &'a Table,
    row: usize,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.column_count()))?;
        for (name, column) in self.table.iter() {
            let cell = column.cell(self.row).unwrap_or(CellValue::Missing);
            map.serialize_entry(name, &cell)?;
        }
        map.end()
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes table rows as NDJSON, one JSON object per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    /// Create a new NDJSON writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single row as an NDJSON line
    pub fn write_row(&mut self, table: &Table, row: usize) -> Result<(), SerializationError> {
        let json = serde_json::to_string(&RowRef { table, row })?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Write every row of a table
    pub fn write_table(&mut self, table: &Table) -> Result<(), SerializationError> {
        for row in 0..table.row_count() {
            self.write_row(table, row)?;
        }
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            ("name", Column::text(vec![Some("Alice"), None])),
            ("age", Column::integer(vec![Some(42), Some(24)])),
            ("score", Column::float(vec![None, Some(1.5)])),
            ("tier", Column::categorical_from_labels(vec![Some("gold"), Some("gold")])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_document_round_trip() {
        let table = sample();

        let json = table_to_string(&table).unwrap();
        let parsed = table_from_str(&json).unwrap();

        assert_eq!(parsed, table);
        assert_eq!(parsed.column_names(), vec!["name", "age", "score", "tier"]);
    }

    #[test]
    fn test_read_table_document() {
        let json = r#"{"columns":[
            {"name":"A","type":"float","values":[1,null,2000.1]},
            {"name":"C","type":"categorical","categories":["x","y"],"codes":[1,null,0]}
        ]}"#;

        let table = read_table(json.as_bytes()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, "A"), Some(CellValue::Float(1.0)));
        assert_eq!(table.cell(1, "A"), Some(CellValue::Missing));
        assert_eq!(table.cell(0, "C"), Some(CellValue::Text("y")));
    }

    #[test]
    fn test_read_table_rejects_ragged_columns() {
        let json = r#"{"columns":[
            {"name":"A","type":"text","values":["a"]},
            {"name":"B","type":"integer","values":[1,2]}
        ]}"#;

        let result = table_from_str(json);

        assert!(matches!(
            result,
            Err(SerializationError::InvalidTable(TableError::RowCountMismatch { .. }))
        ));
    }

    #[test]
    fn test_read_table_rejects_bad_category_code() {
        let json = r#"{"columns":[
            {"name":"C","type":"categorical","categories":["x"],"codes":[3]}
        ]}"#;

        let result = table_from_str(json);

        assert!(matches!(
            result,
            Err(SerializationError::InvalidTable(TableError::InvalidCategoryCode { .. }))
        ));
    }

    #[test]
    fn test_ndjson_writer() {
        let mut buf = Vec::new();
        let mut writer = NdjsonWriter::new(&mut buf);

        writer.write_table(&sample()).unwrap();
        writer.flush().unwrap();

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"name":"Alice","age":42,"score":null,"tier":"gold"}"#
        );
        assert_eq!(lines[1], r#"{"name":null,"age":24,"score":1.5,"tier":"gold"}"#);
    }
}

//! # regex-extractor: Single-Group Regex Column Extraction
//!
//! Extracts the text matched by one regular-expression capture group from a
//! table column into a new (or overwritten) column.
//!
//! ## Features
//!
//! - **Any column type**: text, integer, float, and categorical columns are
//!   rendered as text before matching; missing values stay missing
//! - **Strict validation**: the expression must compile and hold exactly one
//!   capture group, checked before any row is touched
//! - **Incremental configuration**: empty parameters are a no-op, never an error
//! - **Pluggable tables**: any store implementing [`TabularData`] can be transformed
//!
//! ## Example
//!
//! ```rust
//! use regex_extractor::{extract, Column, ExtractParams, Table, TabularData};
//!
//! let table = Table::new(vec![("A", Column::text(vec![Some("abc"), Some("def")]))]).unwrap();
//! let out = extract(&table, &ExtractParams::new("A", r"a(\w{2})", "B")).unwrap();
//!
//! assert_eq!(out.column_names(), vec!["A", "B"]);
//! assert_eq!(out.column("B"), Some(&Column::text(vec![Some("bc"), None])));
//! ```

// Core modules
pub mod error;
pub mod extraction;
pub mod params;
pub mod table;

// Table documents and NDJSON output
pub mod serialization;

// Re-export key types
pub use error::{ExtractError, DEFAULT_HOST_NAME};
pub use extraction::{
    apply_column, coerce_cell, coerce_column, extract, extract_one, validate,
    CompiledExpression, Extractor,
};
pub use params::{ExtractParams, ParamsError};
pub use serialization::{
    read_table, table_from_str, table_to_string, write_table, NdjsonWriter, SerializationError,
};
pub use table::{CellValue, Column, ColumnType, Table, TableError, TabularData};

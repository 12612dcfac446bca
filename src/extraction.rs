//! Regex capture-group extraction over a table column.
//!
//! The transform reads one source column, renders every cell as text,
//! runs a single-group regular expression against it, and writes the
//! captured substrings to a destination column. Rows that are missing or do
//! not match produce missing values.
//!
//! The pieces are exposed as small pure functions ([`validate`],
//! [`coerce_cell`], [`coerce_column`], [`extract_one`], [`apply_column`]) so
//! hosts can reuse them; [`Extractor`] ties them together.

use regex::Regex;
use std::borrow::Cow;

use crate::error::{ExtractError, DEFAULT_HOST_NAME};
use crate::params::ExtractParams;
use crate::table::{CellValue, TabularData};

/// A regular expression known to contain exactly one capture group.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    regex: Regex,
}

impl CompiledExpression {
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compile `expression` and check it has exactly one capture group.
///
/// `host` is the product name used in the too-many-groups message.
///
/// # Errors
///
/// * [`ExtractError::InvalidExpressionSyntax`] if the expression does not compile
/// * [`ExtractError::MissingCaptureGroup`] if it has no capture group
/// * [`ExtractError::TooManyCaptureGroups`] if it has more than one
pub fn validate(expression: &str, host: &str) -> Result<CompiledExpression, ExtractError> {
    let regex = Regex::new(expression).map_err(|e| ExtractError::InvalidExpressionSyntax {
        message: engine_message(&e),
    })?;

    // captures_len() counts the implicit whole-match group.
    match regex.captures_len() - 1 {
        0 => Err(ExtractError::MissingCaptureGroup),
        1 => Ok(CompiledExpression { regex }),
        _ => Err(ExtractError::TooManyCaptureGroups {
            host: host.to_string(),
        }),
    }
}

/// Reduce a regex engine error to its one-line diagnostic.
///
/// Syntax errors render as a multi-line block ending in `error: <reason>`;
/// only the reason is kept.
fn engine_message(err: &regex::Error) -> String {
    match err {
        regex::Error::Syntax(msg) => msg
            .lines()
            .rev()
            .find_map(|line| line.trim().strip_prefix("error: "))
            .map_or_else(|| msg.clone(), str::to_string),
        other => other.to_string(),
    }
}

/// Render one cell as text. Missing cells stay missing.
///
/// Integers use plain decimal notation. Floats use the shortest
/// representation that round-trips, which always carries a fraction or an
/// exponent (`1.0`, `2000.1`, `1e20`).
pub fn coerce_cell(cell: CellValue<'_>) -> Option<Cow<'_, str>> {
    match cell {
        CellValue::Text(s) => Some(Cow::Borrowed(s)),
        CellValue::Int(i) => Some(Cow::Owned(i.to_string())),
        CellValue::Float(f) if f.is_nan() => None,
        CellValue::Float(f) => Some(Cow::Owned(format!("{:?}", f))),
        CellValue::Missing => None,
    }
}

/// Text view of a whole column, one entry per row.
///
/// Returns `None` if `column` does not exist. Categorical columns resolve to
/// their labels.
pub fn coerce_column<'a, T: TabularData + ?Sized>(
    table: &'a T,
    column: &str,
) -> Option<Vec<Option<Cow<'a, str>>>> {
    table.column_type(column)?;
    let texts = (0..table.row_count())
        .map(|row| {
            table
                .cell(row, column)
                .and_then(coerce_cell)
        })
        .collect();
    Some(texts)
}

/// Run the expression against one string and return the captured group.
///
/// Returns `None` when there is no match, or when the match succeeded
/// without the group participating (e.g. `(a)?b` on `"b"`).
pub fn extract_one(expression: &CompiledExpression, text: &str) -> Option<String> {
    expression
        .regex
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

/// Apply [`extract_one`] to every row of a coerced column.
pub fn apply_column<S: AsRef<str>>(
    expression: &CompiledExpression,
    texts: &[Option<S>],
) -> Vec<Option<String>> {
    texts
        .iter()
        .map(|text| {
            text.as_ref()
                .and_then(|t| extract_one(expression, t.as_ref()))
        })
        .collect()
}

/// Configured regex extraction transform.
///
/// The extractor holds no data between calls; one instance can be shared
/// across threads and applied to independent tables.
#[derive(Debug, Clone)]
pub struct Extractor {
    host_name: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            host_name: DEFAULT_HOST_NAME.to_string(),
        }
    }

    /// Override the product name shown in user-facing messages.
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Extract into `table` in place.
    ///
    /// If any parameter is empty this does nothing and succeeds. Otherwise
    /// the expression and source column are validated before any row is
    /// processed, so on error `table` is left untouched.
    pub fn extract_in_place<T: TabularData + ?Sized>(
        &self,
        table: &mut T,
        params: &ExtractParams,
    ) -> Result<(), ExtractError> {
        if !params.is_complete() {
            tracing::debug!("Extraction skipped: parameters incomplete");
            return Ok(());
        }

        let expression = validate(&params.expression, &self.host_name)?;

        // The source column is fully read before the destination is
        // written, so `newcolumn == column` overwrites cleanly.
        let extracted = {
            let texts = coerce_column(&*table, &params.column).ok_or_else(|| {
                ExtractError::UnknownColumn {
                    column: params.column.clone(),
                }
            })?;
            apply_column(&expression, &texts)
        };

        let matched = extracted.iter().filter(|v| v.is_some()).count();
        tracing::info!(
            "Extracted {} of {} rows from '{}' into '{}'",
            matched,
            extracted.len(),
            params.column,
            params.newcolumn
        );

        table.set_text_column(&params.newcolumn, extracted);
        Ok(())
    }

    /// Extract into a copy of `table`, leaving the input unchanged.
    pub fn extract<T: TabularData + Clone>(
        &self,
        table: &T,
        params: &ExtractParams,
    ) -> Result<T, ExtractError> {
        let mut out = table.clone();
        self.extract_in_place(&mut out, params)?;
        Ok(out)
    }
}

/// Extract with the default host name. See [`Extractor::extract`].
pub fn extract<T: TabularData + Clone>(
    table: &T,
    params: &ExtractParams,
) -> Result<T, ExtractError> {
    Extractor::new().extract(table, params)
}

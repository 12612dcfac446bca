//! Extraction parameters and the host-side sources they are read from.
//!
//! The transform takes exactly three string parameters: `column`,
//! `expression`, and `newcolumn`. A host may hand them over as a generic
//! argument map or as a YAML/JSON params file. Any of them may be left
//! empty while a user is still filling in a form; the extractor then
//! returns the table untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Error raised while reading parameters from a host source.
#[derive(Debug)]
pub enum ParamsError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    /// A parameter was present but not a string.
    InvalidValue { name: String, value: Value },
}

impl From<std::io::Error> for ParamsError {
    fn from(err: std::io::Error) -> Self {
        ParamsError::IoError(err)
    }
}

impl From<serde_yaml::Error> for ParamsError {
    fn from(err: serde_yaml::Error) -> Self {
        ParamsError::ParseError(err)
    }
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::IoError(e) => write!(f, "IO error: {}", e),
            ParamsError::ParseError(e) => write!(f, "Failed to parse params: {}", e),
            ParamsError::InvalidValue { name, value } => {
                write!(f, "Parameter '{}' must be a string, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ParamsError {}

/// The three named parameters of the transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractParams {
    /// Source column name
    #[serde(default)]
    pub column: String,

    /// Regular expression with exactly one capture group
    #[serde(default)]
    pub expression: String,

    /// Destination column name (may equal `column`)
    #[serde(default)]
    pub newcolumn: String,
}

impl ExtractParams {
    pub fn new(
        column: impl Into<String>,
        expression: impl Into<String>,
        newcolumn: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            expression: expression.into(),
            newcolumn: newcolumn.into(),
        }
    }

    /// True when none of the three parameters is empty.
    pub fn is_complete(&self) -> bool {
        !self.column.is_empty() && !self.expression.is_empty() && !self.newcolumn.is_empty()
    }

    /// Read parameters from a host argument map.
    ///
    /// Absent and `null` entries become empty strings; unrelated keys are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::InvalidValue`] if a parameter holds a
    /// non-string value.
    pub fn from_args(args: &HashMap<String, Value>) -> Result<Self, ParamsError> {
        let get = |name: &str| -> Result<String, ParamsError> {
            match args.get(name) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(ParamsError::InvalidValue {
                    name: name.to_string(),
                    value: other.clone(),
                }),
            }
        };

        Ok(Self {
            column: get("column")?,
            expression: get("expression")?,
            newcolumn: get("newcolumn")?,
        })
    }

    /// Load parameters from a YAML (or JSON) file.
    ///
    /// # Example
    /// ```ignore
    /// use regex_extractor::ExtractParams;
    ///
    /// let params = ExtractParams::load_from_file("params.yaml")?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse parameters from YAML text. An empty document yields empty
    /// parameters.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParamsError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Replace each parameter for which an override is given.
    pub fn with_overrides(
        mut self,
        column: Option<String>,
        expression: Option<String>,
        newcolumn: Option<String>,
    ) -> Self {
        if let Some(column) = column {
            self.column = column;
        }
        if let Some(expression) = expression {
            self.expression = expression;
        }
        if let Some(newcolumn) = newcolumn {
            self.newcolumn = newcolumn;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_args() {
        let mut args = HashMap::new();
        args.insert("column".to_string(), json!("A"));
        args.insert("expression".to_string(), json!(r"(\w)"));
        args.insert("newcolumn".to_string(), Value::Null);
        args.insert("unrelated".to_string(), json!(3));

        let params = ExtractParams::from_args(&args).unwrap();

        assert_eq!(params, ExtractParams::new("A", r"(\w)", ""));
        assert!(!params.is_complete());
    }

    #[test]
    fn test_from_args_rejects_non_string() {
        let mut args = HashMap::new();
        args.insert("column".to_string(), json!(5));

        let result = ExtractParams::from_args(&args);

        assert!(matches!(
            result,
            Err(ParamsError::InvalidValue { ref name, .. }) if name == "column"
        ));
    }

    #[test]
    fn test_from_yaml_partial() {
        let params = ExtractParams::from_yaml_str("column: A\nexpression: '(\\d+)'\n").unwrap();

        assert_eq!(params.column, "A");
        assert_eq!(params.expression, r"(\d+)");
        assert_eq!(params.newcolumn, "");
    }

    #[test]
    fn test_from_yaml_empty_document() {
        assert_eq!(ExtractParams::from_yaml_str("").unwrap(), ExtractParams::default());
    }

    #[test]
    fn test_with_overrides() {
        let params = ExtractParams::new("A", "(x)", "B").with_overrides(
            None,
            Some("(y)".to_string()),
            Some("C".to_string()),
        );

        assert_eq!(params, ExtractParams::new("A", "(y)", "C"));
    }
}

//! Error type returned by the extractor.
//!
//! Every variant is raised during validation, before any row is touched, so
//! a failed extraction never leaves a table half-written.

use std::fmt;

/// Host name used in user-facing messages unless the caller overrides it.
pub const DEFAULT_HOST_NAME: &str = "Workbench";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The expression does not compile. `message` is the engine's diagnostic.
    InvalidExpressionSyntax { message: String },
    /// The expression compiles but has no capture group.
    MissingCaptureGroup,
    /// The expression has more than one capture group.
    TooManyCaptureGroups { host: String },
    /// The source column is not in the table.
    UnknownColumn { column: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidExpressionSyntax { message } => {
                write!(f, "Invalid regex: {}", message)
            }
            ExtractError::MissingCaptureGroup => write!(
                f,
                "Your regex needs a capture group. Add (parentheses) around it."
            ),
            ExtractError::TooManyCaptureGroups { host } => write!(
                f,
                "{} only supports one (capture group). Remove some parentheses.",
                host
            ),
            ExtractError::UnknownColumn { column } => {
                write!(f, "Column '{}' does not exist", column)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ExtractError::MissingCaptureGroup.to_string(),
            "Your regex needs a capture group. Add (parentheses) around it."
        );
        assert_eq!(
            ExtractError::TooManyCaptureGroups {
                host: DEFAULT_HOST_NAME.to_string()
            }
            .to_string(),
            "Workbench only supports one (capture group). Remove some parentheses."
        );
        assert_eq!(
            ExtractError::InvalidExpressionSyntax {
                message: "unclosed character class".to_string()
            }
            .to_string(),
            "Invalid regex: unclosed character class"
        );
    }
}

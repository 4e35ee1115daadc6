//! Manifest Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Schema failures carry one entry per
//! offending field rather than bailing on the first problem found.

use derive_more::{Display, Error};

use crate::category::Category;

/// A manifest parsing or validation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// The payload is not syntactically valid JSON.
    #[display("malformed manifest payload: {_0}")]
    Malformed(#[error(not(source))] String),
    /// The payload parsed but does not satisfy the schema for its category.
    #[display("schema validation failed for '{category}': {}", render_violations(violations))]
    Schema {
        /// The category whose schema was applied.
        category: Category,
        /// One entry per offending field, in document order.
        #[error(not(source))]
        violations: Vec<FieldViolation>,
    },
    /// A category tag that no known schema matches.
    #[display("unknown manifest category: {_0}")]
    UnknownCategory(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A payload is either valid or it is not. Retrying re-reads the
        // same bytes.
        false
    }
}

/// A single schema complaint, addressed by the dotted path of the field it
/// concerns (`npcs[3].species`, or `$` for the document root).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Dotted path from the document root to the offending field.
    pub field: String,
    /// What is wrong with the value at that path.
    pub problem: Problem,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, problem: Problem) -> Self {
        Self { field: field.into(), problem }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` {}", self.field, self.problem)
    }
}

/// The ways a field can fail its schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    /// A required field is absent.
    Missing,
    /// The field holds a value of the wrong JSON type.
    Type {
        expected: &'static str,
        found: &'static str,
    },
    /// The field holds a value outside its closed set of keywords.
    Value {
        allowed: &'static [&'static str],
        found: String,
    },
    /// The field names an entry the payload never declares.
    Reference { missing: String },
    /// Field checks passed but the payload could not be assembled into the
    /// typed manifest (numeric range or a similar representation limit).
    /// Carries the deserializer's message.
    Shape(String),
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "is required but missing"),
            Self::Type { expected, found } => {
                write!(f, "should be {expected}, found {found}")
            }
            Self::Value { allowed, found } => {
                write!(f, "has unknown value '{found}' (allowed: {})", allowed.join(", "))
            }
            Self::Reference { missing } => {
                write!(f, "refers to undeclared entry '{missing}'")
            }
            Self::Shape(detail) => write!(f, "does not fit the schema: {detail}"),
        }
    }
}

fn render_violations(violations: &[FieldViolation]) -> String {
    let rendered: Vec<String> = violations.iter().map(ToString::to_string).collect();
    rendered.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_kind_lists_every_violation() {
        let kind = ErrorKind::Schema {
            category: Category::Enemies,
            violations: vec![
                FieldViolation::new("enemies[0].health", Problem::Missing),
                FieldViolation::new(
                    "enemies[1].behavior",
                    Problem::Value {
                        allowed: &["patrol", "chase", "turret", "swarm"],
                        found: "ambush".to_owned(),
                    },
                ),
            ],
        };
        let message = kind.to_string();
        assert!(message.starts_with("schema validation failed for 'enemies':"));
        assert!(message.contains("`enemies[0].health` is required but missing"));
        assert!(message.contains("unknown value 'ambush' (allowed: patrol, chase, turret, swarm)"));
    }

    #[test]
    fn problem_display_messages() {
        let type_mismatch = Problem::Type { expected: "a string", found: "number" };
        assert_eq!(type_mismatch.to_string(), "should be a string, found number");

        let dangling = Problem::Reference { missing: "kobold".to_owned() };
        assert_eq!(dangling.to_string(), "refers to undeclared entry 'kobold'");

        let shape = Problem::Shape("invalid value: integer `-3`".to_owned());
        assert!(shape.to_string().starts_with("does not fit the schema:"));
    }

    #[test]
    fn malformed_kind_keeps_parser_detail() {
        let kind = ErrorKind::Malformed("expected value at line 1 column 2".to_owned());
        assert!(kind.to_string().contains("line 1 column 2"));
    }

    #[test]
    fn nothing_is_retryable() {
        let kind = ErrorKind::Malformed("truncated".to_owned());
        assert!(!kind.is_retryable());
    }
}

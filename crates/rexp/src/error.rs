//! Record model error type.

use std::fmt;

use thiserror::Error;

/// Kind of a record, as reported by type-checked accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RKind {
    Null,
    Boolean,
    Integer,
    Double,
    String,
    Raw,
    Generic,
    S4,
    /// Either an integer or a double vector.
    Numeric,
    /// Any vector kind (not `NULL`, not an S4 object).
    Vector,
}

impl RKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "logical vector",
            Self::Integer => "integer vector",
            Self::Double => "double vector",
            Self::String => "character vector",
            Self::Raw => "raw vector",
            Self::Generic => "list",
            Self::S4 => "S4 object",
            Self::Numeric => "numeric vector",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for RKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for record lookups and type-checked access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RExpError {
    #[error("missing '{name}' attribute")]
    MissingAttribute { name: String },
    #[error("missing '{name}' element")]
    MissingElement { name: String },
    #[error("invalid '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: RKind,
        actual: RKind,
    },
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("expected a scalar, got {len} values")]
    NotScalar { len: usize },
    #[error("integer vector is not factor-encoded")]
    NotFactor,
    #[error("factor code {code} out of range for {levels} levels")]
    InvalidFactorCode { code: i32, levels: usize },
}

impl RExpError {
    pub(crate) fn type_mismatch(name: &str, expected: RKind, actual: RKind) -> Self {
        Self::TypeMismatch {
            name: name.to_owned(),
            expected,
            actual,
        }
    }
}

//! Conversion error type.

use rexp::RExpError;
use thiserror::Error;

/// Error type for schema and model encoding.
///
/// Every variant aborts the conversion; nothing is retried.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    RExp(#[from] RExpError),
    /// A record error with advice on how to repair the input.
    #[error("{source}; {hint}")]
    Hinted {
        #[source]
        source: RExpError,
        hint: String,
    },
    #[error("inconsistent dimensions: {0}")]
    InconsistentDimension(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("invalid '{name}' option: {message}")]
    Options { name: String, message: String },
}

/// Coarse classification of a [`ConversionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingAttribute,
    TypeMismatch,
    InconsistentDimension,
    UnsupportedFormat,
    Io,
    Encoding,
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RExp(source) | Self::Hinted { source, .. } => record_kind(source),
            Self::InconsistentDimension(_) => ErrorKind::InconsistentDimension,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Io { .. } => ErrorKind::Io,
            Self::Encoding(_) | Self::Options { .. } => ErrorKind::Encoding,
        }
    }

    pub(crate) fn hinted(source: RExpError, hint: impl Into<String>) -> Self {
        Self::Hinted {
            source,
            hint: hint.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn record_kind(err: &RExpError) -> ErrorKind {
    match err {
        RExpError::MissingAttribute { .. } | RExpError::MissingElement { .. } => {
            ErrorKind::MissingAttribute
        }
        RExpError::TypeMismatch { .. } | RExpError::NotScalar { .. } => ErrorKind::TypeMismatch,
        RExpError::IndexOutOfBounds { .. } | RExpError::InvalidFactorCode { .. } => {
            ErrorKind::InconsistentDimension
        }
        RExpError::NotFactor => ErrorKind::UnsupportedFormat,
    }
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

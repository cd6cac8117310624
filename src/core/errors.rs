//! Error types for the similarity-detection pipeline.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors that can occur while configuring or running the pipeline.
///
/// Each variant is a struct-like case with a human-readable message plus
/// optional machine-checkable context, rather than a bare string.
#[derive(Error, Debug)]
pub enum SimilarityError {
    /// A `Config` value failed validation, or a config file could not be
    /// parsed into one.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what is wrong.
        message: String,
        /// The offending field, when known.
        field: Option<String>,
    },

    /// An I/O failure while reading a source file. Only raised by the
    /// ambient `SourceFile::read` convenience constructor; the pipeline
    /// itself never touches the filesystem.
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable description.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<std::io::Error>,
    },

    /// An internal invariant was violated: signature length mismatch,
    /// dangling prev/next link, out-of-range fingerprint id. These
    /// indicate a bug in this crate, not bad input, and are always fatal.
    #[error("invariant violation: {message}")]
    Invariant {
        /// What invariant was violated.
        message: String,
        /// Additional context (which phase, which ids), when available.
        context: Option<String>,
    },
}

impl SimilarityError {
    /// Build a `Config` error with no specific field.
    pub fn config(message: impl Into<String>) -> Self {
        SimilarityError::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Build a `Config` error naming the offending field.
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        SimilarityError::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Build an `Io` error wrapping a `std::io::Error`.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        SimilarityError::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Build an `Invariant` error with no extra context.
    pub fn invariant(message: impl Into<String>) -> Self {
        SimilarityError::Invariant {
            message: message.into(),
            context: None,
        }
    }

    /// Build an `Invariant` error carrying extra context.
    pub fn invariant_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        SimilarityError::Invariant {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Attach additional context to `Config`/`Invariant` variants in place.
    /// A no-op for variants that don't carry a context slot (`Io`).
    pub fn with_context(mut self, ctx: impl fmt::Display) -> Self {
        match &mut self {
            SimilarityError::Invariant { context, .. } => {
                *context = Some(ctx.to_string());
            }
            SimilarityError::Config { field, .. } => {
                *field = Some(ctx.to_string());
            }
            SimilarityError::Io { .. } => {}
        }
        self
    }
}

impl From<serde_json::Error> for SimilarityError {
    fn from(err: serde_json::Error) -> Self {
        SimilarityError::Config {
            message: format!("invalid config JSON: {err}"),
            field: None,
        }
    }
}

/// Attach context to a foreign error, converting it into a `SimilarityError`
/// along the way.
pub trait ResultExt<T> {
    /// Wrap the error (if any) with additional context, eagerly formatted.
    fn with_context(self, ctx: impl fmt::Display) -> Result<T>;

    /// Wrap the error (if any) with context computed lazily.
    fn context_with<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SimilarityError>,
{
    fn with_context(self, ctx: impl fmt::Display) -> Result<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn context_with<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

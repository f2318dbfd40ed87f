//! Error types for PHP unserialization.
//!
//! Decode errors carry the byte offset where parsing failed, plus optional
//! context and a preview of the input around that offset.

use std::fmt;
use thiserror::Error;

/// The main error type for PHP unserialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct UnserializeError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The byte position where the error occurred.
    ///
    /// `None` for errors that are not tied to an input offset, such as
    /// [`ErrorKind::TypeMismatch`] raised by a value accessor.
    pub position: Option<usize>,
    /// Optional context about what was being parsed.
    pub context: Option<String>,
    /// Preview of input around error position for debugging.
    pub input_preview: Option<String>,
}

impl fmt::Display for UnserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(position) = self.position {
            write!(f, " at position {}", position)?;
        }
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(ref preview) = self.input_preview {
            write!(f, "\n{}", preview)?;
        }
        Ok(())
    }
}

/// Specific kinds of unserialization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Unknown type marker.
    #[error("unknown type marker '{0}'")]
    UnknownType(char),

    /// A required `:` or `;` (or other structural byte) is missing after a
    /// numeric or length field.
    #[error("expected delimiter '{expected}', found '{found}'")]
    ExpectedDelimiter {
        /// The delimiter that was expected.
        expected: char,
        /// The byte that was found instead.
        found: char,
    },

    /// Declared string length overruns the buffer, or the closing quote is
    /// not where the declared length says it should be.
    #[error("invalid string length: declared {declared}, {available} bytes available")]
    InvalidStringLength {
        /// The declared string length in bytes.
        declared: usize,
        /// The number of bytes actually available.
        available: usize,
    },

    /// Invalid float value.
    #[error("invalid float: '{0}'")]
    InvalidFloat(String),

    /// More than one top-level value in the buffer.
    #[error("trailing data after top-level value")]
    TrailingData,

    /// Declared element count disagrees with the parsed entries (strict
    /// mode only).
    #[error("element count mismatch: declared {declared}, parsed {actual}")]
    CountMismatch {
        /// The count declared in the array/object header.
        declared: usize,
        /// The number of key/value pairs actually parsed.
        actual: usize,
    },

    /// Nesting depth exceeded.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),

    /// An accessor was invoked against a value of a different active kind.
    ///
    /// This is a usage error on an already-decoded value, not a parse
    /// error, so it carries no input position.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The kind the accessor asked for.
        expected: &'static str,
        /// The kind actually held by the value.
        found: &'static str,
    },
}

impl UnserializeError {
    /// Create a new decode error with the given kind and input position.
    #[inline]
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position: Some(position),
            context: None,
            input_preview: None,
        }
    }

    /// Create a type-mismatch error for an accessor misuse.
    #[inline]
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self {
            kind: ErrorKind::TypeMismatch { expected, found },
            position: None,
            context: None,
            input_preview: None,
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add input preview around the error position for debugging.
    ///
    /// Shows up to 20 bytes before and after the error position.
    #[cold]
    pub fn with_input_preview(mut self, data: &[u8], error_pos: usize) -> Self {
        let start = error_pos.saturating_sub(20);
        let end = (error_pos + 20).min(data.len());

        if start < end {
            let slice = &data[start..end];
            let preview = String::from_utf8_lossy(slice);

            // Mark the error position with a caret
            let relative_pos = error_pos.saturating_sub(start);
            let mut result = String::with_capacity(preview.len() + 10);
            result.push_str(&preview);
            result.push('\n');
            result.push_str(&" ".repeat(relative_pos));
            result.push('^');

            self.input_preview = Some(result);
        }
        self
    }
}

/// Result type alias for PHP unserialization.
pub type Result<T> = std::result::Result<T, UnserializeError>;

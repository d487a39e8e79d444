//! Store error types.
//!
//! Every store operation returns a structured error that carries a
//! user-facing message and an optional remediation hint.

use std::io;
use std::path::PathBuf;

use dasm_model::ModelError;
use thiserror::Error;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file to read does not exist.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// The stream ended before the expected data.
    #[error("Unexpected end of data")]
    Truncated,

    /// A file started with the wrong identification string.
    #[error("Bad header: expected {expected:?}, found {found:?}")]
    BadHeader { expected: &'static str, found: String },

    /// Format version newer than this build understands.
    #[error("{format} version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        format: &'static str,
        found: i32,
        max_supported: i32,
    },

    /// A persisted symbolic name matches no enum variant.
    #[error("Unknown {kind} name: {name:?}")]
    UnknownEnumName { kind: &'static str, name: String },

    /// A short string does not fit the 16-bit length prefix.
    #[error("String of {len} bytes exceeds the 65535-byte limit")]
    StringTooLong { len: usize },

    /// Persisted string bytes are not valid text.
    #[error("Invalid string data: {reason}")]
    InvalidString { reason: &'static str },

    /// A length or count field holds a negative value.
    #[error("Negative {field} length: {len}")]
    NegativeLength { field: &'static str, len: i32 },

    /// A buffer or list too large for its 32-bit length prefix.
    #[error("{field} of {len} entries exceeds the 32-bit length limit")]
    LengthOverflow { field: &'static str, len: usize },

    /// The memory section does not cover the full address space.
    #[error("Memory section holds {found} cells, expected 65536")]
    InvalidMemoryCount { found: i32 },

    /// A constant column file does not hold one value per row.
    #[error("Constant file holds {found} rows, expected {expected}")]
    ConstantCountMismatch { expected: usize, found: i32 },

    /// A constant column index outside the table.
    #[error("Constant column {column} is out of range")]
    ColumnOutOfRange { column: usize },

    /// Data left over after a complete record was read.
    #[error("Unexpected trailing data after record")]
    TrailingBytes,

    /// An input file with no content.
    #[error("Input file is empty: {path}")]
    EmptyInput { path: PathBuf },

    /// Model validation rejected decoded data.
    #[error(transparent)]
    Model(ModelError),

    /// Store configuration is unusable.
    #[error("Invalid store configuration: {message}")]
    InvalidConfig { message: String },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stream-level I/O error, such as corrupt compressed data.
    #[error("Stream error: {0}")]
    Stream(#[source] io::Error),

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Create an Io error for `path`.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Map an open failure, turning a missing file into [`StoreError::NotFound`].
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::io("open", path, source)
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("The file {} does not exist.", path.display()),
            Self::Truncated => {
                "The file ended before all project data was read. It may be truncated.".to_string()
            }
            Self::BadHeader { expected, .. } => {
                format!("The file is not a {expected} file.")
            }
            Self::UnsupportedVersion {
                format,
                found,
                max_supported,
            } => format!(
                "This {format} file was written by a newer version of the disassembler \
                (file version {found}, this version supports up to {max_supported})."
            ),
            Self::UnknownEnumName { kind, name } => {
                format!("The file refers to an unknown {kind} \"{name}\".")
            }
            Self::StringTooLong { len } => {
                format!("A text field of {len} bytes is too long to be saved.")
            }
            Self::InvalidString { .. } | Self::NegativeLength { .. } | Self::TrailingBytes => {
                "The file contains malformed data. It may be corrupted.".to_string()
            }
            Self::LengthOverflow { field, .. } => {
                format!("The {field} is too large to be saved.")
            }
            Self::InvalidMemoryCount { found } => format!(
                "The project describes {found} memory cells instead of the full 64K address space."
            ),
            Self::ConstantCountMismatch { expected, found } => {
                format!("The constant file holds {found} rows instead of {expected}.")
            }
            Self::ColumnOutOfRange { column } => {
                format!("Constant column {column} does not exist.")
            }
            Self::EmptyInput { path } => format!("The file {} is empty.", path.display()),
            Self::Model(err) => format!("The project data is inconsistent: {err}."),
            Self::InvalidConfig { message } => format!("The store settings are invalid: {message}."),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Stream(_) => {
                "An error occurred while reading the project data. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => Some("Check the path and try again.".into()),
            Self::Truncated | Self::Stream(_) | Self::InvalidString { .. } => {
                Some("Try opening a backup if you have one.".into())
            }
            Self::BadHeader { .. } => {
                Some("Make sure you selected a file exported from the constant table.".into())
            }
            Self::UnsupportedVersion { .. } => {
                Some("Update the disassembler to open this file.".into())
            }
            Self::StringTooLong { .. } => Some("Shorten the comment or label.".into()),
            Self::ColumnOutOfRange { .. } => Some("Use a column between 0 and 19.".into()),
            Self::EmptyInput { .. } => Some("Select a non-empty program image.".into()),
            Self::InvalidConfig { .. } => Some("Fix or remove the configuration file.".into()),
            Self::Io { operation, .. } => {
                if matches!(*operation, "open" | "read") {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::UnknownEnumName { .. }
            | Self::NegativeLength { .. }
            | Self::LengthOverflow { .. }
            | Self::InvalidMemoryCount { .. }
            | Self::ConstantCountMismatch { .. }
            | Self::TrailingBytes
            | Self::Model(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Stream(err)
        }
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownName { kind, name } => Self::UnknownEnumName { kind, name },
            other => Self::Model(other),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_maps_to_truncated() {
        let err: StoreError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(err, StoreError::Truncated));

        let err: StoreError = io::Error::from(io::ErrorKind::InvalidData).into();
        assert!(matches!(err, StoreError::Stream(_)));
    }

    #[test]
    fn test_unknown_name_maps_to_enum_error() {
        let err: StoreError = ModelError::unknown_name("data type", "WORDY").into();
        assert!(matches!(
            err,
            StoreError::UnknownEnumName { kind: "data type", ref name } if name == "WORDY"
        ));
    }

    #[test]
    fn test_open_not_found() {
        let err = StoreError::open("missing.dis", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_user_message_mentions_version() {
        let err = StoreError::UnsupportedVersion {
            format: "project",
            found: 12,
            max_supported: 11,
        };
        assert!(err.user_message().contains("file version 12"));
    }
}

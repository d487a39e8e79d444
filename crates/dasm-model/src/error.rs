//! Error types for the project model.

use thiserror::Error;

/// Errors raised when building or mutating model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A symbolic name does not match any variant of the named enum.
    #[error("unknown {kind} name: {name:?}")]
    UnknownName { kind: &'static str, name: String },

    /// Constant grid coordinates outside `COLS x ROWS`.
    #[error("constant cell ({column}, {row}) is outside the table")]
    CellOutOfRange { column: usize, row: usize },

    /// A replacement column does not have one value per row.
    #[error("constant column must hold {expected} rows, got {actual}")]
    ColumnLength { expected: usize, actual: usize },

    /// The annotation array does not cover the full address space.
    #[error("memory must hold {expected} cells, got {actual}")]
    InvalidMemorySize { expected: usize, actual: usize },
}

impl ModelError {
    /// Create an UnknownName error.
    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::unknown_name("file type", "ZIP");
        assert_eq!(format!("{err}"), "unknown file type name: \"ZIP\"");

        let err = ModelError::CellOutOfRange { column: 20, row: 3 };
        assert_eq!(format!("{err}"), "constant cell (20, 3) is outside the table");
    }
}

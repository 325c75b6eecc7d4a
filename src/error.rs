//! Error handling for the oracle.
//!
//! Only recoverable conditions live here. Value and structural differences
//! between back-ends are diagnostics, not errors, and contract violations in
//! the capture layer panic instead of returning.

use crate::element::ElementType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while capturing, persisting or loading results.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A vector must hold at least one element.
    #[error("vector length must be greater than zero")]
    ZeroLength,

    /// `length * element_size` does not fit in memory.
    #[error("vector of {length} {element_type} elements is too large")]
    LengthOverflow {
        /// Element type of the vector.
        element_type: ElementType,
        /// Requested length.
        length: usize,
    },

    /// Element index outside the vector.
    #[error("element index {index} out of range for vector of length {length}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Vector length.
        length: usize,
    },

    /// Raw element bytes do not match the element size of the vector type.
    #[error("expected {expected} bytes per element, got {got}")]
    ElementSize {
        /// Element size of the record type.
        expected: usize,
        /// Size of the supplied slice.
        got: usize,
    },

    /// Unrecognised element type name in a snapshot.
    #[error("unknown element type '{0}'")]
    UnknownElementType(String),

    /// Data buffer in a snapshot is not valid hex.
    #[error("invalid hex in record data: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Data buffer size disagrees with `length * element_size`.
    #[error("record at {file}:{line} carries {got} data bytes, expected {expected}")]
    BufferSize {
        /// Source file of the record.
        file: String,
        /// Source line of the record.
        line: u32,
        /// `length * element_size`.
        expected: usize,
        /// Bytes actually present.
        got: usize,
    },

    /// A snapshot holds the same test case twice.
    #[error("duplicate test case '{0}' in snapshot")]
    DuplicateCase(String),

    /// Sequence numbers in a section must run 1, 2, 3, ...
    #[error("test case '{case}' section {section}: record has seq {got}, expected {expected}")]
    SequenceMismatch {
        /// Test case name.
        case: String,
        /// 0-based section index.
        section: usize,
        /// Sequence number implied by the record's position.
        expected: u32,
        /// Sequence number found.
        got: u32,
    },

    /// A section holds more records than sequence numbers can count.
    #[error("test case '{case}' section {section} has too many records")]
    SequenceOverflow {
        /// Test case name.
        case: String,
        /// 0-based section index.
        section: usize,
    },

    /// Snapshot written by an incompatible version.
    #[error("unsupported snapshot format version {0}")]
    UnsupportedFormat(u32),

    /// Failed to read or write a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON could not be encoded or decoded.
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OracleError::IndexOutOfRange {
            index: 4,
            length: 4,
        };
        assert_eq!(
            err.to_string(),
            "element index 4 out of range for vector of length 4"
        );

        let err = OracleError::UnknownElementType("float16".to_string());
        assert!(err.to_string().contains("float16"));

        let err = OracleError::LengthOverflow {
            element_type: ElementType::Int64,
            length: 7,
        };
        assert_eq!(err.to_string(), "vector of 7 int64 elements is too large");

        let err = OracleError::SequenceMismatch {
            case: "add".to_string(),
            section: 1,
            expected: 1,
            got: 7,
        };
        assert_eq!(
            err.to_string(),
            "test case 'add' section 1: record has seq 7, expected 1"
        );
    }

    #[test]
    fn test_hex_error_converts() {
        let hex_err = hex::decode("zz").unwrap_err();
        let err: OracleError = hex_err.into();
        assert!(matches!(err, OracleError::InvalidHex(_)));
    }
}

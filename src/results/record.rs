//! A single captured vector value.

use crate::element::{Element, ElementType};
use crate::error::{OracleError, OracleResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison policy attached to a record when it is pushed.
///
/// Only meaningful for floating-point records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Allowed error in ULPs. Zero requires an exact match.
    pub precision_ulp: u32,
    /// Whether `+0.0` and `-0.0` compare equal.
    pub fp_zero_equal: bool,
}

impl Policy {
    /// Exact comparison, signed zeros distinct.
    pub const fn exact() -> Self {
        Self {
            precision_ulp: 0,
            fp_zero_equal: false,
        }
    }

    /// Allow `ulp` units of error.
    pub const fn with_precision(ulp: u32) -> Self {
        Self {
            precision_ulp: ulp,
            fp_zero_equal: false,
        }
    }
}

/// Where a value was captured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file name.
    pub file: String,
    /// Line number.
    pub line: u32,
}

impl SourceLocation {
    /// Create a location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One vector value captured during a back-end run.
///
/// Type, length and policy are fixed at construction. Only the element
/// bytes are written afterwards, through [`set`](Self::set).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    element_type: ElementType,
    length: usize,
    location: SourceLocation,
    seq: u32,
    policy: Policy,
    data: Vec<u8>,
}

impl ResultRecord {
    /// Allocate a zeroed record. `length` must be non-zero.
    pub(crate) fn new(
        element_type: ElementType,
        length: usize,
        location: SourceLocation,
        seq: u32,
        policy: Policy,
    ) -> OracleResult<Self> {
        let size = byte_len(element_type, length)?;
        Ok(Self {
            element_type,
            length,
            location,
            seq,
            policy,
            data: vec![0u8; size],
        })
    }

    /// Rebuild a record from persisted parts, checking the buffer size
    /// before anything is allocated.
    pub(crate) fn from_parts(
        element_type: ElementType,
        length: usize,
        location: SourceLocation,
        seq: u32,
        policy: Policy,
        data: Vec<u8>,
    ) -> OracleResult<Self> {
        let expected = byte_len(element_type, length)?;
        if data.len() != expected {
            return Err(OracleError::BufferSize {
                file: location.file,
                line: location.line,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            element_type,
            length,
            location,
            seq,
            policy,
            data,
        })
    }

    /// Copy one element's raw bytes into slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()` or `bytes.len() != element_size()`. Either
    /// means the harness is feeding the wrong shape and nothing captured
    /// from it is comparable.
    pub fn set(&mut self, index: usize, bytes: &[u8]) {
        assert!(
            index < self.length,
            "element index {} out of range for {} vector of length {} at {}",
            index,
            self.element_type,
            self.length,
            self.location
        );
        assert_eq!(
            bytes.len(),
            self.element_size(),
            "element of {} bytes written to {} vector at {}",
            bytes.len(),
            self.element_type,
            self.location
        );
        let size = self.element_size();
        self.data[index * size..(index + 1) * size].copy_from_slice(bytes);
    }

    /// Checked form of [`set`](Self::set).
    pub fn try_set(&mut self, index: usize, bytes: &[u8]) -> OracleResult<()> {
        if index >= self.length {
            return Err(OracleError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        if bytes.len() != self.element_size() {
            return Err(OracleError::ElementSize {
                expected: self.element_size(),
                got: bytes.len(),
            });
        }
        self.set(index, bytes);
        Ok(())
    }

    /// Write a typed value into slot `index`.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range index or if `T` does not match the record
    /// type.
    pub fn set_value<T: Element>(&mut self, index: usize, value: T) {
        assert_eq!(
            T::TYPE,
            self.element_type,
            "{} value written to {} vector at {}",
            T::TYPE,
            self.element_type,
            self.location
        );
        let mut buf = [0u8; 8];
        let slot = &mut buf[..T::TYPE.size()];
        value.write_ne(slot);
        self.set(index, slot);
    }

    /// Element type.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false: records hold at least one element.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes per element, derived from the type.
    pub fn element_size(&self) -> usize {
        self.element_type.size()
    }

    /// Capture site.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// 1-based position within the section.
    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Policy snapshot taken at push time.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Raw element buffer, `len() * element_size()` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw bytes of element `index`, if in range.
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        let size = self.element_size();
        self.data.get(index * size..(index + 1) * size)
    }

    /// Iterate over element byte slices.
    pub fn elements(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.element_size())
    }
}

/// Buffer size of a `length`-element vector.
fn byte_len(element_type: ElementType, length: usize) -> OracleResult<usize> {
    if length == 0 {
        return Err(OracleError::ZeroLength);
    }
    length
        .checked_mul(element_type.size())
        .ok_or(OracleError::LengthOverflow {
            element_type,
            length,
        })
}

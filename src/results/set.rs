//! Ordered, sectioned collection of records for one back-end run.

use super::record::{Policy, ResultRecord, SourceLocation};
use crate::element::{Element, ElementType};
use crate::error::{OracleError, OracleResult};

/// All records captured while one back-end ran one test case.
///
/// The set carries a cursor (next sequence number and the current
/// [`Policy`]). Each pushed record copies the policy, so later changes to
/// the cursor never reach records already captured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsSet {
    name: String,
    seq: u32,
    policy: Policy,
    sections: Vec<Vec<ResultRecord>>,
}

impl ResultsSet {
    /// Empty set for test case `name`, exact policy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, Policy::exact())
    }

    /// Empty set whose cursor starts at `policy`.
    pub fn with_policy(name: impl Into<String>, policy: Policy) -> Self {
        Self {
            name: name.into(),
            seq: 1,
            policy,
            sections: vec![Vec::new()],
        }
    }

    /// Reassemble a loaded set. The cursor continues after the last
    /// section's records.
    pub(crate) fn from_sections(
        name: String,
        mut sections: Vec<Vec<ResultRecord>>,
    ) -> OracleResult<Self> {
        if sections.is_empty() {
            sections.push(Vec::new());
        }
        let last = sections.len() - 1;
        let seq = u32::try_from(sections[last].len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| OracleError::SequenceOverflow {
                case: name.clone(),
                section: last,
            })?;
        Ok(Self {
            name,
            seq,
            policy: Policy::exact(),
            sections,
        })
    }

    /// Test case name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a zeroed record to the current section and return it for
    /// filling.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn push(
        &mut self,
        element_type: ElementType,
        length: usize,
        file: &str,
        line: u32,
    ) -> &mut ResultRecord {
        match self.try_push(element_type, length, file, line) {
            Ok(record) => record,
            Err(e) => panic!("cannot push result at {}:{}: {}", file, line, e),
        }
    }

    /// Checked form of [`push`](Self::push).
    pub fn try_push(
        &mut self,
        element_type: ElementType,
        length: usize,
        file: &str,
        line: u32,
    ) -> OracleResult<&mut ResultRecord> {
        let record = ResultRecord::new(
            element_type,
            length,
            SourceLocation::new(file, line),
            self.seq,
            self.policy,
        )?;
        let next = self
            .seq
            .checked_add(1)
            .ok_or_else(|| OracleError::SequenceOverflow {
                case: self.name.clone(),
                section: self.sections.len() - 1,
            })?;
        tracing::trace!(
            case = %self.name,
            section = self.sections.len() - 1,
            seq = self.seq,
            ty = %element_type,
            length,
            "push"
        );
        self.seq = next;
        let section = self.current_section_mut();
        section.push(record);
        let last = section.len() - 1;
        Ok(&mut section[last])
    }

    /// Push a whole typed vector.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn push_values<T: Element>(
        &mut self,
        values: &[T],
        file: &str,
        line: u32,
    ) -> &mut ResultRecord {
        let record = self.push(T::TYPE, values.len(), file, line);
        for (i, &v) in values.iter().enumerate() {
            record.set_value(i, v);
        }
        record
    }

    /// Allowed error for records pushed from now on.
    pub fn set_precision(&mut self, num_ulp: u32) {
        self.policy.precision_ulp = num_ulp;
    }

    /// Back to exact comparison.
    pub fn unset_precision(&mut self) {
        self.policy.precision_ulp = 0;
    }

    /// Treat `+0.0` and `-0.0` as equal for records pushed from now on.
    pub fn set_fp_zero_equal(&mut self) {
        self.policy.fp_zero_equal = true;
    }

    /// Distinguish signed zeros again.
    pub fn unset_fp_zero_equal(&mut self) {
        self.policy.fp_zero_equal = false;
    }

    /// Current cursor policy.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Restart sequence numbering at 1 without opening a section.
    pub fn reset_seq(&mut self) {
        self.seq = 1;
    }

    /// Mark a synchronization point.
    ///
    /// Closes the current section, opens a new one and resets the sequence
    /// number. Every back-end must call this at the same logical points,
    /// including ones that skipped the work in between.
    pub fn sync_archs(&mut self) {
        self.sections.push(Vec::new());
        self.reset_seq();
        tracing::debug!(
            case = %self.name,
            section = self.sections.len() - 1,
            "sync point"
        );
    }

    /// Total records across all sections.
    pub fn num_results(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }

    /// Number of sections, including the open one.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Sequence number the next push will receive.
    pub fn next_seq(&self) -> u32 {
        self.seq
    }

    /// All sections in order.
    pub fn sections(&self) -> &[Vec<ResultRecord>] {
        &self.sections
    }

    /// All records in capture order, across sections.
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.sections.iter().flatten()
    }

    fn current_section_mut(&mut self) -> &mut Vec<ResultRecord> {
        if self.sections.is_empty() {
            self.sections.push(Vec::new());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }
}

/// Push a record stamped with the caller's `file!()` and `line!()`.
///
/// ```
/// use simd_oracle::{push_result, ElementType, ResultsSet};
///
/// let mut set = ResultsSet::new("add");
/// let record = push_result!(set, ElementType::Int32, 4);
/// record.set_value(0, 7i32);
/// assert_eq!(set.num_results(), 1);
/// ```
#[macro_export]
macro_rules! push_result {
    ($set:expr, $ty:expr, $len:expr) => {
        $set.push($ty, $len, file!(), line!())
    };
}

/// Push a typed slice stamped with the caller's `file!()` and `line!()`.
#[macro_export]
macro_rules! push_values {
    ($set:expr, $values:expr) => {
        $set.push_values($values, file!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;

    #[test]
    fn test_new_set() {
        let set = ResultsSet::new("case");
        assert_eq!(set.name(), "case");
        assert_eq!(set.num_results(), 0);
        assert_eq!(set.num_sections(), 1);
        assert_eq!(set.next_seq(), 1);
    }

    #[test]
    fn test_push_assigns_sequence() {
        let mut set = ResultsSet::new("case");
        let first = set.push(ElementType::Int8, 16, "a.rs", 10).seq();
        let second = set.push(ElementType::Int8, 16, "a.rs", 11).seq();
        assert_eq!((first, second), (1, 2));
        assert_eq!(set.num_results(), 2);
    }

    #[test]
    fn test_sync_resets_sequence_and_opens_section() {
        let mut set = ResultsSet::new("case");
        set.push(ElementType::Uint32, 4, "a.rs", 1);
        set.push(ElementType::Uint32, 4, "a.rs", 2);
        set.sync_archs();
        assert_eq!(set.num_sections(), 2);
        assert_eq!(set.next_seq(), 1);
        let seq = set.push(ElementType::Uint32, 4, "a.rs", 3).seq();
        assert_eq!(seq, 1);
        assert_eq!(set.sections()[0].len(), 2);
        assert_eq!(set.sections()[1].len(), 1);
    }

    #[test]
    fn test_empty_sync_points() {
        let mut set = ResultsSet::new("case");
        set.sync_archs();
        set.sync_archs();
        assert_eq!(set.num_results(), 0);
        assert_eq!(set.num_sections(), 3);
    }

    #[test]
    fn test_policy_snapshot_is_copied() {
        let mut set = ResultsSet::new("case");
        set.set_precision(3);
        set.set_fp_zero_equal();
        set.push(ElementType::Float32, 1, "a.rs", 1);
        set.unset_precision();
        set.unset_fp_zero_equal();
        set.push(ElementType::Float32, 1, "a.rs", 2);

        let records: Vec<_> = set.records().collect();
        assert_eq!(
            records[0].policy(),
            Policy {
                precision_ulp: 3,
                fp_zero_equal: true
            }
        );
        assert_eq!(records[1].policy(), Policy::exact());
        assert_eq!(set.policy(), Policy::exact());
    }

    #[test]
    fn test_with_policy() {
        let mut set = ResultsSet::with_policy("case", Policy::with_precision(2));
        let policy = set.push(ElementType::Float64, 2, "a.rs", 1).policy();
        assert_eq!(policy.precision_ulp, 2);
    }

    #[test]
    fn test_try_push_zero_length() {
        let mut set = ResultsSet::new("case");
        assert!(matches!(
            set.try_push(ElementType::Int8, 0, "a.rs", 1),
            Err(OracleError::ZeroLength)
        ));
        assert_eq!(set.num_results(), 0);
        assert_eq!(set.next_seq(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot push result")]
    fn test_push_zero_length_panics() {
        let mut set = ResultsSet::new("case");
        set.push(ElementType::Int8, 0, "a.rs", 1);
    }

    #[test]
    fn test_push_values() {
        let mut set = ResultsSet::new("case");
        let record = set.push_values(&[1.0f32, 2.0, 3.0], "a.rs", 1);
        assert_eq!(record.element_type(), ElementType::Float32);
        assert_eq!(record.len(), 3);
        assert_eq!(record.element(2), Some(&3.0f32.to_ne_bytes()[..]));
    }

    #[test]
    fn test_macros_record_location() {
        let mut set = ResultsSet::new("case");
        let line = line!() + 1;
        let record = push_result!(set, ElementType::Int16, 8);
        assert_eq!(record.location().line, line);
        assert!(record.location().file.ends_with("set.rs"));
        push_values!(set, &[1u64, 2]);
        assert_eq!(set.num_results(), 2);
    }

    #[test]
    fn test_from_sections_cursor() {
        let mut set = ResultsSet::new("case");
        set.push(ElementType::Int8, 1, "a.rs", 1);
        set.sync_archs();
        set.push(ElementType::Int8, 1, "a.rs", 2);
        set.push(ElementType::Int8, 1, "a.rs", 3);
        let rebuilt =
            ResultsSet::from_sections("case".to_string(), set.sections().to_vec()).unwrap();
        assert_eq!(rebuilt.next_seq(), 3);
        assert_eq!(rebuilt.num_sections(), 2);

        let empty = ResultsSet::from_sections("e".to_string(), Vec::new()).unwrap();
        assert_eq!(empty.num_sections(), 1);
    }

    #[test]
    fn test_sequence_overflow_is_an_error() {
        let mut set = ResultsSet::new("case");
        set.seq = u32::MAX;
        let err = set.try_push(ElementType::Int8, 1, "a.rs", 1).unwrap_err();
        assert!(matches!(err, OracleError::SequenceOverflow { section: 0, .. }));
        assert_eq!(set.num_results(), 0);
    }
}

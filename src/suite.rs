//! Pass/fail tally over many comparisons.

/// Aggregates comparison verdicts into a suite verdict.
///
/// Purely additive, so the order in which verdicts arrive does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuite {
    num_success: usize,
    num_failure: usize,
    failures: Vec<String>,
}

impl TestSuite {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one verdict.
    pub fn add_result(&mut self, success: bool) {
        if success {
            self.num_success += 1;
        } else {
            self.num_failure += 1;
        }
    }

    /// Count one verdict and remember the name of a failing test case.
    pub fn record(&mut self, name: &str, success: bool) {
        self.add_result(success);
        if !success {
            self.failures.push(name.to_string());
        }
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: TestSuite) {
        self.num_success += other.num_success;
        self.num_failure += other.num_failure;
        self.failures.extend(other.failures);
    }

    /// Passing verdicts.
    pub fn num_success(&self) -> usize {
        self.num_success
    }

    /// Failing verdicts.
    pub fn num_failure(&self) -> usize {
        self.num_failure
    }

    /// All verdicts.
    pub fn total(&self) -> usize {
        self.num_success + self.num_failure
    }

    /// Names passed to [`record`](Self::record) with a failing verdict.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// True iff no failure was counted.
    pub fn success(&self) -> bool {
        self.num_failure == 0
    }

    /// Format a summary string.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed (total: {})",
            self.num_success,
            self.num_failure,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_suite_succeeds() {
        let suite = TestSuite::new();
        assert!(suite.success());
        assert_eq!(suite.total(), 0);
    }

    #[test]
    fn test_counts() {
        let mut suite = TestSuite::new();
        suite.add_result(true);
        suite.add_result(true);
        suite.add_result(false);

        assert_eq!(suite.num_success(), 2);
        assert_eq!(suite.num_failure(), 1);
        assert!(!suite.success());
        assert_eq!(suite.summary(), "2 passed, 1 failed (total: 3)");
    }

    #[test]
    fn test_record_and_merge() {
        let mut a = TestSuite::new();
        a.record("shuffle", true);
        a.record("permute_bytes16", false);

        let mut b = TestSuite::new();
        b.record("blend", false);

        a.merge(b);
        assert_eq!(a.total(), 3);
        assert_eq!(a.failures(), ["permute_bytes16", "blend"]);
    }
}

//! Per-back-end collections of results sets.
//!
//! One [`ArchResults`] holds every test case a single back-end ran.
//! [`compare_archs`] pairs the test cases of two back-ends by name and
//! feeds each comparison verdict into a [`TestSuite`].

use crate::compare::{Comparator, CompareOptions, Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::results::{Policy, ResultsSet};
use crate::suite::TestSuite;

/// All results sets captured for one back-end, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchResults {
    arch: String,
    cases: Vec<ResultsSet>,
}

impl ArchResults {
    /// Empty collection for back-end `arch`.
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            cases: Vec::new(),
        }
    }

    pub(crate) fn from_cases(arch: String, cases: Vec<ResultsSet>) -> Self {
        Self { arch, cases }
    }

    /// Back-end label.
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Results set for test case `name`, created on first use.
    pub fn new_test_case(&mut self, name: &str) -> &mut ResultsSet {
        self.new_test_case_with_policy(name, Policy::exact())
    }

    /// Like [`new_test_case`](Self::new_test_case) with a starting policy.
    /// The policy only applies when the case is created.
    pub fn new_test_case_with_policy(&mut self, name: &str, policy: Policy) -> &mut ResultsSet {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                tracing::debug!(arch = %self.arch, case = name, "new test case");
                self.cases.push(ResultsSet::with_policy(name, policy));
                self.cases.len() - 1
            }
        };
        &mut self.cases[index]
    }

    /// Results set for test case `name`.
    pub fn get(&self, name: &str) -> Option<&ResultsSet> {
        self.position(name).map(|i| &self.cases[i])
    }

    /// Test cases in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResultsSet> {
        self.cases.iter()
    }

    /// Number of test cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True if no test case was created.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Records across all test cases.
    pub fn num_results(&self) -> usize {
        self.cases.iter().map(ResultsSet::num_results).sum()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.cases.iter().position(|c| c.name() == name)
    }
}

impl<'a> IntoIterator for &'a ArchResults {
    type Item = &'a ResultsSet;
    type IntoIter = std::slice::Iter<'a, ResultsSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compare every test case of `other` against `reference`.
///
/// Each test case contributes one verdict to `suite`. A case present on
/// only one side is a structural diagnostic and a failing verdict. Returns
/// true if every case matched.
#[tracing::instrument(skip_all, fields(reference = %reference.arch(), other = %other.arch()))]
pub fn compare_archs<S: DiagnosticSink + ?Sized>(
    reference: &ArchResults,
    other: &ArchResults,
    options: CompareOptions,
    sink: &mut S,
    suite: &mut TestSuite,
) -> bool {
    let comparator = Comparator::new(options);
    let mut all_ok = true;

    for case in reference {
        let ok = match other.get(case.name()) {
            Some(theirs) => {
                comparator.compare(case, reference.arch(), theirs, other.arch(), sink)
            }
            None => {
                sink.report(missing(case.name(), reference, other, other.arch()));
                false
            }
        };
        suite.record(case.name(), ok);
        all_ok &= ok;
    }

    for case in other.iter().filter(|c| reference.get(c.name()).is_none()) {
        sink.report(missing(case.name(), reference, other, reference.arch()));
        suite.record(case.name(), false);
        all_ok = false;
    }

    tracing::info!(summary = %suite.summary(), "arch comparison finished");
    all_ok
}

fn missing(case: &str, reference: &ArchResults, other: &ArchResults, from: &str) -> Diagnostic {
    tracing::warn!(case, missing_from = from, "test case missing");
    Diagnostic {
        case: case.to_string(),
        a_arch: reference.arch().to_string(),
        b_arch: other.arch().to_string(),
        kind: DiagnosticKind::MissingCase {
            missing_from: from.to_string(),
        },
    }
}

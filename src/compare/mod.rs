//! Comparison of two back-ends' results sets.
//!
//! The comparator walks both sets in lockstep, section by section and record
//! by record, and reports every structural and numeric difference it finds
//! to a [`DiagnosticSink`]. Differences are data, not errors: the walk never
//! stops early except when the section counts disagree, since nothing after
//! that point can be aligned.

mod diagnostic;
mod options;

pub use diagnostic::{
    Category, Diagnostic, DiagnosticKind, DiagnosticSink, RecordSite, TextSink,
};
pub use options::{CompareOptions, ToleranceRule};

use crate::element::{ne_array, ElementType, UlpFloat};
use crate::results::{ResultRecord, ResultsSet};

/// Compare two results sets with default options.
///
/// Returns true if no mismatch was reported.
pub fn results_equal<S: DiagnosticSink + ?Sized>(
    a: &ResultsSet,
    a_arch: &str,
    b: &ResultsSet,
    b_arch: &str,
    sink: &mut S,
) -> bool {
    Comparator::default().compare(a, a_arch, b, b_arch, sink)
}

/// Element-wise comparator for results sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    options: CompareOptions,
}

/// Labels shared by every diagnostic of one comparison.
struct Labels<'a> {
    case: &'a str,
    a_arch: &'a str,
    b_arch: &'a str,
}

impl Labels<'_> {
    fn diagnostic(&self, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            case: self.case.to_string(),
            a_arch: self.a_arch.to_string(),
            b_arch: self.b_arch.to_string(),
            kind,
        }
    }
}

impl Comparator {
    /// Comparator with the given options.
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> CompareOptions {
        self.options
    }

    /// Compare `a` (labelled `a_arch`) against `b` (labelled `b_arch`).
    ///
    /// Returns true if no mismatch was reported to `sink`.
    #[tracing::instrument(skip_all, fields(case = %a.name(), a_arch = %a_arch, b_arch = %b_arch))]
    pub fn compare<S: DiagnosticSink + ?Sized>(
        &self,
        a: &ResultsSet,
        a_arch: &str,
        b: &ResultsSet,
        b_arch: &str,
        sink: &mut S,
    ) -> bool {
        let labels = Labels {
            case: a.name(),
            a_arch,
            b_arch,
        };

        if a.num_sections() != b.num_sections() {
            tracing::warn!(
                a = a.num_sections(),
                b = b.num_sections(),
                "section count mismatch"
            );
            sink.report(labels.diagnostic(DiagnosticKind::SectionCount {
                a: a.num_sections(),
                b: b.num_sections(),
            }));
            return false;
        }

        let mut compared = 0usize;
        let mut mismatches = 0usize;
        for (section, (sa, sb)) in a.sections().iter().zip(b.sections()).enumerate() {
            if sa.len() != sb.len() {
                tracing::warn!(section, a = sa.len(), b = sb.len(), "record count mismatch");
                sink.report(labels.diagnostic(DiagnosticKind::RecordCount {
                    section,
                    a: sa.len(),
                    b: sb.len(),
                }));
                mismatches += 1;
                continue;
            }
            tracing::debug!(section, records = sa.len(), "comparing section");
            for (ra, rb) in sa.iter().zip(sb) {
                compared += 1;
                mismatches += self.compare_records(&labels, section, ra, rb, sink);
            }
        }

        tracing::info!(compared, mismatches, "comparison finished");
        mismatches == 0
    }

    /// Compare one aligned record pair, returning the number of diagnostics.
    fn compare_records<S: DiagnosticSink + ?Sized>(
        &self,
        labels: &Labels<'_>,
        section: usize,
        a: &ResultRecord,
        b: &ResultRecord,
        sink: &mut S,
    ) -> usize {
        let site = || RecordSite {
            location: a.location().clone(),
            section,
            seq: a.seq(),
        };

        if a.element_type() != b.element_type() {
            sink.report(labels.diagnostic(DiagnosticKind::TypeMismatch {
                site: site(),
                a: a.element_type(),
                b: b.element_type(),
            }));
            return 1;
        }
        if a.len() != b.len() {
            sink.report(labels.diagnostic(DiagnosticKind::LengthMismatch {
                site: site(),
                a: a.len(),
                b: b.len(),
            }));
            return 1;
        }

        let ty = a.element_type();
        let (pa, pb) = (a.policy(), b.policy());
        let tolerance = self
            .options
            .tolerance
            .combine(pa.precision_ulp, pb.precision_ulp);
        let rule = FloatRule {
            tolerance,
            zero_equal: pa.fp_zero_equal || pb.fp_zero_equal,
            nan_equal: self.options.nan_equal,
        };

        let mut reported = 0;
        for (index, (ea, eb)) in a.elements().zip(b.elements()).enumerate() {
            let ulp = match ty {
                ElementType::Float32 => {
                    let (x, y) = (
                        f32::from_ne_bytes(ne_array(ea)),
                        f32::from_ne_bytes(ne_array(eb)),
                    );
                    match rule.check(x, y) {
                        Ok(()) => continue,
                        Err(ulp) => Some(ulp),
                    }
                }
                ElementType::Float64 => {
                    let (x, y) = (
                        f64::from_ne_bytes(ne_array(ea)),
                        f64::from_ne_bytes(ne_array(eb)),
                    );
                    match rule.check(x, y) {
                        Ok(()) => continue,
                        Err(ulp) => Some(ulp),
                    }
                }
                _ if ea == eb => continue,
                _ => None,
            };
            sink.report(labels.diagnostic(DiagnosticKind::Element {
                site: site(),
                index,
                a: ty.format_element(ea),
                b: ty.format_element(eb),
                ulp,
                tolerance: ulp.map(|_| tolerance),
            }));
            reported += 1;
        }
        reported
    }
}

/// Floating-point equality rule for one record pair.
#[derive(Debug, Clone, Copy)]
struct FloatRule {
    tolerance: u32,
    zero_equal: bool,
    nan_equal: bool,
}

impl FloatRule {
    /// `Ok` if equal, otherwise `Err` with the ULP distance.
    fn check<F: UlpFloat>(&self, a: F, b: F) -> Result<(), u64> {
        if a.is_nan_value() || b.is_nan_value() {
            return if self.nan_equal && a.is_nan_value() && b.is_nan_value() {
                Ok(())
            } else {
                Err(u64::MAX)
            };
        }
        if a.is_zero() && b.is_zero() {
            return if self.zero_equal || a.sign_bit() == b.sign_bit() {
                Ok(())
            } else {
                Err(0)
            };
        }
        if a.bits_eq(b) {
            return Ok(());
        }
        let ulp = a.ulp_distance(b);
        if ulp <= u64::from(self.tolerance) {
            Ok(())
        } else {
            Err(ulp)
        }
    }
}

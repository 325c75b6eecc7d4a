//! Mismatch diagnostics and the sinks that collect them.

use crate::element::ElementType;
use crate::results::SourceLocation;
use serde::Serialize;
use std::fmt;
use std::io;

/// Broad class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Section or record counts diverge, or a test case is missing. Points
    /// at harness alignment, not at a computation.
    Structure,
    /// Aligned records disagree on type or length.
    Record,
    /// An element value differs beyond tolerance.
    Value,
}

/// Position of an aligned record pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSite {
    /// Capture site of the first set's record.
    pub location: SourceLocation,
    /// 0-based section index.
    pub section: usize,
    /// 1-based sequence number within the section.
    pub seq: u32,
}

impl fmt::Display for RecordSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} section {} seq {}",
            self.location, self.section, self.seq
        )
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The sets have different section counts.
    SectionCount {
        /// Sections in the first set.
        a: usize,
        /// Sections in the second set.
        b: usize,
    },
    /// A section holds a different number of records on each side.
    RecordCount {
        /// 0-based section index.
        section: usize,
        /// Records on the first side.
        a: usize,
        /// Records on the second side.
        b: usize,
    },
    /// A test case exists for only one back-end.
    MissingCase {
        /// Label of the back-end lacking the case.
        missing_from: String,
    },
    /// Element types differ.
    TypeMismatch {
        /// Record position.
        site: RecordSite,
        /// First side's type.
        a: ElementType,
        /// Second side's type.
        b: ElementType,
    },
    /// Vector lengths differ.
    LengthMismatch {
        /// Record position.
        site: RecordSite,
        /// First side's length.
        a: usize,
        /// Second side's length.
        b: usize,
    },
    /// One element differs.
    Element {
        /// Record position.
        site: RecordSite,
        /// Element index.
        index: usize,
        /// First side's value.
        a: String,
        /// Second side's value.
        b: String,
        /// ULP distance, for floating-point records.
        ulp: Option<u64>,
        /// Tolerance in effect, for floating-point records.
        tolerance: Option<u32>,
    },
}

/// One reported mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Test case name.
    pub case: String,
    /// Label of the first back-end.
    pub a_arch: String,
    /// Label of the second back-end.
    pub b_arch: String,
    /// Details.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Broad class of this diagnostic.
    pub fn category(&self) -> Category {
        match self.kind {
            DiagnosticKind::SectionCount { .. }
            | DiagnosticKind::RecordCount { .. }
            | DiagnosticKind::MissingCase { .. } => Category::Structure,
            DiagnosticKind::TypeMismatch { .. } | DiagnosticKind::LengthMismatch { .. } => {
                Category::Record
            }
            DiagnosticKind::Element { .. } => Category::Value,
        }
    }

    /// True for harness-alignment problems.
    pub fn is_structural(&self) -> bool {
        self.category() == Category::Structure
    }

    fn tag(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::SectionCount { .. }
            | DiagnosticKind::RecordCount { .. }
            | DiagnosticKind::MissingCase { .. } => "[STRUCTURE]",
            DiagnosticKind::TypeMismatch { .. } => "[TYPE]",
            DiagnosticKind::LengthMismatch { .. } => "[LENGTH]",
            DiagnosticKind::Element { .. } => "[VALUE]",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} vs {}",
            self.tag(),
            self.case,
            self.a_arch,
            self.b_arch
        )?;
        match &self.kind {
            DiagnosticKind::SectionCount { a, b } => {
                write!(f, ": section count differs: {} vs {}", a, b)
            }
            DiagnosticKind::RecordCount { section, a, b } => write!(
                f,
                ": section {} record count differs: {} vs {}",
                section, a, b
            ),
            DiagnosticKind::MissingCase { missing_from } => {
                write!(f, ": test case missing from {}", missing_from)
            }
            DiagnosticKind::TypeMismatch { site, a, b } => {
                write!(f, " at {}: type {} vs {}", site, a, b)
            }
            DiagnosticKind::LengthMismatch { site, a, b } => {
                write!(f, " at {}: length {} vs {}", site, a, b)
            }
            DiagnosticKind::Element {
                site,
                index,
                a,
                b,
                ulp,
                tolerance,
            } => {
                write!(f, " at {} element {}: {} vs {}", site, index, a, b)?;
                match (ulp, tolerance) {
                    (Some(u64::MAX), Some(t)) => write!(f, " (ulp nan, tolerance {})", t),
                    (Some(u), Some(t)) => write!(f, " (ulp {}, tolerance {})", u, t),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Destination for diagnostics. Appends must preserve order.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// One line per diagnostic.
impl DiagnosticSink for String {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push_str(&diagnostic.to_string());
        self.push('\n');
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Writes one line per diagnostic to an [`io::Write`].
///
/// The first write error is kept and later diagnostics are dropped.
pub struct TextSink<W: io::Write> {
    writer: W,
    lines: usize,
    error: Option<io::Error>,
}

impl<W: io::Write> TextSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            error: None,
        }
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Return the writer, or the first error encountered.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.writer),
        }
    }
}

impl<W: io::Write> DiagnosticSink for TextSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.writer, "{}", diagnostic) {
            Ok(()) => self.lines += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> RecordSite {
        RecordSite {
            location: SourceLocation::new("permute.rs", 42),
            section: 1,
            seq: 3,
        }
    }

    fn diag(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            case: "permute_bytes16".to_string(),
            a_arch: "sse2".to_string(),
            b_arch: "neon".to_string(),
            kind,
        }
    }

    #[test]
    fn test_structural_line() {
        let d = diag(DiagnosticKind::SectionCount { a: 3, b: 2 });
        assert!(d.is_structural());
        assert_eq!(
            d.to_string(),
            "[STRUCTURE] permute_bytes16: sse2 vs neon: section count differs: 3 vs 2"
        );
    }

    #[test]
    fn test_element_line() {
        let d = diag(DiagnosticKind::Element {
            site: site(),
            index: 3,
            a: "4.0".to_string(),
            b: "5.0".to_string(),
            ulp: Some(2_097_152),
            tolerance: Some(0),
        });
        assert_eq!(d.category(), Category::Value);
        assert_eq!(
            d.to_string(),
            "[VALUE] permute_bytes16: sse2 vs neon at permute.rs:42 section 1 seq 3 \
             element 3: 4.0 vs 5.0 (ulp 2097152, tolerance 0)"
        );
    }

    #[test]
    fn test_integer_element_line_has_no_ulp() {
        let d = diag(DiagnosticKind::Element {
            site: site(),
            index: 0,
            a: "1".to_string(),
            b: "2".to_string(),
            ulp: None,
            tolerance: None,
        });
        assert!(d.to_string().ends_with("element 0: 1 vs 2"));
    }

    #[test]
    fn test_record_categories() {
        let t = diag(DiagnosticKind::TypeMismatch {
            site: site(),
            a: ElementType::Float32,
            b: ElementType::Int32,
        });
        assert_eq!(t.category(), Category::Record);
        assert!(t.to_string().starts_with("[TYPE]"));
        assert!(t.to_string().contains("type float32 vs int32"));

        let l = diag(DiagnosticKind::LengthMismatch {
            site: site(),
            a: 4,
            b: 8,
        });
        assert!(l.to_string().starts_with("[LENGTH]"));
    }

    #[test]
    fn test_string_sink() {
        let mut out = String::new();
        out.report(diag(DiagnosticKind::MissingCase {
            missing_from: "neon".to_string(),
        }));
        assert_eq!(
            out,
            "[STRUCTURE] permute_bytes16: sse2 vs neon: test case missing from neon\n"
        );
    }

    #[test]
    fn test_text_sink() {
        let mut sink = TextSink::new(Vec::new());
        sink.report(diag(DiagnosticKind::SectionCount { a: 1, b: 2 }));
        sink.report(diag(DiagnosticKind::RecordCount {
            section: 0,
            a: 1,
            b: 2,
        }));
        assert_eq!(sink.lines(), 2);
        let bytes = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_json_shape() {
        let d = diag(DiagnosticKind::RecordCount {
            section: 2,
            a: 4,
            b: 3,
        });
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "record_count");
        assert_eq!(json["section"], 2);
        assert_eq!(json["a_arch"], "sse2");
    }
}

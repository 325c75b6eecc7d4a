//! Mismatch report for a comparison run.

use crate::compare::{Category, Diagnostic};
use crate::error::{OracleError, OracleResult};
use serde::Serialize;
use std::path::Path;

/// Everything needed to read back what diverged between two back-ends.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchReport {
    /// Reference back-end label.
    pub reference: String,
    /// Back-end compared against the reference.
    pub other: String,
    /// Suite verdict summary, e.g. `3 passed, 1 failed (total: 4)`.
    pub summary: String,
    /// Diagnostics in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl MismatchReport {
    /// Create a report.
    pub fn new(
        reference: impl Into<String>,
        other: impl Into<String>,
        summary: impl Into<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            reference: reference.into(),
            other: other.into(),
            summary: summary.into(),
            diagnostics,
        }
    }

    /// Diagnostics of one category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.category() == category)
    }

    /// True if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Format as a human-readable report.
    ///
    /// Structural problems come first since they usually explain the value
    /// differences that follow them.
    pub fn to_report(&self) -> String {
        let mut out = format!(
            "=== Back-end Mismatch Report ===\nReference: {}\nOther: {}\nResult: {}\n",
            self.reference, self.other, self.summary
        );
        let sections = [
            (Category::Structure, "Structural mismatches"),
            (Category::Record, "Record mismatches"),
            (Category::Value, "Value mismatches"),
        ];
        for (category, title) in sections {
            let lines: Vec<String> = self.by_category(category).map(ToString::to_string).collect();
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{} ({}):\n", title, lines.len()));
            for line in lines {
                out.push_str("  ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Format as JSON for machine parsing.
    pub fn to_json(&self) -> OracleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the text report to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> OracleResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_report()).map_err(|source| OracleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{DiagnosticKind, RecordSite};
    use crate::results::SourceLocation;

    fn report() -> MismatchReport {
        let base = |kind| Diagnostic {
            case: "permute_bytes16".to_string(),
            a_arch: "sse3".to_string(),
            b_arch: "ssse3".to_string(),
            kind,
        };
        MismatchReport::new(
            "sse3",
            "ssse3",
            "0 passed, 1 failed (total: 1)",
            vec![
                base(DiagnosticKind::Element {
                    site: RecordSite {
                        location: SourceLocation::new("permute.rs", 7),
                        section: 1,
                        seq: 1,
                    },
                    index: 2,
                    a: "3".to_string(),
                    b: "0".to_string(),
                    ulp: None,
                    tolerance: None,
                }),
                base(DiagnosticKind::RecordCount {
                    section: 0,
                    a: 2,
                    b: 0,
                }),
            ],
        )
    }

    #[test]
    fn test_report_orders_structure_first() {
        let text = report().to_report();
        assert!(text.contains("Reference: sse3"));
        let structure = text.find("Structural mismatches (1)").unwrap();
        let values = text.find("Value mismatches (1)").unwrap();
        assert!(structure < values);
        assert!(!text.contains("Record mismatches"));
    }

    #[test]
    fn test_report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reference"], "sse3");
        assert_eq!(value["diagnostics"][0]["kind"], "element");
        assert_eq!(value["diagnostics"][1]["kind"], "record_count");
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        report().save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== Back-end Mismatch Report ==="));
    }
}

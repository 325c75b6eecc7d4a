//! Comparator configuration.

use serde::{Deserialize, Serialize};

/// How two records' ULP tolerances combine into one budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceRule {
    /// The looser of the two declared tolerances. Either back-end may be the
    /// one that needs the slack.
    #[default]
    Loosest,
    /// The stricter of the two declared tolerances.
    Strictest,
}

impl ToleranceRule {
    /// Combine the tolerances declared by the two sides.
    pub fn combine(self, a: u32, b: u32) -> u32 {
        match self {
            ToleranceRule::Loosest => a.max(b),
            ToleranceRule::Strictest => a.min(b),
        }
    }
}

/// Options controlling element comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Tolerance combination rule for floating-point records.
    pub tolerance: ToleranceRule,
    /// Treat NaN and NaN as equal regardless of payload. Off by default.
    /// NaN against a number is always a mismatch.
    pub nan_equal: bool,
}

impl CompareOptions {
    /// Looser tolerance, any NaN is a mismatch.
    pub const fn new() -> Self {
        Self {
            tolerance: ToleranceRule::Loosest,
            nan_equal: false,
        }
    }

    /// Stricter tolerance, any NaN is a mismatch.
    pub const fn strict() -> Self {
        Self {
            tolerance: ToleranceRule::Strictest,
            nan_equal: false,
        }
    }

    /// Let two NaNs compare equal.
    pub const fn with_nan_equal(self, nan_equal: bool) -> Self {
        Self {
            tolerance: self.tolerance,
            nan_equal,
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        assert_eq!(ToleranceRule::Loosest.combine(0, 2), 2);
        assert_eq!(ToleranceRule::Loosest.combine(5, 2), 5);
        assert_eq!(ToleranceRule::Strictest.combine(0, 2), 0);
        assert_eq!(ToleranceRule::Strictest.combine(5, 2), 2);
    }

    #[test]
    fn test_defaults() {
        let opts = CompareOptions::default();
        assert_eq!(opts, CompareOptions::new());
        assert_eq!(opts.tolerance, ToleranceRule::Loosest);
        assert!(!opts.nan_equal);
        assert!(!CompareOptions::strict().nan_equal);

        let strict = CompareOptions::strict().with_nan_equal(true);
        assert_eq!(strict.tolerance, ToleranceRule::Strictest);
        assert!(strict.nan_equal);
    }
}

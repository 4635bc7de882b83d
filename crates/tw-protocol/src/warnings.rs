use serde::{Deserialize, Serialize};

use crate::weights::fmt_decimal;

/// Why a raw weight had to be adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    /// Below zero, clamped to 0.
    Negative,
    /// Above one, clamped to 1.
    AboveOne,
}

/// Record of one weight that fell outside `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub parameter: String,
    pub original: f64,
    pub reason: WarningReason,
}

impl ValidationWarning {
    /// Value the weight was clamped to.
    pub fn adjusted_to(&self) -> f64 {
        match self.reason {
            WarningReason::Negative => 0.0,
            WarningReason::AboveOne => 1.0,
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.reason {
            WarningReason::Negative => "was negative",
            WarningReason::AboveOne => "exceeded 1",
        };
        write!(
            f,
            "Weight for {} ({}) {}. Adjusted to {}.",
            self.parameter,
            fmt_decimal(self.original),
            what,
            self.adjusted_to() as i64
        )
    }
}

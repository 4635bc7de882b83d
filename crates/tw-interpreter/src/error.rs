//! Error taxonomy for the interpreter pipeline.

use thiserror::Error;
use tw_protocol::{UnknownWeightKey, WeightKey};

/// Failures that escape the core. Per-capture match misses never show up
/// here; they are dropped where they happen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrafficError {
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("total weight must be positive (got {total})")]
    NonPositiveTotal { total: f64 },

    #[error("invalid parameter: {name}. Valid parameters are {valid:?}")]
    InvalidParameter { name: String, valid: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("optimizer service error: {0}")]
    Upstream(String),
}

/// Convenience alias for interpreter results.
pub type TrafficResult<T> = Result<T, TrafficError>;

impl TrafficError {
    /// Short machine-readable class name (used in logs and API errors).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownPriority(_) => "unknown_priority",
            Self::NonPositiveTotal { .. } => "non_positive_total",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::InvalidInput(_) => "invalid_input",
            Self::Upstream(_) => "upstream_service",
        }
    }

    /// User-facing sentence for a failed turn.
    pub fn apology(&self) -> String {
        match self {
            Self::UnknownPriority(label) => format!(
                "Sorry, I don't recognise the priority level '{label}'. \
                 Please use very low, low, medium, high or very high."
            ),
            Self::NonPositiveTotal { .. } => "Sorry, I couldn't balance those weights: \
                 at least one parameter needs a weight above zero."
                .to_string(),
            Self::InvalidParameter { name, valid } => format!(
                "Sorry, '{name}' is not a parameter I can optimize. Valid parameters are: {}.",
                valid.join(", ")
            ),
            Self::InvalidInput(reason) => format!(
                "Sorry, I couldn't read the weights you provided ({reason}). \
                 Please provide parameters like {{\"weight_PublicTransport\": 0.4}}."
            ),
            Self::Upstream(_) => "Sorry, the traffic optimization service is unavailable right now. \
                 Please try again in a moment."
                .to_string(),
        }
    }
}

impl From<UnknownWeightKey> for TrafficError {
    fn from(err: UnknownWeightKey) -> Self {
        Self::InvalidParameter {
            name: err.0,
            valid: WeightKey::canonical_names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

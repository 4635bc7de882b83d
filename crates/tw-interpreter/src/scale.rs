//! Qualitative priority tiers and their numeric intervals.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tw_protocol::round2;

use crate::error::{TrafficError, TrafficResult};

/// Ordered priority tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 5] = [
        PriorityLevel::VeryLow,
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
        PriorityLevel::VeryHigh,
    ];

    /// Fixed `[lo, hi]` interval for the tier. Bounds are given constants,
    /// adjacent tiers are not guaranteed to be disjoint.
    pub fn interval(&self) -> (f64, f64) {
        match self {
            Self::VeryLow => (0.1, 0.29),
            Self::Low => (0.3, 0.49),
            Self::Medium => (0.5, 0.69),
            Self::High => (0.7, 0.89),
            Self::VeryHigh => (0.9, 1.0),
        }
    }

    /// English label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }

    /// Interval midpoint rounded to two decimals.
    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.interval();
        round2((lo + hi) / 2.0)
    }
}

/// How a tier turns into a single weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// Interval midpoint; same label always gives the same weight.
    #[default]
    Midpoint,
    /// Uniform draw inside the interval, rounded to two decimals.
    Uniform,
}

impl std::str::FromStr for SamplingStrategy {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midpoint" => Ok(Self::Midpoint),
            "uniform" | "random" => Ok(Self::Uniform),
            other => Err(TrafficError::InvalidInput(format!(
                "unknown sampling strategy '{other}'"
            ))),
        }
    }
}

/// Label lookup table bound to a sampling strategy.
#[derive(Debug, Clone)]
pub struct PriorityScale {
    labels: Vec<(String, PriorityLevel)>,
    sampling: SamplingStrategy,
}

impl PriorityScale {
    pub fn new(
        labels: impl IntoIterator<Item = (String, PriorityLevel)>,
        sampling: SamplingStrategy,
    ) -> Self {
        let labels = labels
            .into_iter()
            .map(|(label, level)| (label.trim().to_lowercase(), level))
            .collect();
        Self { labels, sampling }
    }

    /// The five English labels, midpoint sampling.
    pub fn english() -> Self {
        Self::new(
            PriorityLevel::ALL.map(|level| (level.label().to_string(), level)),
            SamplingStrategy::Midpoint,
        )
    }

    pub fn sampling(&self) -> SamplingStrategy {
        self.sampling
    }

    /// Known labels, in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|(label, _)| label.as_str())
    }

    /// Case-insensitive label lookup.
    pub fn level(&self, label: &str) -> TrafficResult<PriorityLevel> {
        let wanted = label.trim().to_lowercase();
        self.labels
            .iter()
            .find(|(known, _)| *known == wanted)
            .map(|(_, level)| *level)
            .ok_or_else(|| TrafficError::UnknownPriority(label.to_string()))
    }

    pub fn resolve_interval(&self, label: &str) -> TrafficResult<(f64, f64)> {
        Ok(self.level(label)?.interval())
    }

    /// Weight for a label under the configured strategy.
    pub fn sample(&self, label: &str) -> TrafficResult<f64> {
        let level = self.level(label)?;
        Ok(match self.sampling {
            SamplingStrategy::Midpoint => level.midpoint(),
            SamplingStrategy::Uniform => {
                let (lo, hi) = level.interval();
                round2(rand::thread_rng().gen_range(lo..=hi))
            }
        })
    }
}

impl Default for PriorityScale {
    fn default() -> Self {
        Self::english()
    }
}

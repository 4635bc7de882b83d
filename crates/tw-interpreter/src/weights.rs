//! Clamping, normalization and the explicit-weights pipeline.

use serde::Serialize;
use serde_json::Value;
use tw_protocol::{ValidationWarning, WarningReason, WeightVector, round2};

use crate::error::{TrafficError, TrafficResult};

/// Clamp one weight into `[0, 1]`, reporting what was changed.
pub fn clamp_weight(name: &str, value: f64) -> (f64, Option<ValidationWarning>) {
    let reason = if value < 0.0 {
        WarningReason::Negative
    } else if value > 1.0 {
        WarningReason::AboveOne
    } else {
        return (value, None);
    };
    let warning = ValidationWarning {
        parameter: name.to_string(),
        original: value,
        reason,
    };
    (warning.adjusted_to(), Some(warning))
}

/// Clamp every weight; warnings come out in canonical key order.
pub fn validate(weights: &WeightVector) -> (WeightVector, Vec<ValidationWarning>) {
    let mut warnings = Vec::new();
    let validated = weights.map(|key, value| {
        let (clamped, warning) = clamp_weight(key.as_str(), value);
        warnings.extend(warning);
        clamped
    });
    (validated, warnings)
}

/// Rescale so the weights sum to one, each rounded to two decimals.
///
/// The rounded sum may drift from 1.00 by a couple of hundredths; that is
/// left as is.
pub fn normalize(weights: &WeightVector) -> TrafficResult<WeightVector> {
    let total = weights.total();
    if total <= 0.0 || total.is_nan() {
        return Err(TrafficError::NonPositiveTotal { total });
    }
    Ok(weights.map(|_, value| round2(value / total)))
}

/// Every stage of the weight pipeline, kept for logging and API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedWeights {
    pub raw: WeightVector,
    pub validated: WeightVector,
    pub normalized: WeightVector,
    pub warnings: Vec<ValidationWarning>,
}

impl PreparedWeights {
    /// Warnings rendered as user-facing sentences.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Validate then normalize an already-built vector.
pub fn prepare_vector(raw: WeightVector) -> TrafficResult<PreparedWeights> {
    let (validated, warnings) = validate(&raw);
    let normalized = normalize(&validated)?;
    tracing::debug!(
        raw = ?raw,
        normalized = ?normalized,
        warnings = warnings.len(),
        "prepared weights"
    );
    Ok(PreparedWeights {
        raw,
        validated,
        normalized,
        warnings,
    })
}

/// Pipeline entry for a decoded JSON object of weights.
///
/// Missing keys take the default weight; keys outside the canonical four
/// are rejected.
pub fn prepare_weights_value(value: &Value) -> TrafficResult<PreparedWeights> {
    let Some(object) = value.as_object() else {
        return Err(TrafficError::InvalidInput(
            "expected a JSON object of weights".into(),
        ));
    };

    let mut entries = Vec::with_capacity(object.len());
    for (name, raw) in object {
        let number = raw.as_f64().ok_or_else(|| {
            TrafficError::InvalidInput(format!("weight '{name}' is not a number"))
        })?;
        entries.push((name.as_str(), number));
    }

    let raw = WeightVector::from_named(entries)?;
    prepare_vector(raw)
}

/// Pipeline entry for a JSON string, as sent by a tool call.
pub fn prepare_weights(json: &str) -> TrafficResult<PreparedWeights> {
    if json.trim().is_empty() {
        return Err(TrafficError::InvalidInput("empty weight input".into()));
    }
    let value: Value = serde_json::from_str(json)
        .map_err(|e| TrafficError::InvalidInput(format!("invalid JSON: {e}")))?;
    prepare_weights_value(&value)
}

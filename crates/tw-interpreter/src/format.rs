//! Render optimizer responses as sentences.

use serde_json::{Map, Value};
use tw_protocol::{DYNAMIC_KPIS, OptimizerMode, fmt_decimal, round2};

/// Keys the shell injects into a response before formatting.
pub const DEBUG_PAYLOAD_KEY: &str = "debug_payload";
pub const VALIDATION_WARNINGS_KEY: &str = "validation_warnings";

/// Turn an optimizer response into the user-facing summary.
///
/// Never fails: unexpected shapes (including `{"error": ..}`) fall through to
/// the mode's "nothing found" sentence.
pub fn format_results(response: &Value, mode: OptimizerMode) -> String {
    let mut out = Vec::new();

    let warnings = response
        .get(VALIDATION_WARNINGS_KEY)
        .and_then(Value::as_array)
        .filter(|w| !w.is_empty());
    if let Some(warnings) = warnings {
        out.push("Validation warnings:".to_string());
        for warning in warnings {
            match warning.as_str() {
                Some(text) => out.push(format!("- {text}")),
                None => out.push(format!("- {warning}")),
            }
        }
        out.push(String::new());
    }

    match mode {
        OptimizerMode::Standard => out.extend(standard_lines(response)),
        OptimizerMode::Dynamic => out.extend(dynamic_lines(response)),
    }

    out.join("\n")
}

fn standard_lines(response: &Value) -> Vec<String> {
    let sentences: Vec<String> = response
        .pointer("/KPIs/difference")
        .and_then(Value::as_object)
        .map(|differences| {
            differences
                .iter()
                .filter_map(|(metric, value)| Some(kpi_sentence(metric, value.as_f64()?)))
                .collect()
        })
        .unwrap_or_default();

    if sentences.is_empty() {
        return vec![format!(
            "No {} differences found in the response.",
            OptimizerMode::Standard.display_name()
        )];
    }

    let mut lines = vec![format!("{} Results:", OptimizerMode::Standard.display_name())];
    lines.extend(sentences);
    lines
}

/// One KPI delta (a signed fraction) as a sentence.
pub fn kpi_sentence(metric: &str, delta: f64) -> String {
    let pct = fmt_decimal(round2(delta * 100.0).abs());
    if delta > 0.0 {
        format!("- The KPI '{metric}' improves by {pct}%.")
    } else if delta < 0.0 {
        format!("- The KPI '{metric}' worsens by {pct}%.")
    } else {
        format!("- The KPI '{metric}' shows no change.")
    }
}

fn dynamic_lines(response: &Value) -> Vec<String> {
    let data: Option<&Map<String, Value>> = response
        .get("data")
        .and_then(Value::as_object)
        .or_else(|| response.as_object());

    let sentences: Vec<String> = data
        .map(|data| {
            data.iter()
                .filter(|(name, _)| DYNAMIC_KPIS.contains(&name.as_str()))
                .map(|(name, value)| {
                    let shown = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!("- The value for '{name}' is {shown}.")
                })
                .collect()
        })
        .unwrap_or_default();

    if sentences.is_empty() {
        return vec![format!(
            "No {} results found or results are not in the expected format.",
            OptimizerMode::Dynamic.display_name()
        )];
    }

    let mut lines = vec![format!("{} Results:", OptimizerMode::Dynamic.display_name())];
    lines.extend(sentences);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positive_delta_improves() {
        let text = format_results(
            &json!({"KPIs": {"difference": {"Delay": 0.0421}}}),
            OptimizerMode::Standard,
        );
        assert!(text.contains("The KPI 'Delay' improves by 4.21%."), "{text}");
        assert!(text.starts_with("Traffic Optimizer Results:"));
    }

    #[test]
    fn negative_delta_worsens() {
        let text = format_results(
            &json!({"KPIs": {"difference": {"Delay": -0.10}}}),
            OptimizerMode::Standard,
        );
        assert!(text.contains("worsens by 10.0%"), "{text}");
    }

    #[test]
    fn zero_delta_has_no_percentage() {
        let text = format_results(
            &json!({"KPIs": {"difference": {"Emissions": 0.0}}}),
            OptimizerMode::Standard,
        );
        assert!(text.contains("- The KPI 'Emissions' shows no change."));
        assert!(!text.contains('%'));
    }

    #[test]
    fn empty_response_is_no_differences() {
        assert_eq!(
            format_results(&json!({}), OptimizerMode::Standard),
            "No Traffic Optimizer differences found in the response."
        );
        assert_eq!(
            format_results(&json!({"KPIs": {"difference": {}}}), OptimizerMode::Standard),
            "No Traffic Optimizer differences found in the response."
        );
    }

    #[test]
    fn error_shape_is_no_results() {
        let response = json!({"error": "connection refused"});
        assert!(format_results(&response, OptimizerMode::Standard).starts_with("No "));
        assert!(format_results(&response, OptimizerMode::Dynamic).starts_with("No "));
    }

    #[test]
    fn order_follows_response() {
        let response: Value = serde_json::from_str(
            r#"{"KPIs": {"difference": {"Zeta": 0.01, "Alpha": -0.02, "Mid": 0.0}}}"#,
        )
        .unwrap();
        let text = format_results(&response, OptimizerMode::Standard);
        let zeta = text.find("'Zeta'").unwrap();
        let alpha = text.find("'Alpha'").unwrap();
        let mid = text.find("'Mid'").unwrap();
        assert!(zeta < alpha && alpha < mid, "{text}");
    }

    #[test]
    fn debug_payload_is_ignored_and_warnings_prepended() {
        let response = json!({
            "debug_payload": {"weight_Congestion": 1.0},
            "validation_warnings": ["Weight for weight_Congestion (1.5) exceeded 1. Adjusted to 1."],
            "KPIs": {"difference": {"Delay": 0.05}}
        });
        let text = format_results(&response, OptimizerMode::Standard);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Validation warnings:");
        assert!(lines[1].starts_with("- Weight for weight_Congestion"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Traffic Optimizer Results:");
        assert!(!text.contains("debug_payload"));
    }

    #[test]
    fn empty_warning_list_adds_nothing() {
        let response = json!({"validation_warnings": [], "KPIs": {"difference": {"Delay": 0.05}}});
        let text = format_results(&response, OptimizerMode::Standard);
        assert!(!text.contains("Validation warnings"));
    }

    #[test]
    fn dynamic_reads_nested_data() {
        let response: Value = serde_json::from_str(
            r#"{"data": {"Emissions": 120.5, "Income": 3400, "Unrelated": 1, "Congestion (Delay)": "12 min"}}"#,
        )
        .unwrap();
        let text = format_results(&response, OptimizerMode::Dynamic);
        assert_eq!(
            text,
            "Dynamic Traffic Optimizer Results:\n\
             - The value for 'Emissions' is 120.5.\n\
             - The value for 'Income' is 3400.\n\
             - The value for 'Congestion (Delay)' is 12 min."
        );
    }

    #[test]
    fn dynamic_reads_flat_root() {
        let response = json!({"Congestion inside": 0.42, "debug_payload": {}});
        let text = format_results(&response, OptimizerMode::Dynamic);
        assert!(text.contains("- The value for 'Congestion inside' is 0.42."));
    }

    #[test]
    fn dynamic_without_expected_keys() {
        assert_eq!(
            format_results(&json!({"data": {"Other": 1}}), OptimizerMode::Dynamic),
            "No Dynamic Traffic Optimizer results found or results are not in the expected format."
        );
    }
}

//! Phrase interpreter: free text → raw weights + optimizer mode.
//!
//! Three passes run over the same lowercased text, in a fixed order:
//!
//! 1. **Qualitative-before**: `<label> priority (to|for) <param>`
//! 2. **Qualitative-after**: `<param> <label> priority`
//! 3. **Numeric**: `<param> (to|=|:) <number>`
//!
//! Every capture that resolves to a parameter overwrites its weight, so a
//! later pass wins over an earlier one. Captures that resolve to nothing are
//! dropped silently.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tw_protocol::{OptimizerMode, WeightKey, WeightVector};

use crate::error::{TrafficError, TrafficResult};
use crate::lexicon::Lexicon;
use crate::resolver::{DEFAULT_FUZZY_CUTOFF, ParameterResolver};
use crate::scale::{PriorityScale, SamplingStrategy};

/// Which extraction pass produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    QualitativeBefore,
    QualitativeAfter,
    Numeric,
}

/// A capture that resolved to a parameter and was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMatch {
    pub pattern: PatternKind,
    /// Cleaned phrase that was resolved.
    pub phrase: String,
    pub key: WeightKey,
    pub value: f64,
}

/// Full result of interpreting one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub weights: WeightVector,
    pub mode: OptimizerMode,
    pub matches: Vec<ParameterMatch>,
}

/// Tunables that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpreterSettings {
    #[serde(default = "default_cutoff")]
    pub fuzzy_cutoff: f64,
    #[serde(default)]
    pub sampling: SamplingStrategy,
    #[serde(default = "default_multilingual")]
    pub multilingual: bool,
}

fn default_cutoff() -> f64 {
    DEFAULT_FUZZY_CUTOFF
}

fn default_multilingual() -> bool {
    true
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            fuzzy_cutoff: default_cutoff(),
            sampling: SamplingStrategy::default(),
            multilingual: default_multilingual(),
        }
    }
}

/// Compiled interpreter. Immutable after construction, safe to share.
#[derive(Debug, Clone)]
pub struct PhraseInterpreter {
    lexicon: Lexicon,
    scale: PriorityScale,
    resolver: ParameterResolver,
    qualitative_before: Regex,
    qualitative_after: Regex,
    numeric: Regex,
}

impl PhraseInterpreter {
    pub fn new(settings: InterpreterSettings) -> TrafficResult<Self> {
        let lexicon = if settings.multilingual {
            Lexicon::multilingual()
        } else {
            Lexicon::english()
        };
        Self::with_lexicon(lexicon, settings.fuzzy_cutoff, settings.sampling)
    }

    pub fn with_lexicon(
        lexicon: Lexicon,
        fuzzy_cutoff: f64,
        sampling: SamplingStrategy,
    ) -> TrafficResult<Self> {
        let scale = PriorityScale::new(lexicon.priority_labels.clone(), sampling);
        let resolver = ParameterResolver::new(lexicon.parameters.clone(), fuzzy_cutoff);

        let labels = alternation(lexicon.priority_labels.iter().map(|(l, _)| l.as_str()));
        let nouns = alternation(lexicon.priority_nouns.iter().map(String::as_str));
        let connectors = alternation(lexicon.qualitative_connectors.iter().map(String::as_str));
        let numeric_connectors = alternation(lexicon.numeric_connectors.iter().map(String::as_str));
        let phrase = format!(r"[a-z\s{}]", regex::escape(&lexicon.extra_letters));
        let conjunctions: Vec<String> = lexicon
            .conjunctions
            .iter()
            .map(|c| format!(r"\s+{}\s+", regex::escape(c)))
            .collect();
        let mut ends = conjunctions;
        ends.extend([r"[,.;!?]".to_string(), "$".to_string()]);
        let end = format!("(?:{})", ends.join("|"));

        let qualitative_before = compile(&format!(
            r"\b({labels})\s+(?:{nouns})\s+(?:{connectors})\s+({phrase}+?){end}"
        ))?;
        let qualitative_after =
            compile(&format!(r"({phrase}+?)\s+({labels})\s+(?:{nouns}){end}"))?;
        let numeric = compile(&format!(
            r"({phrase}+?)\s+(?:{numeric_connectors})\s+([0-9]+(?:\.[0-9]+)?)"
        ))?;

        Ok(Self {
            lexicon,
            scale,
            resolver,
            qualitative_before,
            qualitative_after,
            numeric,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn scale(&self) -> &PriorityScale {
        &self.scale
    }

    /// Raw (unvalidated, unnormalized) weights and the requested mode.
    pub fn interpret(&self, raw_text: &str) -> (WeightVector, OptimizerMode) {
        let Interpretation { weights, mode, .. } = self.interpret_detailed(raw_text);
        (weights, mode)
    }

    pub fn interpret_detailed(&self, raw_text: &str) -> Interpretation {
        let lower = raw_text.to_lowercase();
        let mode = if self.lexicon.mentions_dynamic(&lower) {
            OptimizerMode::Dynamic
        } else {
            OptimizerMode::Standard
        };

        let mut weights = WeightVector::default();
        let mut matches = Vec::new();

        for caps in self.qualitative_before.captures_iter(&lower) {
            self.apply_qualitative(
                PatternKind::QualitativeBefore,
                &caps[2],
                &caps[1],
                &mut weights,
                &mut matches,
            );
        }

        for caps in self.qualitative_after.captures_iter(&lower) {
            self.apply_qualitative(
                PatternKind::QualitativeAfter,
                &caps[1],
                &caps[2],
                &mut weights,
                &mut matches,
            );
        }

        for caps in self.numeric.captures_iter(&lower) {
            let Ok(value) = caps[2].parse::<f64>() else {
                continue;
            };
            if let Some((phrase, key)) = self.resolve_capture(&caps[1]) {
                weights.set(key, value);
                matches.push(ParameterMatch {
                    pattern: PatternKind::Numeric,
                    phrase,
                    key,
                    value,
                });
            }
        }

        tracing::debug!(weights = ?weights, mode = %mode, matched = matches.len(), "interpreted input");

        Interpretation {
            weights,
            mode,
            matches,
        }
    }

    fn apply_qualitative(
        &self,
        pattern: PatternKind,
        raw_phrase: &str,
        label: &str,
        weights: &mut WeightVector,
        matches: &mut Vec<ParameterMatch>,
    ) {
        let Some((phrase, key)) = self.resolve_capture(raw_phrase) else {
            return;
        };
        match self.scale.sample(label) {
            Ok(value) => {
                weights.set(key, value);
                matches.push(ParameterMatch {
                    pattern,
                    phrase,
                    key,
                    value,
                });
            }
            Err(e) => tracing::debug!(error = %e, "skipping capture"),
        }
    }

    /// Captures that start at the leftmost letter can swallow earlier
    /// clauses; only the words after the last conjunction name the parameter.
    fn resolve_capture(&self, raw_phrase: &str) -> Option<(String, WeightKey)> {
        let phrase = self.lexicon.clean_phrase(self.lexicon.last_clause(raw_phrase));
        let key = self.resolver.resolve(&phrase)?;
        Some((phrase, key))
    }
}

/// Regex alternation, longest alternatives first so "very high" beats "high".
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> TrafficResult<Regex> {
    Regex::new(pattern).map_err(|e| TrafficError::InvalidInput(format!("bad lexicon pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> PhraseInterpreter {
        PhraseInterpreter::new(InterpreterSettings::default()).unwrap()
    }

    fn english() -> PhraseInterpreter {
        PhraseInterpreter::new(InterpreterSettings {
            multilingual: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn very_high_priority_for_congestion() {
        let (w, mode) = interpreter().interpret("very high priority for congestion");
        assert_eq!(w.get(WeightKey::Congestion), 0.95);
        assert_eq!(w.get(WeightKey::PublicTransport), 0.1);
        assert_eq!(w.get(WeightKey::Emissions), 0.1);
        assert_eq!(w.get(WeightKey::OperationalCost), 0.1);
        assert_eq!(mode, OptimizerMode::Standard);
    }

    #[test]
    fn numeric_with_dynamic_keyword() {
        let (w, mode) = interpreter().interpret("set dynamic optimization, congestion to 0.5");
        assert_eq!(w.get(WeightKey::Congestion), 0.5);
        assert_eq!(mode, OptimizerMode::Dynamic);
    }

    #[test]
    fn unmatched_input_returns_defaults() {
        let (w, mode) = interpreter().interpret("how do I make potato soup?");
        assert_eq!(w, WeightVector::default());
        assert_eq!(mode, OptimizerMode::Standard);
    }

    #[test]
    fn several_clauses_joined_by_and() {
        let result = english()
            .interpret_detailed("Give high priority to public transport and low priority for emissions.");
        assert_eq!(result.weights.get(WeightKey::PublicTransport), 0.79);
        assert_eq!(result.weights.get(WeightKey::Emissions), 0.4);
        assert_eq!(result.weights.get(WeightKey::Congestion), 0.1);
        assert_eq!(result.matches.len(), 2);
        assert!(result
            .matches
            .iter()
            .all(|m| m.pattern == PatternKind::QualitativeBefore));
    }

    #[test]
    fn qualitative_after_parameter() {
        let (w, _) = english().interpret("I want congestion very high priority");
        assert_eq!(w.get(WeightKey::Congestion), 0.95);
    }

    #[test]
    fn numeric_pass_wins_over_qualitative() {
        let result = english()
            .interpret_detailed("very high priority for congestion, congestion to 0.3");
        assert_eq!(result.weights.get(WeightKey::Congestion), 0.3);
        let patterns: Vec<_> = result.matches.iter().map(|m| m.pattern).collect();
        assert_eq!(patterns, vec![PatternKind::QualitativeBefore, PatternKind::Numeric]);
    }

    #[test]
    fn numeric_values_are_not_clamped_here() {
        let (w, _) = english().interpret("emissions = 2.5 and operational cost : 0.2");
        assert_eq!(w.get(WeightKey::Emissions), 2.5);
        assert_eq!(w.get(WeightKey::OperationalCost), 0.2);
    }

    #[test]
    fn numeric_after_qualitative_clause() {
        let result = english().interpret_detailed("high priority for emissions and congestion to 1.4");
        assert_eq!(result.weights.get(WeightKey::Emissions), 0.79);
        assert_eq!(result.weights.get(WeightKey::Congestion), 1.4);
        assert_eq!(result.matches[1].phrase, "congestion");
    }

    #[test]
    fn misspelled_parameter_still_resolves() {
        let (w, _) = english().interpret("high priority for publik transprt");
        assert_eq!(w.get(WeightKey::PublicTransport), 0.79);
    }

    #[test]
    fn partial_parameter_name_resolves() {
        let result = english().interpret_detailed("high priority for transport");
        assert_eq!(result.weights.get(WeightKey::PublicTransport), 0.79);
        assert_eq!(result.matches[0].phrase, "transport");
    }

    #[test]
    fn unknown_parameter_capture_is_dropped() {
        let result = english().interpret_detailed("very high priority for pizza");
        assert!(result.matches.is_empty());
        assert_eq!(result.weights, WeightVector::default());
    }

    #[test]
    fn real_time_keyword_selects_dynamic() {
        let (_, mode) = english().interpret("Run a REAL TIME optimization with emissions to 0.4");
        assert_eq!(mode, OptimizerMode::Dynamic);
    }

    #[test]
    fn spanish_variants_use_the_same_tables() {
        let (w, _) = interpreter().interpret("muy alta prioridad para transporte público");
        assert_eq!(w.get(WeightKey::PublicTransport), 0.95);

        let (w, _) = interpreter().interpret("emisiones a 0.6");
        assert_eq!(w.get(WeightKey::Emissions), 0.6);
    }

    #[test]
    fn english_only_ignores_spanish_labels() {
        let (w, _) = english().interpret("muy alta prioridad para congestión");
        assert_eq!(w, WeightVector::default());
    }

    #[test]
    fn repeated_interpretation_is_deterministic() {
        let i = interpreter();
        let text = "medium priority for operational cost and high priority to emissions";
        let first = i.interpret(text);
        for _ in 0..5 {
            assert_eq!(i.interpret(text), first);
        }
    }
}

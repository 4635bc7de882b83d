//! Lookup tables driving the phrase interpreter.
//!
//! Language variants are extra rows in the same tables, so the interpreter
//! has a single code path regardless of which languages are enabled.

use std::collections::HashSet;

use tw_protocol::WeightKey;

use crate::scale::PriorityLevel;

/// English stopwords dropped from captured parameter phrases.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Request filler that never names a parameter.
const FILLER_WORDS: &[&str] = &[
    "optimize", "adjust", "set", "want", "priority", "dynamic", "standard",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "el", "los", "las", "del", "al", "para", "con", "por", "una", "uno", "que",
    "en", "y", "a", "muy", "más", "quiero", "prioridad", "optimizar", "ajustar", "dinámica",
];

/// Words kept even when they look like stopwords.
const PROTECTED_KEYWORDS: &[&str] = &[
    "public", "transport", "congestion", "emissions", "operational", "cost", "traffic",
    "delay", "frequency",
];

/// Every table the interpreter consults.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Qualitative label → tier.
    pub priority_labels: Vec<(String, PriorityLevel)>,
    /// Noun following a label ("priority").
    pub priority_nouns: Vec<String>,
    /// Words linking a priority to its parameter ("to", "for").
    pub qualitative_connectors: Vec<String>,
    /// Tokens linking a parameter to an explicit number ("to", "=", ":").
    pub numeric_connectors: Vec<String>,
    /// Conjunctions that end a parameter phrase ("and").
    pub conjunctions: Vec<String>,
    /// Parameter phrase → canonical key.
    pub parameters: Vec<(String, WeightKey)>,
    /// Substrings that switch the request to the dynamic optimizer.
    pub dynamic_keywords: Vec<String>,
    pub stopwords: HashSet<String>,
    pub protected: HashSet<String>,
    /// Non-ASCII letters allowed inside a captured phrase.
    pub extra_letters: String,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Lexicon {
    pub fn english() -> Self {
        Self {
            priority_labels: PriorityLevel::ALL
                .iter()
                .map(|level| (level.label().to_string(), *level))
                .collect(),
            priority_nouns: owned(&["priority"]),
            qualitative_connectors: owned(&["to", "for"]),
            numeric_connectors: owned(&["to", "=", ":"]),
            conjunctions: owned(&["and"]),
            parameters: vec![
                ("public transport".into(), WeightKey::PublicTransport),
                ("congestion".into(), WeightKey::Congestion),
                ("emissions".into(), WeightKey::Emissions),
                ("operational cost".into(), WeightKey::OperationalCost),
            ],
            dynamic_keywords: owned(&["dynamic", "real-time", "adaptive", "real time"]),
            stopwords: ENGLISH_STOPWORDS
                .iter()
                .chain(FILLER_WORDS)
                .map(|w| w.to_string())
                .collect(),
            protected: PROTECTED_KEYWORDS.iter().map(|w| w.to_string()).collect(),
            extra_letters: String::new(),
        }
    }

    /// English plus Spanish labels, parameter names and connectors.
    pub fn multilingual() -> Self {
        let mut lexicon = Self::english();
        lexicon.priority_labels.extend([
            ("muy baja".to_string(), PriorityLevel::VeryLow),
            ("baja".to_string(), PriorityLevel::Low),
            ("media".to_string(), PriorityLevel::Medium),
            ("alta".to_string(), PriorityLevel::High),
            ("muy alta".to_string(), PriorityLevel::VeryHigh),
        ]);
        lexicon.priority_nouns.push("prioridad".into());
        lexicon.qualitative_connectors.extend(owned(&["para", "a"]));
        lexicon.numeric_connectors.extend(owned(&["a", "en"]));
        lexicon.conjunctions.push("y".into());
        lexicon.parameters.extend([
            ("transporte público".to_string(), WeightKey::PublicTransport),
            ("congestión".to_string(), WeightKey::Congestion),
            ("emisiones".to_string(), WeightKey::Emissions),
            ("costo operacional".to_string(), WeightKey::OperationalCost),
        ]);
        lexicon
            .stopwords
            .extend(SPANISH_STOPWORDS.iter().map(|w| w.to_string()));
        lexicon.protected.extend(
            ["transporte", "público", "congestión", "emisiones", "costo", "operacional"]
                .map(String::from),
        );
        lexicon.extra_letters = "áéíóúüñ".into();
        lexicon
    }

    /// Whether the text asks for the dynamic optimizer.
    pub fn mentions_dynamic(&self, lower: &str) -> bool {
        self.dynamic_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Text after the last standalone conjunction, trimmed.
    pub fn last_clause<'a>(&self, phrase: &'a str) -> &'a str {
        let mut start = 0;
        let mut offset = 0;
        for word in phrase.split(' ') {
            offset += word.len() + 1;
            if self.conjunctions.iter().any(|c| c == word) {
                start = offset.min(phrase.len());
            }
        }
        phrase[start..].trim()
    }

    /// Drop short tokens and stopwords, keeping protected keywords.
    pub fn clean_phrase(&self, phrase: &str) -> String {
        phrase
            .split_whitespace()
            .filter(|word| {
                let lower = word.to_lowercase();
                (!self.stopwords.contains(&lower) || self.protected.contains(&lower))
                    && word.chars().count() > 2
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::multilingual()
    }
}

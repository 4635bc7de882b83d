//! Fuzzy matching of free-text phrases to known parameters.

use tw_protocol::WeightKey;

/// Default minimum match ratio (0–100) for a fuzzy hit.
pub const DEFAULT_FUZZY_CUTOFF: f64 = 60.0;

/// Indel similarity on a 0–100 scale: `2 * LCS / (len_a + len_b)`.
///
/// Only insertions and deletions count, so a substitution costs two edits.
/// Two empty strings score 100.
pub fn match_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64 * 100.0
}

/// Longest common subsequence length, one DP row at a time.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Resolve `phrase` to the key bound to the closest known phrase.
///
/// An exact (trimmed, lowercased) hit wins immediately; otherwise the best
/// ratio must reach `cutoff`. Ties keep the first known phrase. `None` is a
/// normal outcome, not an error.
pub fn resolve<S: AsRef<str>, K: Copy>(phrase: &str, known: &[(S, K)], cutoff: f64) -> Option<K> {
    let normalized = phrase.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some((_, key)) = known
        .iter()
        .find(|(candidate, _)| candidate.as_ref().to_lowercase() == normalized)
    {
        return Some(*key);
    }

    let mut best: Option<(f64, K)> = None;
    for (candidate, key) in known {
        let score = match_ratio(&normalized, &candidate.as_ref().to_lowercase());
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, *key));
        }
    }

    match best {
        Some((score, key)) if score >= cutoff => Some(key),
        Some((score, _)) => {
            tracing::debug!(phrase = %normalized, score, cutoff, "no parameter close enough");
            None
        }
        None => None,
    }
}

/// Parameter table plus cutoff, as used by the interpreter.
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    known: Vec<(String, WeightKey)>,
    cutoff: f64,
}

impl ParameterResolver {
    pub fn new(known: Vec<(String, WeightKey)>, cutoff: f64) -> Self {
        Self { known, cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn resolve(&self, phrase: &str) -> Option<WeightKey> {
        resolve(phrase, &self.known, self.cutoff)
    }
}

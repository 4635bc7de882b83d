//! Traffic-priority interpreter.
//!
//! Turns free text like "very high priority for congestion" into a weight
//! vector plus optimizer mode, clamps and normalizes weights before they are
//! sent to an optimizer, and renders the optimizer's KPI response back into
//! sentences. Everything here is synchronous and free of I/O.

pub mod error;
pub mod format;
pub mod interpreter;
pub mod lexicon;
pub mod resolver;
pub mod scale;
pub mod weights;

// Re-export key types for convenience
pub use error::{TrafficError, TrafficResult};
pub use format::{DEBUG_PAYLOAD_KEY, VALIDATION_WARNINGS_KEY, format_results, kpi_sentence};
pub use interpreter::{
    Interpretation, InterpreterSettings, ParameterMatch, PatternKind, PhraseInterpreter,
};
pub use lexicon::Lexicon;
pub use resolver::{DEFAULT_FUZZY_CUTOFF, ParameterResolver, match_ratio, resolve};
pub use scale::{PriorityLevel, PriorityScale, SamplingStrategy};
pub use weights::{
    PreparedWeights, clamp_weight, normalize, prepare_vector, prepare_weights,
    prepare_weights_value, validate,
};

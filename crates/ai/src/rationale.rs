use crate::facts::DecisionFacts;
use crate::result::AiError;

/// Narrow capability for turning decision facts into prose.
///
/// Implementations may call out to a language model. Callers must treat any
/// error (or blank output) as "no rationale available" and fall back to their
/// own deterministic explanation; the numeric decision never waits on this.
pub trait RationaleGenerator: Send + Sync + 'static {
    /// Short identifier for logs (e.g. model or template name).
    fn name(&self) -> &str;

    /// Produce an explanation for the given decision.
    ///
    /// Must not influence or mutate the decision.
    fn explain(&self, facts: &DecisionFacts) -> Result<String, AiError>;
}

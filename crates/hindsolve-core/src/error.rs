//! Error types for hindsolve.

use thiserror::Error;

/// Error taxonomy for the step machine.
///
/// `Contradiction` and `Exhaustion` are both folded into `Done(Error)` by
/// the step that produced them; they are kept distinct only so a
/// diagnostic layer can tell "the simplifier said no" apart from "we ran
/// out of candidates to try" when inspecting a finished solve.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Unification or constraint simplification reported an inconsistency.
    #[error("contradiction: {0}")]
    Contradiction(String),

    /// A step ran out of choices without producing any solution.
    #[error("exhausted all choices without a solution")]
    Exhaustion,

    /// The driver's step or time budget was exceeded before the work list
    /// emptied. Never returned as an `Err` from `solve`; surfaced via
    /// `SolveStatus::Incomplete` instead.
    #[error("solver budget exceeded")]
    BudgetExceeded,

    /// A step observed a state transition out of the order spec'd in
    /// `StepState`, a double-suspend, or use of a step after `Done`.
    /// Fatal: the solve aborts rather than attempting recovery.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result type alias for hindsolve operations.
pub type Result<T> = std::result::Result<T, SolveError>;

/// A simplifier- or binding-level contradiction, carried separately from
/// [`SolveError`] so collaborator trait methods can return it without
/// forcing every caller through the full error enum.
#[derive(Debug, Clone)]
pub struct Contradiction(pub String);

impl std::fmt::Display for Contradiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Contradiction {}

impl From<Contradiction> for SolveError {
    fn from(c: Contradiction) -> Self {
        SolveError::Contradiction(c.0)
    }
}

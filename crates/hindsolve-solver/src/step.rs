//! The step abstraction: state machine, result type, and collaborator
//! bundle shared by all four step kinds (spec §3, §9 "deep inheritance").
//!
//! The four step kinds share only state + solution buffer + two entry
//! points, so rather than a class hierarchy this models them as a tagged
//! variant (`Step`) dispatched by the driver, exactly as spec §9 suggests.

use std::fmt::Debug;

use hindsolve_core::{ConstraintGraphOps, Result, Score, Simplifier, SolutionFilter, SolveError, TypeRepr};

use crate::component::ComponentStep;
use crate::disjunction::DisjunctionStep;
use crate::splitter::SplitterStep;
use crate::type_variable::TypeVariableStep;

/// `Setup → Ready → Running → (Suspended → Running)* → Done`; spec §3's
/// state-transition validator, previously a TODO in the source, fully
/// enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Setup,
    Ready,
    Running,
    Suspended,
    Done,
}

impl StepState {
    /// Checks whether `self -> next` is a legal transition.
    pub fn validate_transition(self, next: StepState) -> Result<()> {
        use StepState::*;
        let ok = matches!(
            (self, next),
            (Setup, Ready) | (Ready, Running) | (Running, Suspended) | (Running, Done) | (Suspended, Running)
        );
        if ok {
            Ok(())
        } else {
            Err(SolveError::InvariantViolation(format!(
                "illegal step transition {self:?} -> {next:?}"
            )))
        }
    }
}

/// Advances `current` to `next`, enforcing the legal-transition invariant.
/// Logs at `error!` before the caller propagates the violation, per
/// SPEC_FULL §4.7.
pub(crate) fn transition(current: &mut StepState, next: StepState) -> Result<()> {
    if let Err(err) = current.validate_transition(next) {
        tracing::error!(?current, ?next, "step invariant violation");
        return Err(err);
    }
    *current = next;
    Ok(())
}

/// `StepResult`'s disposition (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Solved,
    Error,
    Unsolved,
}

/// `{kind, followups}` returned by `take`/`resume`. Only `Unsolved` may
/// carry follow-ups.
#[derive(Debug)]
pub struct StepResult<T: TypeRepr, Sc: Score> {
    pub outcome: StepOutcome,
    pub followups: Vec<Step<T, Sc>>,
}

impl<T: TypeRepr, Sc: Score> StepResult<T, Sc> {
    pub fn solved() -> Self {
        StepResult { outcome: StepOutcome::Solved, followups: Vec::new() }
    }

    pub fn error() -> Self {
        StepResult { outcome: StepOutcome::Error, followups: Vec::new() }
    }

    pub fn unsolved(followups: Vec<Step<T, Sc>>) -> Self {
        StepResult { outcome: StepOutcome::Unsolved, followups }
    }
}

/// The external collaborators a step may need — the simplifier, the
/// constraint graph, and the solution filter (spec §6) — plus the
/// pruning/diagnostic flags from [`hindsolve_config::SolverConfig`] steps
/// consult directly. Bundled by reference so steps don't each carry their
/// own copies.
pub struct Collaborators<'a, T: TypeRepr, Sc: Score> {
    pub simplifier: &'a mut dyn Simplifier<T, Sc>,
    pub graph: &'a mut dyn ConstraintGraphOps<T, Sc>,
    pub filter: &'a dyn SolutionFilter<T, Sc>,
    pub retain_all_solutions: bool,
    pub literal_default_early_exit: bool,
    pub disjunction_short_circuit: bool,
}

/// Replaces `buffer`'s contents with the filtered result, unless
/// `retain_all_solutions` is set (spec §4.6, §6).
pub(crate) fn apply_filter<T: TypeRepr, Sc: Score>(
    buffer: &crate::driver::SolutionBuffer<T, Sc>,
    collab: &Collaborators<T, Sc>,
) {
    if collab.retain_all_solutions {
        return;
    }
    let taken = std::mem::take(&mut *buffer.borrow_mut());
    *buffer.borrow_mut() = collab.filter.filter(taken);
}

/// A tagged variant over the four step kinds; the driver holds a work list
/// of these and dispatches by matching.
#[derive(Debug)]
pub enum Step<T: TypeRepr, Sc: Score> {
    Splitter(SplitterStep<T, Sc>),
    Component(ComponentStep<T, Sc>),
    TypeVariable(TypeVariableStep<T, Sc>),
    Disjunction(DisjunctionStep<T, Sc>),
}

impl<T: TypeRepr, Sc: Score> Step<T, Sc> {
    pub fn state(&self) -> StepState {
        match self {
            Step::Splitter(s) => s.state,
            Step::Component(s) => s.state,
            Step::TypeVariable(s) => s.state,
            Step::Disjunction(s) => s.state,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Splitter(_) => "Splitter",
            Step::Component(_) => "Component",
            Step::TypeVariable(_) => "TypeVariable",
            Step::Disjunction(_) => "Disjunction",
        }
    }

    pub fn setup(
        &mut self,
        system: &mut hindsolve_core::ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
    ) -> Result<()> {
        match self {
            Step::Splitter(s) => s.setup(system, collab),
            Step::Component(s) => s.setup(system, collab),
            Step::TypeVariable(s) => s.setup(system, collab),
            Step::Disjunction(s) => s.setup(system, collab),
        }
    }

    pub fn take(
        &mut self,
        system: &mut hindsolve_core::ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> Result<StepResult<T, Sc>> {
        match self {
            Step::Splitter(s) => s.take(system, collab, prev_failed),
            Step::Component(s) => s.take(system, collab, prev_failed),
            Step::TypeVariable(s) => s.take(system, collab, prev_failed),
            Step::Disjunction(s) => s.take(system, collab, prev_failed),
        }
    }

    pub fn resume(
        &mut self,
        system: &mut hindsolve_core::ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> Result<StepResult<T, Sc>> {
        match self {
            Step::Splitter(s) => s.resume(system, collab, prev_failed),
            Step::Component(s) => s.resume(system, collab, prev_failed),
            Step::TypeVariable(s) => s.resume(system, collab, prev_failed),
            Step::Disjunction(s) => s.resume(system, collab, prev_failed),
        }
    }

    /// Forcibly unwinds any scope this step is still holding, without
    /// running the normal `take`/`resume` logic. Used only by budget
    /// cancellation (spec §5), which must restore state in LIFO order
    /// even though the work list is being abandoned rather than drained
    /// to completion.
    pub fn cancel(self, system: &mut hindsolve_core::ConstraintSystem<T, Sc>) {
        match self {
            Step::Splitter(s) => s.cancel(system),
            Step::Component(s) => s.cancel(system),
            Step::TypeVariable(s) => s.cancel(system),
            Step::Disjunction(s) => s.cancel(system),
        }
    }
}

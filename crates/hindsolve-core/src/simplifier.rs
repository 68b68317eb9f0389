//! The constraint simplifier collaborator (external, spec §1/§6).
//!
//! The simplifier reduces constraints, unifies types, and records fixes.
//! None of that is specified here — only the surface the step machine
//! calls.

use std::fmt::Debug;

use crate::binding::Binding;
use crate::constraint::DisjunctionChoice;
use crate::error::Contradiction;
use crate::ids::{ConstraintId, TypeVariableId};
use crate::repr::TypeRepr;
use crate::score::Score;
use crate::system::ConstraintSystem;

/// Outcome of simplifying one component's constraints (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifyOutcome {
    /// All constraints in the component reduced away and every variable in
    /// it is bound.
    Solved,
    /// Simplification found an inconsistency.
    Contradiction,
    /// Neither: more work (a disjunction choice or variable binding) is
    /// needed before this component can be judged solved or contradictory.
    Unsolved,
}

/// Consumed from the simplifier (spec §6).
pub trait Simplifier<T: TypeRepr, Sc: Score>: Debug {
    /// Simplifies all constraints in `constraints` once, mutating `system`
    /// incrementally (its active constraint list, graph, and
    /// resolved-overload list).
    fn simplify_component(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        constraints: &[ConstraintId],
    ) -> SimplifyOutcome;

    /// Applies `binding` to `var`, returning a contradiction if doing so is
    /// inconsistent with the system's existing constraints.
    fn apply_binding(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        var: TypeVariableId,
        binding: &Binding<T>,
    ) -> Result<(), Contradiction>;

    /// Commits one disjunction alternative.
    fn apply_choice(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        choice: &DisjunctionChoice<T>,
    ) -> Result<(), Contradiction>;
}

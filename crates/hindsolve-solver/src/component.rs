//! `ComponentStep` (spec §4.3): solve one independent connected component,
//! driving its binding/disjunction work to completion.

use hindsolve_core::{Constraint, ConstraintId, ConstraintSystem, Score, SimplifyOutcome, Solution, TypeRepr, TypeVariableId};

use crate::disjunction::DisjunctionStep;
use crate::driver::SolutionBuffer;
use crate::scope::Scope;
use crate::step::{transition, Collaborators, Step, StepResult, StepState};
use crate::type_variable::TypeVariableStep;

#[derive(Debug)]
pub struct ComponentStep<T: TypeRepr, Sc: Score> {
    pub(crate) state: StepState,
    type_vars: Vec<TypeVariableId>,
    constraints: Vec<ConstraintId>,
    single: bool,
    /// Swaps `system`'s active-constraint list to exactly this component's
    /// constraints for the step's duration. A no-op (`None`) for `single`
    /// components, where the system's active list already equals the
    /// component's constraints (spec §4.3).
    scope: Option<Scope<T, Sc>>,
    solutions: SolutionBuffer<T, Sc>,
}

impl<T: TypeRepr, Sc: Score> ComponentStep<T, Sc> {
    pub fn new(
        type_vars: Vec<TypeVariableId>,
        constraints: Vec<ConstraintId>,
        single: bool,
        solutions: SolutionBuffer<T, Sc>,
    ) -> Self {
        ComponentStep {
            state: StepState::Setup,
            type_vars,
            constraints,
            single,
            scope: None,
            solutions,
        }
    }

    pub fn setup(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        _collab: &mut Collaborators<T, Sc>,
    ) -> hindsolve_core::Result<()> {
        if !self.single {
            let scope = Scope::open(system);
            system.set_active_constraints(self.constraints.clone());
            self.scope = Some(scope);
        }
        transition(&mut self.state, StepState::Ready)
    }

    pub fn take(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        _prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;

        match collab.simplifier.simplify_component(system, &self.constraints) {
            SimplifyOutcome::Solved => {
                let bindings = self
                    .type_vars
                    .iter()
                    .filter_map(|v| system.binding_of(*v).map(|ty| (*v, ty.clone())))
                    .collect();
                self.solutions.borrow_mut().push(Solution::new(
                    bindings,
                    system.overloads().clone(),
                    system.score(),
                ));
                system.record_solution_emitted();
                self.finish(system, true)
            }
            SimplifyOutcome::Contradiction => {
                tracing::debug!(kind = "Component", "simplification contradiction");
                self.finish(system, false)
            }
            SimplifyOutcome::Unsolved => {
                let follow_up = self.select_work_unit(system);
                transition(&mut self.state, StepState::Suspended)?;
                Ok(StepResult::unsolved(vec![follow_up]))
            }
        }
    }

    pub fn resume(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        _collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;
        // The sole follow-up (a `TypeVariableStep` or `DisjunctionStep`)
        // already drives the rest of this component to completion via its
        // own nested re-splitting, pushing fully-bound solutions straight
        // into `self.solutions` (spec §4.3) — nothing left for this step
        // to recompute.
        let solved = !prev_failed && !self.solutions.borrow().is_empty();
        self.finish(system, solved)
    }

    pub fn cancel(mut self, system: &mut ConstraintSystem<T, Sc>) {
        if let Some(scope) = self.scope.take() {
            scope.restore(system);
        }
    }

    fn finish(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        solved: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        if let Some(scope) = self.scope.take() {
            scope.restore(system);
        }
        transition(&mut self.state, StepState::Done)?;
        Ok(if solved { StepResult::solved() } else { StepResult::error() })
    }

    /// Picks the sole follow-up per the precedence in spec §4.3: the
    /// highest-priority disjunction first, else the best type variable to
    /// bind.
    fn select_work_unit(&self, system: &ConstraintSystem<T, Sc>) -> Step<T, Sc> {
        let mut best_disjunction: Option<(usize, ConstraintId)> = None;
        for &cid in &self.constraints {
            if let Constraint::Disjunction(d) = system.constraint(cid) {
                let alt_count = d.alternatives.len();
                if best_disjunction.map(|(n, _)| alt_count < n).unwrap_or(true) {
                    best_disjunction = Some((alt_count, cid));
                }
            }
        }

        if let Some((_, cid)) = best_disjunction {
            if let Constraint::Disjunction(d) = system.constraint(cid) {
                return Step::Disjunction(DisjunctionStep::new(d.clone(), self.solutions.clone()));
            }
        }

        let mut best_var: Option<TypeVariableId> = None;
        let mut best_candidate_count = usize::MAX;
        for &var in &self.type_vars {
            if system.binding_of(var).is_some() {
                continue;
            }
            let count = system.type_variable(var).candidates().len();
            if count < best_candidate_count {
                best_candidate_count = count;
                best_var = Some(var);
            }
        }

        let var = best_var.expect("an unsolved component has at least one unbound variable");
        let candidates = system.type_variable(var).candidates().to_vec();
        Step::TypeVariable(TypeVariableStep::new(var, candidates, self.solutions.clone()))
    }
}

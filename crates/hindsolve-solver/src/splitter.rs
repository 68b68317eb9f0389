//! `SplitterStep` (spec §4.2): partition the active constraint set into
//! independent components, then cross-merge their partial solutions.

use std::collections::BTreeMap;

use hindsolve_core::{ConstraintId, ConstraintSystem, Score, SimplifyOutcome, Solution, TypeRepr};

use crate::component::ComponentStep;
use crate::driver::{new_buffer, SolutionBuffer};
use crate::scope::Scope;
use crate::step::{apply_filter, transition, Collaborators, Step, StepResult, StepState};

#[derive(Debug)]
pub struct SplitterStep<T: TypeRepr, Sc: Score> {
    pub(crate) state: StepState,
    solutions: SolutionBuffer<T, Sc>,
    entry_score: Sc,
    component_buffers: Vec<SolutionBuffer<T, Sc>>,
    orphans: Vec<ConstraintId>,
}

impl<T: TypeRepr, Sc: Score> SplitterStep<T, Sc> {
    pub fn new(solutions: SolutionBuffer<T, Sc>) -> Self {
        SplitterStep {
            state: StepState::Setup,
            solutions,
            entry_score: Sc::zero(),
            component_buffers: Vec::new(),
            orphans: Vec::new(),
        }
    }

    pub fn setup(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        _collab: &mut Collaborators<T, Sc>,
    ) -> hindsolve_core::Result<()> {
        self.entry_score = system.score();
        transition(&mut self.state, StepState::Ready)
    }

    pub fn take(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        _prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;

        let active = system.active_constraints().to_vec();
        let partition = collab.graph.connected_components(system, &active);
        self.orphans = partition.orphans;
        system.set_orphaned_constraints(self.orphans.clone());

        let mut components = partition.components;
        components.sort_by_key(|c| c.type_vars.iter().copied().min());

        tracing::debug!(
            components = components.len(),
            orphans = self.orphans.len(),
            "splitter partitioned active constraints"
        );

        if components.is_empty() {
            // Boundary case (spec §8): zero constraints -> one trivial
            // solution, provided any orphans are already satisfied.
            let trivial = Solution::new(BTreeMap::new(), system.overloads().clone(), system.score());
            if self.orphans_satisfied(system, collab, &trivial) {
                self.solutions.borrow_mut().push(trivial);
                system.record_solution_emitted();
            }
            apply_filter(&self.solutions, collab);
            transition(&mut self.state, StepState::Done)?;
            return Ok(if self.solutions.borrow().is_empty() {
                StepResult::error()
            } else {
                StepResult::solved()
            });
        }

        let single = components.len() == 1 && self.orphans.is_empty();
        let mut followups = Vec::with_capacity(components.len());
        for plan in components {
            let buffer = new_buffer();
            self.component_buffers.push(buffer.clone());
            followups.push(Step::Component(ComponentStep::new(
                plan.type_vars,
                plan.constraints,
                single,
                buffer,
            )));
        }

        transition(&mut self.state, StepState::Suspended)?;
        Ok(StepResult::unsolved(followups))
    }

    pub fn resume(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        _prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        transition(&mut self.state, StepState::Running)?;

        if self.component_buffers.iter().any(|b| b.borrow().is_empty()) {
            tracing::debug!("a component produced zero solutions; splitter fails");
            transition(&mut self.state, StepState::Done)?;
            return Ok(StepResult::error());
        }

        let mut merged = vec![Solution::new(BTreeMap::new(), system.overloads().clone(), self.entry_score)];
        for buffer in &self.component_buffers {
            let mut next_round = Vec::with_capacity(merged.len() * buffer.borrow().len());
            for base in &merged {
                for candidate in buffer.borrow().iter() {
                    let delta = candidate.score - self.entry_score;
                    let contribution =
                        Solution::new(candidate.bindings.clone(), candidate.resolved_overloads.clone(), delta);
                    next_round.push(base.clone().merge(contribution));
                }
            }
            merged = next_round;
        }

        let mut any_survived = false;
        for candidate in merged {
            if self.orphans_satisfied(system, collab, &candidate) {
                any_survived = true;
                self.solutions.borrow_mut().push(candidate);
                system.record_solution_emitted();
            }
        }

        apply_filter(&self.solutions, collab);
        transition(&mut self.state, StepState::Done)?;
        Ok(if any_survived { StepResult::solved() } else { StepResult::error() })
    }

    pub fn cancel(self, _system: &mut ConstraintSystem<T, Sc>) {
        // The splitter itself holds no scope of its own; its component
        // buffers are dropped with it, and each spawned `ComponentStep`
        // (still on the work list) is cancelled independently.
    }

    /// Re-checks every orphaned constraint against `candidate`'s bindings
    /// via the simplifier, temporarily applying them (spec §4.2: orphans
    /// "must be already satisfied — no free variables remain").
    fn orphans_satisfied(
        &self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        candidate: &Solution<T, Sc>,
    ) -> bool {
        if self.orphans.is_empty() {
            return true;
        }
        let scope = Scope::open(system);
        for (&var, ty) in &candidate.bindings {
            system.bind_variable(var, ty.clone());
        }
        let satisfied = self
            .orphans
            .iter()
            .all(|&cid| matches!(collab.simplifier.simplify_component(system, &[cid]), SimplifyOutcome::Solved));
        scope.restore(system);
        satisfied
    }
}

//! `DisjunctionStep` (spec §4.5): attempt each choice of one disjunction,
//! pruning and short-circuiting where the configuration allows it.

use smallvec::{smallvec, SmallVec};

use hindsolve_core::{ConstraintSystem, Disjunction, DisjunctionChoice, Score, TypeRepr};

use crate::driver::SolutionBuffer;
use crate::producer::{ChoiceProducer, VecCursor};
use crate::scope::Scope;
use crate::splitter::SplitterStep;
use crate::step::{apply_filter, transition, Collaborators, Step, StepResult, StepState};

/// Most disjunctions (overload sets) have only a handful of alternatives.
type DisabledFlags = SmallVec<[bool; 4]>;

#[derive(Debug)]
pub struct DisjunctionStep<T: TypeRepr, Sc: Score> {
    pub(crate) state: StepState,
    disjunction: Disjunction<T>,
    producer: VecCursor<DisjunctionChoice<T>>,
    disabled_by_prune: DisabledFlags,
    temp_disabled: DisabledFlags,
    best_non_generic_score: Option<Sc>,
    last_solved: Option<(usize, Sc)>,
    /// Removes D from the active constraint list for the step's duration;
    /// restored (re-inserting D) when the step reaches `Done` or is
    /// cancelled.
    removal_scope: Option<Scope<T, Sc>>,
    active_choice: Option<(Scope<T, Sc>, usize)>,
    len_before_attempt: Option<usize>,
    solutions: SolutionBuffer<T, Sc>,
}

impl<T: TypeRepr, Sc: Score> DisjunctionStep<T, Sc> {
    pub fn new(disjunction: Disjunction<T>, solutions: SolutionBuffer<T, Sc>) -> Self {
        let n = disjunction.alternatives.len();
        let producer = VecCursor::new(disjunction.alternatives.clone());
        DisjunctionStep {
            state: StepState::Setup,
            disjunction,
            producer,
            disabled_by_prune: smallvec![false; n],
            temp_disabled: smallvec![false; n],
            best_non_generic_score: None,
            last_solved: None,
            removal_scope: None,
            active_choice: None,
            len_before_attempt: None,
            solutions,
        }
    }

    /// Removes D from the active list and runs `pruneOverloadSet` once
    /// (spec §4.5 "on creation").
    pub fn setup(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        _collab: &mut Collaborators<T, Sc>,
    ) -> hindsolve_core::Result<()> {
        let scope = Scope::open(system);
        let id = self.disjunction.id;
        let remaining: Vec<_> = system
            .active_constraints()
            .iter()
            .copied()
            .filter(|c| *c != id)
            .collect();
        system.set_active_constraints(remaining);
        self.removal_scope = Some(scope);

        if let Some(first) = self.disjunction.alternatives.first() {
            if let Some(var) = first.bound_var {
                let rep = system.representative_of(var);
                if let Some(decl) = system.overloads().find(rep) {
                    for (i, choice) in self.disjunction.alternatives.iter().enumerate() {
                        if choice.declaration != Some(decl) {
                            self.disabled_by_prune[i] = true;
                        }
                    }
                    tracing::debug!(
                        id = ?self.disjunction.id,
                        "pruneOverloadSet disabled choices not naming the representative's declaration"
                    );
                }
            }
        }

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

    /// Rewinds the active choice first, then D's removal — the order spec
    /// §9 mandates.
    pub fn cancel(mut self, system: &mut ConstraintSystem<T, Sc>) {
        if let Some((scope, _)) = self.active_choice.take() {
            scope.restore(system);
        }
        if let Some(scope) = self.removal_scope.take() {
            scope.restore(system);
        }
    }

    fn should_skip(&self, choice: &DisjunctionChoice<T>) -> bool {
        if self.disabled_by_prune[choice.index] || self.temp_disabled[choice.index] {
            return true;
        }
        // A generic choice is penalized but not forbidden (spec §4.5
        // rationale) — once a strictly non-generic solution has landed,
        // no generic alternative can improve on it, so skip the rest.
        choice.generic && self.best_non_generic_score.is_some()
    }

    fn next_eligible_choice(&mut self) -> Option<DisjunctionChoice<T>> {
        loop {
            let choice = self.producer.next()?;
            if !self.should_skip(&choice) {
                return Some(choice);
            }
        }
    }

    /// SPEC_FULL §9: the next choice's minimum possible score cannot beat
    /// `lastSolvedChoice`'s score — approximated as "we already have a
    /// solved choice at least as good as the system's current baseline,
    /// and the next choice can only add to that baseline (scores are
    /// monotone, spec §8 invariant 5), so it cannot win."
    fn should_short_circuit(&self, next: &DisjunctionChoice<T>, current_score: Sc) -> bool {
        match self.last_solved {
            Some((_, best)) => next.generic && current_score >= best,
            None => false,
        }
    }

    fn advance(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        collab: &mut Collaborators<T, Sc>,
        prev_failed: bool,
    ) -> hindsolve_core::Result<StepResult<T, Sc>> {
        // Step 1: fold in the just-finished attempt's bookkeeping.
        if let Some((scope, idx)) = self.active_choice.take() {
            let before = self.len_before_attempt.take().unwrap_or(0);
            let landed = !prev_failed && self.solutions.borrow().len() > before;
            if landed {
                // The nested splitter's collected solutions don't know this
                // choice's own binding (applied above their scope), so
                // stamp it in here, before the scope holding it rewinds.
                if let Some(var) = self.disjunction.alternatives[idx].bound_var {
                    if let Some(ty) = system.binding_of(var).cloned() {
                        for solution in self.solutions.borrow_mut()[before..].iter_mut() {
                            solution.bindings.insert(var, ty.clone());
                        }
                    }
                }
                let best = self.solutions.borrow()[before..]
                    .iter()
                    .map(|s| s.score)
                    .min()
                    .expect("landed implies at least one new solution");
                self.last_solved = Some((idx, best));
                if !self.disjunction.alternatives[idx].generic {
                    self.best_non_generic_score = Some(match self.best_non_generic_score {
                        Some(cur) if cur <= best => cur,
                        _ => best,
                    });
                }
            }
            for flag in self.temp_disabled.iter_mut() {
                *flag = false;
            }
            scope.restore(system);
        }

        loop {
            // Step 2: short-circuit check.
            if collab.disjunction_short_circuit {
                if let Some(next) = self.producer.peek() {
                    if self.should_short_circuit(next, system.score()) {
                        tracing::debug!(id = ?self.disjunction.id, "disjunction short-circuit fired");
                        break;
                    }
                }
            }

            // Step 3/4: advance the producer past any choice to skip.
            let Some(choice) = self.next_eligible_choice() else {
                break;
            };

            // Step 5: open a scope, disable siblings, apply the choice.
            let before_len = self.solutions.borrow().len();
            let scope = Scope::open(system);
            for (i, flag) in self.temp_disabled.iter_mut().enumerate() {
                if i != choice.index {
                    *flag = true;
                }
            }
            match collab.simplifier.apply_choice(system, &choice) {
                Ok(()) => {
                    self.active_choice = Some((scope, choice.index));
                    self.len_before_attempt = Some(before_len);
                    transition(&mut self.state, StepState::Suspended)?;
                    return Ok(StepResult::unsolved(vec![Step::Splitter(SplitterStep::new(
                        self.solutions.clone(),
                    ))]));
                }
                Err(contradiction) => {
                    scope.restore(system);
                    for flag in self.temp_disabled.iter_mut() {
                        *flag = false;
                    }
                    tracing::debug!(id = ?self.disjunction.id, %contradiction, "choice rejected");
                    continue;
                }
            }
        }

        if let Some(scope) = self.removal_scope.take() {
            scope.restore(system);
        }
        apply_filter(&self.solutions, collab);
        transition(&mut self.state, StepState::Done)?;
        Ok(if self.last_solved.is_some() {
            StepResult::solved()
        } else {
            StepResult::error()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsolve_core::{Binding, Constraint, ConstraintId, Contradiction, DefaultScore, GraphPartition, MinimumScoreFilter};

    #[derive(Debug)]
    struct NoopSimplifier;

    impl hindsolve_core::Simplifier<i32, DefaultScore> for NoopSimplifier {
        fn simplify_component(
            &mut self,
            _system: &mut ConstraintSystem<i32, DefaultScore>,
            _constraints: &[ConstraintId],
        ) -> hindsolve_core::SimplifyOutcome {
            unimplemented!("setup() never consults the simplifier")
        }

        fn apply_binding(
            &mut self,
            _system: &mut ConstraintSystem<i32, DefaultScore>,
            _var: TypeVariableId,
            _binding: &Binding<i32>,
        ) -> Result<(), Contradiction> {
            unimplemented!("setup() never consults the simplifier")
        }

        fn apply_choice(
            &mut self,
            _system: &mut ConstraintSystem<i32, DefaultScore>,
            _choice: &DisjunctionChoice<i32>,
        ) -> Result<(), Contradiction> {
            unimplemented!("setup() never consults the simplifier")
        }
    }

    #[derive(Debug)]
    struct NoopGraph;

    impl hindsolve_core::ConstraintGraphOps<i32, DefaultScore> for NoopGraph {
        fn connected_components(
            &self,
            _system: &ConstraintSystem<i32, DefaultScore>,
            _active: &[ConstraintId],
        ) -> GraphPartition {
            unimplemented!("setup() never consults the graph")
        }

        fn add_constraint(&mut self, _system: &ConstraintSystem<i32, DefaultScore>, _id: ConstraintId) {}
        fn remove_constraint(&mut self, _id: ConstraintId) {}
    }

    fn choice(index: usize, bound_var: TypeVariableId, decl: hindsolve_core::OverloadDeclId) -> DisjunctionChoice<i32> {
        DisjunctionChoice {
            index,
            nested: Box::new(Constraint::OverloadBinding { var: bound_var, declarations: vec![decl] }),
            generic: false,
            declaration: Some(decl),
            bound_var: Some(bound_var),
        }
    }

    // Exercises `setup()` (spec §4.5's `pruneOverloadSet`) directly,
    // without driving a whole solve: a second variable already unioned
    // into a first variable's equivalence class, whose representative has
    // an existing overload record, must disable every alternative naming a
    // different declaration.
    #[test]
    fn prune_overload_set_disables_alternatives_not_matching_the_representatives_resolution() {
        let mut system: ConstraintSystem<i32, DefaultScore> = ConstraintSystem::new();
        let g = system.alloc_type_variable(vec![]);
        let h = system.alloc_type_variable(vec![]);
        system.union(h, g);

        let int_decl = hindsolve_core::OverloadDeclId::new(0);
        let float_decl = hindsolve_core::OverloadDeclId::new(1);
        system.record_overload(g, int_decl);

        let disjunction = Disjunction::new(ConstraintId::new(0), vec![choice(0, h, float_decl), choice(1, h, int_decl)]);
        let mut step: DisjunctionStep<i32, DefaultScore> = DisjunctionStep::new(disjunction, crate::driver::new_buffer());

        let mut simplifier = NoopSimplifier;
        let mut graph = NoopGraph;
        let filter = MinimumScoreFilter;
        let mut collab = Collaborators {
            simplifier: &mut simplifier,
            graph: &mut graph,
            filter: &filter,
            retain_all_solutions: false,
            literal_default_early_exit: true,
            disjunction_short_circuit: true,
        };

        step.setup(&mut system, &mut collab).unwrap();

        assert!(step.disabled_by_prune[0], "mismatched alternative must be pruned");
        assert!(!step.disabled_by_prune[1], "the matching alternative must stay eligible");
    }

    #[test]
    fn prune_overload_set_is_a_no_op_before_anything_resolves() {
        let mut system: ConstraintSystem<i32, DefaultScore> = ConstraintSystem::new();
        let g = system.alloc_type_variable(vec![]);

        let int_decl = hindsolve_core::OverloadDeclId::new(0);
        let float_decl = hindsolve_core::OverloadDeclId::new(1);
        let disjunction = Disjunction::new(ConstraintId::new(0), vec![choice(0, g, int_decl), choice(1, g, float_decl)]);
        let mut step: DisjunctionStep<i32, DefaultScore> = DisjunctionStep::new(disjunction, crate::driver::new_buffer());

        let mut simplifier = NoopSimplifier;
        let mut graph = NoopGraph;
        let filter = MinimumScoreFilter;
        let mut collab = Collaborators {
            simplifier: &mut simplifier,
            graph: &mut graph,
            filter: &filter,
            retain_all_solutions: false,
            literal_default_early_exit: true,
            disjunction_short_circuit: true,
        };

        step.setup(&mut system, &mut collab).unwrap();

        assert!(!step.disabled_by_prune[0]);
        assert!(!step.disabled_by_prune[1]);
    }
}

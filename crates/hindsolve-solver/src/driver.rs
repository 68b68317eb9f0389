//! The work-list driver (spec §4.1).
//!
//! Holds a LIFO stack of pending steps and dispatches `setup`/`take`/
//! `resume`, propagating each step's `prevFailed` signal to its resuming
//! parent, and unwinding on a step or wall-clock budget.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use hindsolve_core::{ConstraintGraphOps, ConstraintSystem, Score, Simplifier, Solution, SolutionFilter, TypeRepr};
use hindsolve_config::SolverConfig;

use crate::splitter::SplitterStep;
use crate::step::{Collaborators, Step, StepOutcome, StepState};

/// The shared destination buffer a step's attempts push completed
/// solutions into (spec §3's "destination solution buffer"). `Rc<RefCell<_>>`
/// because ownership of a step moves into the work list while its buffer
/// must still be reachable from the parent that allocated it.
pub type SolutionBuffer<T, Sc> = Rc<RefCell<Vec<Solution<T, Sc>>>>;

pub fn new_buffer<T: TypeRepr, Sc: Score>() -> SolutionBuffer<T, Sc> {
    Rc::new(RefCell::new(Vec::new()))
}

/// Terminal disposition of a `solve` call (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Complete,
    Incomplete,
    Failed,
}

/// Per-solve counters, collected unconditionally (single-threaded, plain
/// counters — SPEC_FULL §4.8).
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverStatistics {
    pub steps_popped: u64,
    pub splitter_steps: u64,
    pub component_steps: u64,
    pub type_variable_steps: u64,
    pub disjunction_steps: u64,
    pub scopes_opened: u64,
    pub max_scope_depth: usize,
    pub solutions_emitted: u64,
    pub solutions_surviving_filter: u64,
}

impl DriverStatistics {
    fn record_pop(&mut self, kind: &str) {
        self.steps_popped += 1;
        match kind {
            "Splitter" => self.splitter_steps += 1,
            "Component" => self.component_steps += 1,
            "TypeVariable" => self.type_variable_steps += 1,
            "Disjunction" => self.disjunction_steps += 1,
            _ => {}
        }
    }
}

/// One entry on the work list: the step, and whether its most recently
/// completed sibling follow-up failed.
struct WorkEntry<T: TypeRepr, Sc: Score> {
    step: Step<T, Sc>,
    prev_failed: bool,
}

/// The stack-based scheduler (spec §4.1). Single-threaded, cooperative, no
/// preemption (spec §5) — everything here runs on the caller's stack.
pub struct Driver<T: TypeRepr, Sc: Score> {
    work: VecDeque<WorkEntry<T, Sc>>,
    config: SolverConfig,
    stats: DriverStatistics,
    deadline: Option<Instant>,
    budget_exceeded: bool,
}

impl<T: TypeRepr, Sc: Score> Driver<T, Sc> {
    pub fn new(config: SolverConfig) -> Self {
        let deadline = config.deadline().map(|d: Duration| Instant::now() + d);
        Driver {
            work: VecDeque::new(),
            config,
            stats: DriverStatistics::default(),
            deadline,
            budget_exceeded: false,
        }
    }

    fn push(&mut self, step: Step<T, Sc>) {
        self.work.push_back(WorkEntry { step, prev_failed: false });
    }

    /// Pushes `followups` so index 0 executes first (spec §4.1: "pushed in
    /// order such that index 0 executes first [stack push in reverse]").
    fn push_followups(&mut self, followups: Vec<Step<T, Sc>>) {
        for step in followups.into_iter().rev() {
            self.push(step);
        }
    }

    fn budget_exhausted(&self) -> bool {
        if self.stats.steps_popped >= self.config.max_steps {
            return true;
        }
        if let Some(deadline) = self.deadline {
            return Instant::now() >= deadline;
        }
        false
    }

    /// Runs the work loop to completion, a budget cutoff, or a fatal
    /// invariant violation (which propagates as `Err` and aborts the
    /// solve, per spec §7).
    pub fn run(
        &mut self,
        system: &mut ConstraintSystem<T, Sc>,
        simplifier: &mut dyn Simplifier<T, Sc>,
        graph: &mut dyn ConstraintGraphOps<T, Sc>,
        filter: &dyn SolutionFilter<T, Sc>,
        top_level_buffer: SolutionBuffer<T, Sc>,
    ) -> hindsolve_core::Result<()> {
        let mut collab = Collaborators {
            simplifier,
            graph,
            filter,
            retain_all_solutions: self.config.retain_all_solutions,
            literal_default_early_exit: self.config.literal_default_early_exit,
            disjunction_short_circuit: self.config.disjunction_short_circuit,
        };

        self.push(Step::Splitter(SplitterStep::new(top_level_buffer)));

        while let Some(mut entry) = self.work.pop_back() {
            if self.budget_exhausted() {
                tracing::info!(steps = self.stats.steps_popped, "driver budget exceeded, unwinding");
                self.budget_exceeded = true;
                // Cancel the step we just popped, then drain the rest of
                // the work list LIFO, explicitly restoring every live
                // scope (spec §5: cancellation unwinds in LIFO order).
                entry.step.cancel(system);
                while let Some(leftover) = self.work.pop_back() {
                    leftover.step.cancel(system);
                }
                break;
            }

            self.stats.record_pop(entry.step.kind_name());
            tracing::debug!(kind = entry.step.kind_name(), state = ?entry.step.state(), "pop");

            let result = match entry.step.state() {
                StepState::Setup => {
                    entry.step.setup(system, &mut collab)?;
                    continue_with_push(self, entry);
                    continue;
                }
                StepState::Ready => entry.step.take(system, &mut collab, entry.prev_failed)?,
                StepState::Suspended => entry.step.resume(system, &mut collab, entry.prev_failed)?,
                other => {
                    return Err(hindsolve_core::SolveError::InvariantViolation(format!(
                        "driver popped a step in state {other:?}"
                    )));
                }
            };

            match result.outcome {
                StepOutcome::Unsolved => {
                    debug_assert_eq!(entry.step.state(), StepState::Suspended);
                    self.push(entry.step);
                    self.push_followups(result.followups);
                }
                StepOutcome::Solved | StepOutcome::Error => {
                    debug_assert_eq!(entry.step.state(), StepState::Done);
                    let failed = matches!(result.outcome, StepOutcome::Error);
                    if let Some(parent) = self.work.back_mut() {
                        parent.prev_failed = failed;
                    }
                }
            }
        }

        self.stats.max_scope_depth = system.max_scope_depth();
        self.stats.scopes_opened = system.scopes_opened();
        self.stats.solutions_emitted = system.solutions_emitted();
        Ok(())
    }

    pub fn statistics(&self) -> DriverStatistics {
        self.stats
    }

    pub fn budget_was_exceeded(&self) -> bool {
        self.budget_exceeded
    }
}

/// Re-pushes a step after `setup()` moved it to `Ready`, so the next pop
/// calls `take`. Split out only to keep `run`'s match arms readable.
fn continue_with_push<T: TypeRepr, Sc: Score>(driver: &mut Driver<T, Sc>, entry: WorkEntry<T, Sc>) {
    driver.work.push_back(entry);
}

/// Runs the step machine to completion over `initial_system` (spec §6's
/// `solve(initialConstraintSystem) -> (solutions, status)`).
pub fn solve<T: TypeRepr, Sc: Score>(
    mut system: ConstraintSystem<T, Sc>,
    simplifier: &mut dyn Simplifier<T, Sc>,
    graph: &mut dyn ConstraintGraphOps<T, Sc>,
    filter: &dyn SolutionFilter<T, Sc>,
    config: SolverConfig,
) -> (Vec<Solution<T, Sc>>, SolveStatus, DriverStatistics) {
    let top_level_buffer = new_buffer();
    let mut driver = Driver::new(config);

    tracing::info!("solve starting");
    let outcome = driver.run(&mut system, simplifier, graph, filter, top_level_buffer.clone());

    // Spec §7: an invariant violation is fatal and aborts the solve rather
    // than being reported as an ordinary failed result.
    if let Err(hindsolve_core::SolveError::InvariantViolation(msg)) = &outcome {
        tracing::error!(%msg, "aborting solve: invariant violation");
        panic!("hindsolve invariant violation: {msg}");
    }

    let solutions = top_level_buffer.borrow().clone();
    let status = match outcome {
        Err(_) => SolveStatus::Failed,
        Ok(()) if driver.budget_was_exceeded() => SolveStatus::Incomplete,
        Ok(()) if solutions.is_empty() => SolveStatus::Failed,
        Ok(()) => SolveStatus::Complete,
    };

    let mut stats = driver.statistics();
    stats.solutions_surviving_filter = solutions.len() as u64;
    tracing::info!(?status, solutions = solutions.len(), "solve finished");

    (solutions, status, stats)
}

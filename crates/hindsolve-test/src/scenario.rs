//! End-to-end scenarios over the toy collaborators, grounded in the
//! solver's documented invariants and boundary cases: independent
//! components merge via cross product, a non-generic overload choice
//! short-circuits its generic siblings, a literal-default candidate is
//! tried only once every bound candidate has failed, a chained overload
//! resolution stays consistent with an earlier one sharing its gate
//! variable, a starved step budget surfaces as `Incomplete`, and a
//! disjunction whose every alternative contradicts a sibling constraint
//! cascades to a failed solve.
//!
//! Each `build_*` function returns a ready-to-solve system paired with a
//! populated [`ToySimplifier`]; [`ToyGraph`] and a [`hindsolve_config::SolverConfig`]
//! are supplied separately since most scenarios just use the defaults.

use hindsolve_core::{
    Binding, Constraint, ConstraintSystem, DefaultScore, Disjunction, DisjunctionChoice, OverloadDeclId, TypeVariableId,
};

use crate::simplifier::ToySimplifier;
use crate::ty::Ty;

type System = ConstraintSystem<Ty, DefaultScore>;

/// S1: `T ⊆ {Int, Float}`, `U ⊆ {Int}`, `T == U`. Only `T = Int` is
/// consistent with `U`'s sole candidate, so exactly one solution survives.
pub fn build_s1() -> (System, ToySimplifier) {
    let mut system = System::new();
    let t = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::Int), Binding::direct_subtype(Ty::Float)]);
    let u = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::Int)]);
    system.alloc_constraint(Constraint::Equality { a: t, b: u });
    (system, ToySimplifier::new())
}

/// S2: two type variables, each with its own two-way choice and no
/// constraint relating them to each other — independent components that
/// the top-level splitter must merge as a cross product.
pub fn build_s2() -> (System, ToySimplifier) {
    let mut system = System::new();
    let a = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::Int), Binding::direct_subtype(Ty::String)]);
    let b = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::Int), Binding::direct_subtype(Ty::String)]);
    // `Conformance{a, a}` keeps each variable in the active graph (a
    // variable touched by no constraint never surfaces in a component) and
    // is trivially satisfiable by any binding.
    system.alloc_constraint(Constraint::Conformance { sub: a, sup: a });
    system.alloc_constraint(Constraint::Conformance { sub: b, sup: b });
    (system, ToySimplifier::new())
}

/// One disjunction over three overload alternatives — a cheap non-generic
/// one first, then two generic ones. Once the non-generic alternative
/// solves, `DisjunctionStep::should_skip` must suppress both generic
/// siblings (spec §4.5) rather than scoring and keeping them.
pub fn build_generic_overload_skip() -> (System, ToySimplifier) {
    let mut system = System::new();
    let int_decl = OverloadDeclId::new(0);
    let float_decl = OverloadDeclId::new(1);
    let string_decl = OverloadDeclId::new(2);

    let v = system.alloc_type_variable(vec![]);
    let alternatives = vec![
        choice(0, v, int_decl, false),
        choice(1, v, float_decl, true),
        choice(2, v, string_decl, true),
    ];
    // The only constraint allocated in this system, so its id is known
    // ahead of the `alloc_constraint` call that needs it.
    let disjunction_id = hindsolve_core::ConstraintId::new(0);
    system.alloc_constraint(Constraint::Disjunction(Disjunction::new(disjunction_id, alternatives)));

    let mut simplifier = ToySimplifier::new();
    simplifier.declarations.insert(int_decl, Ty::Int);
    simplifier.declarations.insert(float_decl, Ty::Float);
    simplifier.declarations.insert(string_decl, Ty::String);
    (system, simplifier)
}

/// S3: a chained operator `a + b + c`, each `+` a disjunction over
/// `{int+int, float+float}`. The two disjunctions share a gate variable —
/// `d2`'s bound variable `h` is unioned into `d1`'s bound variable `g`'s
/// equivalence class, representing the two operators' common operand —
/// and `d2`'s first-listed alternative is the one that *mismatches* `d1`'s
/// eventual resolution. Once `d1` resolves, `DisjunctionStep::setup`'s
/// `pruneOverloadSet` (spec §4.5) must disable that mismatched alternative
/// on `d2` before it's ever attempted; an explicit `g == h` equality
/// constraint is what would otherwise force a failed-then-retried
/// attempt, making the pruning's effect observable rather than merely
/// cosmetic.
pub fn build_s3() -> (System, ToySimplifier) {
    let mut system = System::new();
    let int_decl = OverloadDeclId::new(0);
    let float_decl = OverloadDeclId::new(1);

    let g = system.alloc_type_variable(vec![]);
    let h = system.alloc_type_variable(vec![]);
    system.union(h, g);

    // Allocated first, so its id is 0.
    let d1 = Disjunction::new(
        hindsolve_core::ConstraintId::new(0),
        vec![choice(0, g, int_decl, false), choice(1, g, float_decl, false)],
    );
    system.alloc_constraint(Constraint::Disjunction(d1));

    // Allocated second (id 1), purely to link `g` and `h` into one
    // component for the graph partitioner — `ToyGraph` only sees raw
    // variable co-occurrence within a constraint, not `system.union`.
    system.alloc_constraint(Constraint::Equality { a: g, b: h });

    // Allocated third, so its id is 2. float listed first: without
    // pruning, this is the alternative `d2` would attempt (and fail, via
    // the equality constraint above) before falling back to the one that
    // actually matches `d1`.
    let d2 = Disjunction::new(
        hindsolve_core::ConstraintId::new(2),
        vec![choice(0, h, float_decl, false), choice(1, h, int_decl, false)],
    );
    system.alloc_constraint(Constraint::Disjunction(d2));

    let mut simplifier = ToySimplifier::new();
    simplifier.declarations.insert(int_decl, Ty::Int);
    simplifier.declarations.insert(float_decl, Ty::Float);
    (system, simplifier)
}

/// S4: a type variable whose direct-subtype candidate contradicts a
/// sibling binding, leaving only its literal-default candidate viable —
/// the "literal default after failed bound candidates" boundary case.
pub fn build_s4() -> (System, ToySimplifier) {
    let mut system = System::new();
    let u = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::Int)]);
    let t = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::String), Binding::literal_default(Ty::Int)]);
    system.alloc_constraint(Constraint::Equality { a: t, b: u });
    (system, ToySimplifier::new())
}

/// S5: a 3-disjunction system, each independent and over its own
/// variable — used with a one-step budget to exercise the `Incomplete`
/// cutoff. `SolverConfig::with_max_steps(1)` halts after the very first
/// step regardless of the system's content, so the specific disjunctions
/// here matter only for grounding the scenario in spec.md's literal
/// wording, not for the assertion itself.
pub fn build_s5() -> (System, ToySimplifier) {
    let mut system = System::new();
    let int_decl = OverloadDeclId::new(0);
    let float_decl = OverloadDeclId::new(1);

    let mut simplifier = ToySimplifier::new();
    simplifier.declarations.insert(int_decl, Ty::Int);
    simplifier.declarations.insert(float_decl, Ty::Float);

    for i in 0..3u32 {
        let v = system.alloc_type_variable(vec![]);
        let alternatives = vec![choice(0, v, int_decl, false), choice(1, v, float_decl, false)];
        system.alloc_constraint(Constraint::Disjunction(Disjunction::new(hindsolve_core::ConstraintId::new(i), alternatives)));
    }
    (system, simplifier)
}

/// S6: `V <: W`, `W`'s only candidate is `String`, and a disjunction binds
/// `V` to either `Int` or `Float` — both conform-check failures against
/// `W`, so every alternative contradicts and the whole solve fails.
pub fn build_s6() -> (System, ToySimplifier) {
    let mut system = System::new();
    let int_decl = OverloadDeclId::new(0);
    let float_decl = OverloadDeclId::new(1);

    let v = system.alloc_type_variable(vec![]);
    let w = system.alloc_type_variable(vec![Binding::direct_subtype(Ty::String)]);
    // Allocated first, so the disjunction below is constraint id 1.
    system.alloc_constraint(Constraint::Conformance { sub: v, sup: w });

    let alternatives = vec![choice(0, v, int_decl, false), choice(1, v, float_decl, false)];
    let disjunction_id = hindsolve_core::ConstraintId::new(1);
    system.alloc_constraint(Constraint::Disjunction(Disjunction::new(disjunction_id, alternatives)));

    let mut simplifier = ToySimplifier::new();
    simplifier.declarations.insert(int_decl, Ty::Int);
    simplifier.declarations.insert(float_decl, Ty::Float);
    (system, simplifier)
}

/// Zero-constraint boundary case: a system with no constraints at all
/// solves trivially, with one solution binding nothing.
pub fn build_zero_constraints() -> (System, ToySimplifier) {
    (System::new(), ToySimplifier::new())
}

/// Zero-choice disjunction boundary case: a disjunction with no
/// alternatives can never land, so the solve must fail rather than hang.
pub fn build_zero_choice_disjunction() -> (System, ToySimplifier) {
    let mut system = System::new();
    let disjunction_id = hindsolve_core::ConstraintId::new(0);
    system.alloc_constraint(Constraint::Disjunction(Disjunction::new(disjunction_id, vec![])));
    (system, ToySimplifier::new())
}

fn choice(index: usize, bound_var: TypeVariableId, decl: OverloadDeclId, generic: bool) -> DisjunctionChoice<Ty> {
    DisjunctionChoice {
        index,
        nested: Box::new(Constraint::OverloadBinding { var: bound_var, declarations: vec![decl] }),
        generic,
        declaration: Some(decl),
        bound_var: Some(bound_var),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsolve_core::{MinimumScoreFilter, Solution};
    use hindsolve_solver::{solve, SolveStatus, SolverConfig};

    use crate::graph::ToyGraph;

    fn solve_default(system: System, simplifier: &mut ToySimplifier) -> (Vec<Solution<Ty, DefaultScore>>, SolveStatus) {
        let mut graph = ToyGraph::new();
        let filter = MinimumScoreFilter;
        let (solutions, status, _stats) = solve(system, simplifier, &mut graph, &filter, SolverConfig::new());
        (solutions, status)
    }

    #[test]
    fn s1_equality_narrows_to_the_shared_candidate() {
        let (system, mut simplifier) = build_s1();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].bindings.len(), 2);
        assert!(solutions[0].bindings.values().all(|ty| *ty == Ty::Int));
    }

    #[test]
    fn s2_independent_components_merge_as_a_cross_product() {
        let (system, mut simplifier) = build_s2();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        // 2 candidates x 2 candidates, all at equal score.
        assert_eq!(solutions.len(), 4);
        for solution in &solutions {
            assert_eq!(solution.bindings.len(), 2);
        }
    }

    #[test]
    fn generic_overloads_are_skipped_once_a_concrete_one_solves() {
        let (system, mut simplifier) = build_generic_overload_skip();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].score, DefaultScore::ZERO);
        assert!(solutions[0].bindings.values().all(|ty| *ty == Ty::Int));
    }

    #[test]
    fn s3_chained_overload_resolution_prunes_the_mismatched_alternative() {
        let (system, mut simplifier) = build_s3();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        // Both operators resolve to the same overload in every surviving
        // solution — `int+int` or `float+float`, never a mismatched pair —
        // and both are equal score, so neither is filtered out.
        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            assert_eq!(solution.bindings.len(), 2);
            let mut bound = solution.bindings.values().copied();
            let g = bound.next().unwrap();
            let h = bound.next().unwrap();
            assert_eq!(g, h);
        }
    }

    #[test]
    fn s4_literal_default_wins_once_the_bound_candidate_fails() {
        let (system, mut simplifier) = build_s4();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].score, DefaultScore::literal_default());
        assert!(solutions[0].bindings.values().all(|ty| *ty == Ty::Int));
    }

    #[test]
    fn s5_a_one_step_budget_yields_incomplete_not_a_panic() {
        let (system, mut simplifier) = build_s5();
        let config = SolverConfig::new().with_max_steps(1);
        let mut graph = ToyGraph::new();
        let filter = MinimumScoreFilter;
        let (solutions, status, stats) = solve(system, &mut simplifier, &mut graph, &filter, config);
        assert_eq!(status, SolveStatus::Incomplete);
        assert!(solutions.is_empty());
        assert_eq!(stats.steps_popped, 1);
    }

    #[test]
    fn s6_every_alternative_contradicting_a_sibling_fails_the_solve() {
        let (system, mut simplifier) = build_s6();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Failed);
        assert!(solutions.is_empty());
    }

    #[test]
    fn zero_constraints_solves_trivially() {
        let (system, mut simplifier) = build_zero_constraints();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Complete);
        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].bindings.is_empty());
    }

    #[test]
    fn zero_choice_disjunction_fails_rather_than_hangs() {
        let (system, mut simplifier) = build_zero_choice_disjunction();
        let (solutions, status) = solve_default(system, &mut simplifier);
        assert_eq!(status, SolveStatus::Failed);
        assert!(solutions.is_empty());
    }

    #[test]
    fn zero_deadline_yields_incomplete_immediately() {
        let (system, mut simplifier) = build_s1();
        let config = SolverConfig::new().with_deadline(std::time::Duration::from_millis(0));
        let mut graph = ToyGraph::new();
        let filter = MinimumScoreFilter;
        let (solutions, status, _stats) = solve(system, &mut simplifier, &mut graph, &filter, config);
        assert_eq!(status, SolveStatus::Incomplete);
        assert!(solutions.is_empty());
    }
}

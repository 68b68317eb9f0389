//! The shared mutable solving context.

use std::collections::BTreeMap;

use crate::binding::Binding;
use crate::constraint::Constraint;
use crate::ids::{ConstraintId, OverloadDeclId, TypeVariableId};
use crate::overload::OverloadHistory;
use crate::repr::TypeRepr;
use crate::score::Score;
use crate::type_var::TypeVariable;

/// The active constraint list, the type-variable arena, the current
/// cumulative score, and the resolved-overload history — spec §3's
/// `ConstraintSystem`. Shared by reference across all live steps; only the
/// currently executing step may mutate it (spec §5).
#[derive(Clone)]
pub struct ConstraintSystem<T: TypeRepr, Sc: Score> {
    constraints: Vec<Constraint<T>>,
    active: Vec<ConstraintId>,
    orphaned: Vec<ConstraintId>,
    type_vars: Vec<TypeVariable<T>>,
    bindings: BTreeMap<TypeVariableId, T>,
    score: Sc,
    overloads: OverloadHistory,
    scope_depth: usize,
    max_scope_depth: usize,
    scopes_opened: u64,
    solutions_emitted: u64,
}

impl<T: TypeRepr, Sc: Score> ConstraintSystem<T, Sc> {
    pub fn new() -> Self {
        ConstraintSystem {
            constraints: Vec::new(),
            active: Vec::new(),
            orphaned: Vec::new(),
            type_vars: Vec::new(),
            bindings: BTreeMap::new(),
            score: Sc::zero(),
            overloads: OverloadHistory::empty(),
            scope_depth: 0,
            max_scope_depth: 0,
            scopes_opened: 0,
            solutions_emitted: 0,
        }
    }

    // -- construction -----------------------------------------------------

    /// Allocates a new type variable with its candidate bindings already in
    /// priority order.
    pub fn alloc_type_variable(&mut self, candidates: Vec<Binding<T>>) -> TypeVariableId {
        let id = TypeVariableId::new(self.type_vars.len() as u32);
        self.type_vars.push(TypeVariable::new(id, candidates));
        id
    }

    /// Allocates a new constraint, marking it active immediately.
    pub fn alloc_constraint(&mut self, constraint: Constraint<T>) -> ConstraintId {
        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);
        self.active.push(id);
        id
    }

    // -- constraints --------------------------------------------------------

    pub fn constraint(&self, id: ConstraintId) -> &Constraint<T> {
        &self.constraints[id.index()]
    }

    pub fn active_constraints(&self) -> &[ConstraintId] {
        &self.active
    }

    pub fn set_active_constraints(&mut self, active: Vec<ConstraintId>) {
        self.active = active;
    }

    pub fn orphaned_constraints(&self) -> &[ConstraintId] {
        &self.orphaned
    }

    pub fn set_orphaned_constraints(&mut self, orphaned: Vec<ConstraintId>) {
        self.orphaned = orphaned;
    }

    // -- type variables -----------------------------------------------------

    pub fn type_variable(&self, id: TypeVariableId) -> &TypeVariable<T> {
        &self.type_vars[id.index()]
    }

    pub fn type_variables(&self) -> &[TypeVariable<T>] {
        &self.type_vars
    }

    pub fn set_type_variables(&mut self, vars: Vec<TypeVariable<T>>) {
        self.type_vars = vars;
    }

    /// Finds the union-find representative of `var`, compressing the path
    /// as it walks.
    pub fn representative_of(&mut self, var: TypeVariableId) -> TypeVariableId {
        let mut path = Vec::new();
        let mut cursor = var;
        loop {
            let rep = self.type_vars[cursor.index()].representative();
            if rep == cursor {
                break;
            }
            path.push(cursor);
            cursor = rep;
        }
        for v in path {
            self.type_vars[v.index()].set_representative(cursor);
        }
        cursor
    }

    /// Unions two variables' equivalence classes, pointing `a`'s
    /// representative at `b`'s.
    pub fn union(&mut self, a: TypeVariableId, b: TypeVariableId) {
        let ra = self.representative_of(a);
        let rb = self.representative_of(b);
        if ra != rb {
            self.type_vars[ra.index()].set_representative(rb);
        }
    }

    // -- bindings -------------------------------------------------------------

    pub fn binding_of(&self, var: TypeVariableId) -> Option<&T> {
        self.bindings.get(&var)
    }

    pub fn bind_variable(&mut self, var: TypeVariableId, ty: T) {
        self.bindings.insert(var, ty);
    }

    pub fn unbind_variable(&mut self, var: TypeVariableId) -> Option<T> {
        self.bindings.remove(&var)
    }

    pub fn bindings(&self) -> &BTreeMap<TypeVariableId, T> {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: BTreeMap<TypeVariableId, T>) {
        self.bindings = bindings;
    }

    pub fn all_bound(&self, vars: &[TypeVariableId]) -> bool {
        vars.iter().all(|v| self.bindings.contains_key(v))
    }

    // -- score ------------------------------------------------------------

    pub fn score(&self) -> Sc {
        self.score
    }

    pub fn set_score(&mut self, score: Sc) {
        self.score = score;
    }

    pub fn add_score(&mut self, delta: Sc) {
        self.score = self.score + delta;
    }

    // -- overload history ---------------------------------------------------

    pub fn overloads(&self) -> &OverloadHistory {
        &self.overloads
    }

    pub fn set_overloads(&mut self, overloads: OverloadHistory) {
        self.overloads = overloads;
    }

    pub fn record_overload(&mut self, var: TypeVariableId, declaration: OverloadDeclId) {
        self.overloads = self.overloads.push(var, declaration);
    }

    // -- scope nesting (spec §5's "nesting invariant must be enforced by
    // construction") -------------------------------------------------------

    /// Registers that a `Scope` is being opened; returns the depth it was
    /// opened at, for the matching `exit_scope` call.
    pub fn enter_scope(&mut self) -> usize {
        let depth = self.scope_depth;
        self.scope_depth += 1;
        self.max_scope_depth = self.max_scope_depth.max(self.scope_depth);
        self.scopes_opened += 1;
        depth
    }

    /// Registers that the scope opened at `depth` is being restored. Panics
    /// if scopes were not closed in LIFO order.
    pub fn exit_scope(&mut self, depth: usize) {
        assert_eq!(
            self.scope_depth,
            depth + 1,
            "scopes must be restored in LIFO order"
        );
        self.scope_depth = depth;
    }

    /// Current live scope nesting depth.
    pub fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    /// Deepest scope nesting observed so far this solve.
    pub fn max_scope_depth(&self) -> usize {
        self.max_scope_depth
    }

    /// Total number of scopes opened so far this solve.
    pub fn scopes_opened(&self) -> u64 {
        self.scopes_opened
    }

    /// Records that a step pushed a completed solution into a buffer,
    /// before any filtering runs over it.
    pub fn record_solution_emitted(&mut self) {
        self.solutions_emitted += 1;
    }

    /// Total number of solutions pushed into any buffer so far this
    /// solve, before filtering.
    pub fn solutions_emitted(&self) -> u64 {
        self.solutions_emitted
    }
}

impl<T: TypeRepr, Sc: Score> Default for ConstraintSystem<T, Sc> {
    fn default() -> Self {
        Self::new()
    }
}

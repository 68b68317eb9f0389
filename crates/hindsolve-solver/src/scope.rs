//! Scoped capture/restore of solver mutations (spec §3, §5).
//!
//! Rust's `Drop` cannot take the `&mut ConstraintSystem` a true rewind
//! needs, so `Scope` is an owned snapshot with an explicit, consuming
//! [`Scope::restore`]. A `Drop` impl still asserts every scope was in fact
//! restored before being dropped — the bug spec §8 invariant 2 exists to
//! catch.

use std::collections::BTreeMap;

use hindsolve_core::{
    ConstraintId, ConstraintSystem, OverloadHistory, Score, TypeRepr, TypeVariable, TypeVariableId,
};

/// A transactional snapshot of the mutation-sensitive slice of a
/// [`ConstraintSystem`]: the active/orphaned constraint lists, the type
/// variable arena (bindings, representatives, candidate cursors), the
/// bindings map, the score, and the overload history.
///
/// Scopes nest strictly (LIFO); `depth` records the nesting level this
/// scope was opened at so [`Scope::restore`] can catch out-of-order
/// restoration (spec §8 invariant 3).
#[derive(Debug)]
pub struct Scope<T: TypeRepr, Sc: Score> {
    depth: usize,
    active: Vec<ConstraintId>,
    orphaned: Vec<ConstraintId>,
    type_vars: Vec<TypeVariable<T>>,
    bindings: BTreeMap<TypeVariableId, T>,
    score: Sc,
    overloads: OverloadHistory,
    restored: bool,
}

impl<T: TypeRepr, Sc: Score> Scope<T, Sc> {
    /// Captures the current mutation-sensitive state of `system`.
    pub fn open(system: &mut ConstraintSystem<T, Sc>) -> Self {
        let depth = system.enter_scope();
        tracing::trace!(depth, "scope opened");
        Scope {
            depth,
            active: system.active_constraints().to_vec(),
            orphaned: system.orphaned_constraints().to_vec(),
            type_vars: system.type_variables().to_vec(),
            bindings: system.bindings().clone(),
            score: system.score(),
            overloads: system.overloads().clone(),
            restored: false,
        }
    }

    /// Restores `system` to exactly the state captured by [`Scope::open`].
    pub fn restore(mut self, system: &mut ConstraintSystem<T, Sc>) {
        system.set_active_constraints(std::mem::take(&mut self.active));
        system.set_orphaned_constraints(std::mem::take(&mut self.orphaned));
        system.set_type_variables(std::mem::take(&mut self.type_vars));
        system.set_bindings(std::mem::take(&mut self.bindings));
        system.set_score(self.score);
        system.set_overloads(self.overloads.clone());
        system.exit_scope(self.depth);
        self.restored = true;
        tracing::trace!(depth = self.depth, "scope restored");
    }

    /// The nesting depth this scope was opened at.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<T: TypeRepr, Sc: Score> Drop for Scope<T, Sc> {
    fn drop(&mut self) {
        debug_assert!(
            self.restored,
            "Scope opened at depth {} dropped without being restored",
            self.depth
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsolve_core::{Binding, DefaultScore};

    fn system_with_one_var() -> ConstraintSystem<i32, DefaultScore> {
        let mut system = ConstraintSystem::new();
        system.alloc_type_variable(vec![Binding::direct_subtype(1)]);
        system
    }

    #[test]
    fn restore_undoes_bindings_and_score() {
        let mut system = system_with_one_var();
        let var = TypeVariableId::new(0);

        let scope = Scope::open(&mut system);
        system.bind_variable(var, 1);
        system.add_score(DefaultScore::cost_of(5));
        assert!(system.binding_of(var).is_some());

        scope.restore(&mut system);
        assert!(system.binding_of(var).is_none());
        assert_eq!(system.score(), DefaultScore::ZERO);
        assert_eq!(system.scope_depth(), 0);
    }

    #[test]
    fn nested_scopes_restore_lifo() {
        let mut system = system_with_one_var();
        let outer = Scope::open(&mut system);
        system.add_score(DefaultScore::cost_of(1));
        let inner = Scope::open(&mut system);
        system.add_score(DefaultScore::cost_of(1));
        assert_eq!(system.scope_depth(), 2);

        inner.restore(&mut system);
        assert_eq!(system.scope_depth(), 1);
        assert_eq!(system.score(), DefaultScore::cost_of(1));

        outer.restore(&mut system);
        assert_eq!(system.scope_depth(), 0);
        assert_eq!(system.score(), DefaultScore::ZERO);
    }

    #[test]
    #[should_panic(expected = "LIFO")]
    fn out_of_order_restore_panics() {
        let mut system = system_with_one_var();
        let outer = Scope::open(&mut system);
        let inner = Scope::open(&mut system);
        // Restoring the outer scope first violates LIFO nesting. Forget
        // `inner` first so its own (also-panicking) Drop doesn't abort the
        // process while this panic is already unwinding.
        std::mem::forget(inner);
        outer.restore(&mut system);
    }
}

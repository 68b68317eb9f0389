//! A toy [`Simplifier`] over [`Ty`], just capable enough to drive the step
//! machine through equality, conformance, overload-binding, and disjunction
//! constraints (grounded on the method surface `hindsolve_core::simplifier`
//! declares, not on any real unification algorithm).

use std::collections::HashMap;

use hindsolve_core::{
    Binding, Constraint, ConstraintId, ConstraintSystem, Contradiction, DefaultScore, DisjunctionChoice, Simplifier,
    SimplifyOutcome, TypeVariableId,
};

use crate::ty::Ty;

/// A toy `Simplifier<Ty, DefaultScore>`. `declarations` maps each overload
/// alternative to the concrete type it would bind its variable to —
/// standing in for a real declaration table.
#[derive(Debug, Clone, Default)]
pub struct ToySimplifier {
    pub declarations: HashMap<hindsolve_core::OverloadDeclId, Ty>,
}

impl ToySimplifier {
    pub fn new() -> Self {
        ToySimplifier::default()
    }

    fn constraint_satisfied(&self, system: &ConstraintSystem<Ty, DefaultScore>, cid: ConstraintId) -> Option<bool> {
        match system.constraint(cid) {
            Constraint::Equality { a, b } => match (system.binding_of(*a), system.binding_of(*b)) {
                (Some(ta), Some(tb)) => Some(ta == tb),
                _ => None,
            },
            Constraint::Conformance { sub, sup } => match (system.binding_of(*sub), system.binding_of(*sup)) {
                (Some(t_sub), Some(t_sup)) => Some(t_sub.conforms_to(t_sup)),
                _ => None,
            },
            Constraint::OverloadBinding { var, declarations } => match system.binding_of(*var) {
                Some(bound) => Some(
                    declarations
                        .iter()
                        .any(|d| self.declarations.get(d) == Some(bound)),
                ),
                None => None,
            },
            // A disjunction is resolved once its (shared) bound variable's
            // overload record names one of this disjunction's own
            // declarations — not merely "is bound", since a sibling
            // disjunction sharing the same gate variable may have bound it
            // first (SPEC_FULL §4.5's chained-overload scenario).
            Constraint::Disjunction(d) => {
                let var = d.alternatives.iter().find_map(|c| c.bound_var)?;
                match system.overloads().find(var) {
                    Some(decl) => Some(d.alternatives.iter().any(|c| c.declaration == Some(decl))),
                    None => None,
                }
            }
        }
    }
}

impl Simplifier<Ty, DefaultScore> for ToySimplifier {
    fn simplify_component(
        &mut self,
        system: &mut ConstraintSystem<Ty, DefaultScore>,
        constraints: &[ConstraintId],
    ) -> SimplifyOutcome {
        let mut any_unresolved = false;
        for &cid in constraints {
            match self.constraint_satisfied(system, cid) {
                Some(true) => {}
                Some(false) => return SimplifyOutcome::Contradiction,
                None => any_unresolved = true,
            }
        }
        if any_unresolved {
            SimplifyOutcome::Unsolved
        } else {
            SimplifyOutcome::Solved
        }
    }

    fn apply_binding(
        &mut self,
        system: &mut ConstraintSystem<Ty, DefaultScore>,
        var: TypeVariableId,
        binding: &Binding<Ty>,
    ) -> Result<(), Contradiction> {
        if binding.source.is_literal_default() {
            system.add_score(DefaultScore::literal_default());
        }
        system.bind_variable(var, binding.ty);
        Ok(())
    }

    fn apply_choice(
        &mut self,
        system: &mut ConstraintSystem<Ty, DefaultScore>,
        choice: &DisjunctionChoice<Ty>,
    ) -> Result<(), Contradiction> {
        let (var, decl) = match (choice.bound_var, choice.declaration) {
            (Some(var), Some(decl)) => (var, decl),
            _ => {
                return Err(Contradiction(
                    "toy disjunction choices must name a bound variable and declaration".into(),
                ))
            }
        };
        if let Some(existing) = system.overloads().find(var) {
            if existing != decl {
                return Err(Contradiction(format!(
                    "{var:?} already resolved to a different overload than {decl:?}"
                )));
            }
        }
        let Some(&ty) = self.declarations.get(&decl) else {
            return Err(Contradiction(format!("unknown declaration {decl:?}")));
        };
        if choice.generic {
            system.add_score(DefaultScore::generic_overload());
        }
        system.bind_variable(var, ty);
        system.record_overload(var, decl);
        Ok(())
    }
}

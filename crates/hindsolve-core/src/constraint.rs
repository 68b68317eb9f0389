//! Constraints: the relations the solver must satisfy.

use crate::ids::{ConstraintId, OverloadDeclId, TypeVariableId};
use crate::repr::TypeRepr;

/// A typing constraint. Discriminated per spec §3: equality, conformance,
/// overload-binding, and disjunction.
#[derive(Debug, Clone)]
pub enum Constraint<T: TypeRepr> {
    /// `a == b`.
    Equality { a: TypeVariableId, b: TypeVariableId },
    /// `sub <: sup`.
    Conformance { sub: TypeVariableId, sup: TypeVariableId },
    /// `var` must resolve to one of `declarations`.
    OverloadBinding {
        var: TypeVariableId,
        declarations: Vec<OverloadDeclId>,
    },
    /// An ordered set of nested alternative constraints, each individually
    /// enablable.
    Disjunction(Disjunction<T>),
}

impl<T: TypeRepr> Constraint<T> {
    /// Free type variables this constraint references directly. Used by
    /// `ConstraintGraphOps::connected_components` to find shared-variable
    /// edges between constraints; a constraint with no free variables is
    /// orphaned (spec §4.2).
    pub fn free_variables(&self) -> Vec<TypeVariableId> {
        match self {
            Constraint::Equality { a, b } => vec![*a, *b],
            Constraint::Conformance { sub, sup } => vec![*sub, *sup],
            Constraint::OverloadBinding { var, .. } => vec![*var],
            Constraint::Disjunction(d) => d
                .alternatives
                .iter()
                .flat_map(|c| c.nested.free_variables())
                .collect(),
        }
    }
}

/// One alternative of a [`Disjunction`].
#[derive(Debug, Clone)]
pub struct DisjunctionChoice<T: TypeRepr> {
    /// Position in the disjunction's declared order.
    pub index: usize,
    /// The constraint this choice enables when selected.
    pub nested: Box<Constraint<T>>,
    /// Whether this choice names a generic overload (penalized but not
    /// forbidden, per spec §4.5).
    pub generic: bool,
    /// The overload declaration this choice names, if the disjunction is
    /// modeling an overload set. Used by `pruneOverloadSet`.
    pub declaration: Option<OverloadDeclId>,
    /// The type variable this choice's nested constraint would bind, if
    /// applicable. Used by `pruneOverloadSet` to compare against a
    /// representative already bound by a previous overload resolution.
    pub bound_var: Option<TypeVariableId>,
}

/// A constraint satisfied by exactly one of its enabled alternatives.
#[derive(Debug, Clone)]
pub struct Disjunction<T: TypeRepr> {
    pub id: ConstraintId,
    pub alternatives: Vec<DisjunctionChoice<T>>,
}

impl<T: TypeRepr> Disjunction<T> {
    pub fn new(id: ConstraintId, alternatives: Vec<DisjunctionChoice<T>>) -> Self {
        Disjunction { id, alternatives }
    }
}

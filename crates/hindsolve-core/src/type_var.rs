//! Type variables and their potential bindings.

use crate::binding::Binding;
use crate::ids::TypeVariableId;
use crate::repr::TypeRepr;

/// A type variable: a union-find node with an ordered list of candidate
/// bindings.
///
/// `candidates` must already be in priority order — direct subtype bounds
/// first, then supertypes, then literal defaults — per spec §3's
/// `PotentialBindings` description. Building that order is the external
/// simplifier/graph's job; `TypeVariable` just stores the result.
#[derive(Debug, Clone)]
pub struct TypeVariable<T: TypeRepr> {
    id: TypeVariableId,
    representative: TypeVariableId,
    candidates: Vec<Binding<T>>,
}

impl<T: TypeRepr> TypeVariable<T> {
    pub fn new(id: TypeVariableId, candidates: Vec<Binding<T>>) -> Self {
        TypeVariable {
            id,
            representative: id,
            candidates,
        }
    }

    pub fn id(&self) -> TypeVariableId {
        self.id
    }

    pub fn representative(&self) -> TypeVariableId {
        self.representative
    }

    pub fn is_representative(&self) -> bool {
        self.representative == self.id
    }

    /// Re-points this variable at a (possibly new) representative. Used by
    /// the simplifier when union-find merges two variables' equivalence
    /// classes; the step machine never calls this itself.
    pub fn set_representative(&mut self, representative: TypeVariableId) {
        self.representative = representative;
    }

    pub fn candidates(&self) -> &[Binding<T>] {
        &self.candidates
    }
}

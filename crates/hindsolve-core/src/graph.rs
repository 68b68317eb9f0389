//! The constraint graph collaborator (external, spec §1/§6).

use std::fmt::Debug;

use crate::ids::{ConstraintId, TypeVariableId};
use crate::repr::TypeRepr;
use crate::score::Score;
use crate::system::ConstraintSystem;

/// One connected component: its type variables and the constraints that
/// reference them.
#[derive(Debug, Clone)]
pub struct ComponentPlan {
    pub type_vars: Vec<TypeVariableId>,
    pub constraints: Vec<ConstraintId>,
}

/// The result of partitioning an active constraint set (spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct GraphPartition {
    /// Numbered by smallest type-variable id in the component, ascending.
    pub components: Vec<ComponentPlan>,
    /// Constraints with no free type variables at partition time.
    pub orphans: Vec<ConstraintId>,
}

/// Consumed from the constraint graph (spec §6).
pub trait ConstraintGraphOps<T: TypeRepr, Sc: Score>: Debug {
    /// Computes connected components over `active`: two constraints share a
    /// component iff they share a free type variable (via this graph's
    /// adjacency), and a constraint with no free variables is orphaned.
    fn connected_components(
        &self,
        system: &ConstraintSystem<T, Sc>,
        active: &[ConstraintId],
    ) -> GraphPartition;

    fn add_constraint(&mut self, system: &ConstraintSystem<T, Sc>, id: ConstraintId);

    fn remove_constraint(&mut self, id: ConstraintId);
}

//! A toy [`ConstraintGraphOps`] over [`Ty`]: union-find over each
//! constraint's not-yet-bound free variables, grouping constraints into
//! components by shared unbound variable (spec §4.2).

use std::collections::HashMap;

use hindsolve_core::{ComponentPlan, ConstraintGraphOps, ConstraintId, ConstraintSystem, DefaultScore, GraphPartition, TypeVariableId};

use crate::ty::Ty;

#[derive(Debug, Clone, Default)]
pub struct ToyGraph;

impl ToyGraph {
    pub fn new() -> Self {
        ToyGraph
    }

    fn find(parent: &mut HashMap<TypeVariableId, TypeVariableId>, v: TypeVariableId) -> TypeVariableId {
        let p = *parent.entry(v).or_insert(v);
        if p == v {
            v
        } else {
            let root = Self::find(parent, p);
            parent.insert(v, root);
            root
        }
    }

    fn union(parent: &mut HashMap<TypeVariableId, TypeVariableId>, a: TypeVariableId, b: TypeVariableId) {
        let ra = Self::find(parent, a);
        let rb = Self::find(parent, b);
        if ra != rb {
            parent.insert(ra, rb);
        }
    }
}

impl ConstraintGraphOps<Ty, DefaultScore> for ToyGraph {
    fn connected_components(
        &self,
        system: &ConstraintSystem<Ty, DefaultScore>,
        active: &[ConstraintId],
    ) -> GraphPartition {
        let mut parent: HashMap<TypeVariableId, TypeVariableId> = HashMap::new();
        let mut unbound_of: HashMap<ConstraintId, Vec<TypeVariableId>> = HashMap::new();
        let mut orphans = Vec::new();

        for &cid in active {
            let free = system.constraint(cid).free_variables();
            let unbound: Vec<TypeVariableId> = free.into_iter().filter(|v| system.binding_of(*v).is_none()).collect();
            if unbound.is_empty() {
                orphans.push(cid);
                continue;
            }
            for v in &unbound {
                Self::find(&mut parent, *v);
            }
            for pair in unbound.windows(2) {
                Self::union(&mut parent, pair[0], pair[1]);
            }
            unbound_of.insert(cid, unbound);
        }

        let mut groups: HashMap<TypeVariableId, (Vec<TypeVariableId>, Vec<ConstraintId>)> = HashMap::new();
        for &cid in active {
            let Some(unbound) = unbound_of.get(&cid) else { continue };
            let root = Self::find(&mut parent, unbound[0]);
            let entry = groups.entry(root).or_default();
            entry.1.push(cid);
            for v in unbound {
                if !entry.0.contains(v) {
                    entry.0.push(*v);
                }
            }
        }

        let mut components: Vec<ComponentPlan> = groups
            .into_values()
            .map(|(mut type_vars, constraints)| {
                type_vars.sort();
                ComponentPlan { type_vars, constraints }
            })
            .collect();
        components.sort_by_key(|c| c.type_vars.iter().copied().min());

        GraphPartition { components, orphans }
    }

    fn add_constraint(&mut self, _system: &ConstraintSystem<Ty, DefaultScore>, _id: ConstraintId) {}

    fn remove_constraint(&mut self, _id: ConstraintId) {}
}

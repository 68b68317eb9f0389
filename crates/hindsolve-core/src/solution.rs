//! Complete, scored assignments produced by terminal steps.

use std::collections::BTreeMap;

use crate::ids::TypeVariableId;
use crate::overload::OverloadHistory;
use crate::repr::TypeRepr;
use crate::score::Score;

/// A fully determined, scored, mutually consistent assignment surviving
/// filtering (spec §3's `Solution`).
#[derive(Debug, Clone)]
pub struct Solution<T: TypeRepr, Sc: Score> {
    pub bindings: BTreeMap<TypeVariableId, T>,
    pub resolved_overloads: OverloadHistory,
    pub score: Sc,
}

impl<T: TypeRepr, Sc: Score> Solution<T, Sc> {
    pub fn new(
        bindings: BTreeMap<TypeVariableId, T>,
        resolved_overloads: OverloadHistory,
        score: Sc,
    ) -> Self {
        Solution {
            bindings,
            resolved_overloads,
            score,
        }
    }

    /// Merges this solution with another, produced by an independent
    /// component, into a single assignment with summed score delta
    /// (spec §4.2's cross-product merge). Panics if the two solutions
    /// disagree on a shared variable — components are disjoint by
    /// construction, so this should never happen outside a bug.
    pub fn merge(mut self, other: Solution<T, Sc>) -> Solution<T, Sc> {
        for (var, ty) in other.bindings {
            let prior = self.bindings.insert(var, ty);
            debug_assert!(prior.is_none(), "merged solutions share a bound variable");
        }
        self.resolved_overloads = self.resolved_overloads.append(&other.resolved_overloads);
        self.score = self.score + other.score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OverloadDeclId;
    use crate::score::DefaultScore;

    #[test]
    fn merge_keeps_both_sides_overload_history() {
        let a = Solution::new(
            BTreeMap::new(),
            OverloadHistory::empty().push(TypeVariableId::new(0), OverloadDeclId::new(1)),
            DefaultScore::ZERO,
        );
        let b = Solution::new(
            BTreeMap::new(),
            OverloadHistory::empty().push(TypeVariableId::new(2), OverloadDeclId::new(3)),
            DefaultScore::ZERO,
        );
        let merged = a.merge(b);
        assert_eq!(merged.resolved_overloads.find(TypeVariableId::new(0)), Some(OverloadDeclId::new(1)));
        assert_eq!(merged.resolved_overloads.find(TypeVariableId::new(2)), Some(OverloadDeclId::new(3)));
    }
}

//! Persistent singly-linked history of resolved overload choices.
//!
//! Spec §3 describes the resolved-overload list as "a singly linked
//! history of bound overload choices." Implementing it as an `Rc`-linked
//! persistent list (rather than a `Vec`) makes it free to snapshot: a
//! [`Scope`](crate) only ever needs to clone the head pointer, and restore
//! is just assigning the old head back.

use std::rc::Rc;

use crate::ids::{OverloadDeclId, TypeVariableId};

struct OverloadNode {
    var: TypeVariableId,
    declaration: OverloadDeclId,
    parent: OverloadHistory,
}

/// An immutable, shareable history of overload resolutions. Cloning is
/// O(1); pushing returns a new history sharing the old one's tail.
#[derive(Clone, Default)]
pub struct OverloadHistory(Option<Rc<OverloadNode>>);

impl OverloadHistory {
    pub fn empty() -> Self {
        OverloadHistory(None)
    }

    /// Records that `var`'s representative was bound to `declaration`,
    /// returning the extended history.
    pub fn push(&self, var: TypeVariableId, declaration: OverloadDeclId) -> Self {
        OverloadHistory(Some(Rc::new(OverloadNode {
            var,
            declaration,
            parent: self.clone(),
        })))
    }

    /// Walks the history newest-first looking for a prior resolution of
    /// `var`. Used by `pruneOverloadSet` (spec §4.5) to find the
    /// declaration a representative was already bound to by an earlier
    /// overload resolution.
    pub fn find(&self, var: TypeVariableId) -> Option<OverloadDeclId> {
        self.iter().find(|(v, _)| *v == var).map(|(_, d)| d)
    }

    /// Iterates newest-first over `(type_variable, declaration)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (TypeVariableId, OverloadDeclId)> + '_ {
        let mut cursor = self.0.as_ref();
        std::iter::from_fn(move || {
            let node = cursor?;
            let item = (node.var, node.declaration);
            cursor = node.parent.0.as_ref();
            Some(item)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Combines two histories resolved by independent components into one
    /// covering both — needed when a [`Solution`](crate::solution::Solution)
    /// merge folds together ≥2 components that each resolved their own
    /// overloads (spec §4.2's cross product). Replays `other`'s entries
    /// oldest-first onto `self`, so the combined history answers `find`
    /// for either side's variables.
    pub fn append(&self, other: &OverloadHistory) -> Self {
        let mut entries: Vec<_> = other.iter().collect();
        entries.reverse();
        let mut merged = self.clone();
        for (var, declaration) in entries {
            merged = merged.push(var, declaration);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_find() {
        let h = OverloadHistory::empty();
        let h = h.push(TypeVariableId::new(0), OverloadDeclId::new(1));
        let h2 = h.push(TypeVariableId::new(2), OverloadDeclId::new(3));

        assert_eq!(h2.find(TypeVariableId::new(0)), Some(OverloadDeclId::new(1)));
        assert_eq!(h2.find(TypeVariableId::new(2)), Some(OverloadDeclId::new(3)));
        assert_eq!(h2.find(TypeVariableId::new(9)), None);
        // The original history is untouched by extending it.
        assert_eq!(h.find(TypeVariableId::new(2)), None);
    }

    #[test]
    fn append_combines_both_histories() {
        let a = OverloadHistory::empty().push(TypeVariableId::new(0), OverloadDeclId::new(10));
        let b = OverloadHistory::empty().push(TypeVariableId::new(1), OverloadDeclId::new(20));
        let combined = a.append(&b);
        assert_eq!(combined.find(TypeVariableId::new(0)), Some(OverloadDeclId::new(10)));
        assert_eq!(combined.find(TypeVariableId::new(1)), Some(OverloadDeclId::new(20)));
        // Neither original history gained the other's entry.
        assert!(a.find(TypeVariableId::new(1)).is_none());
        assert!(b.find(TypeVariableId::new(0)).is_none());
    }

    #[test]
    fn clone_is_cheap_snapshot() {
        let h = OverloadHistory::empty().push(TypeVariableId::new(0), OverloadDeclId::new(0));
        let snapshot = h.clone();
        let extended = h.push(TypeVariableId::new(1), OverloadDeclId::new(1));
        assert!(snapshot.find(TypeVariableId::new(1)).is_none());
        assert!(extended.find(TypeVariableId::new(1)).is_some());
    }
}

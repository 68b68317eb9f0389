//! Score trait and the default scalar-tuple implementation.
//!
//! Score arithmetic itself is an external collaborator (spec §6: "consumed
//! from scoring"); the step machine only needs a totally ordered,
//! monotonically-accumulating value where lower is better. `DefaultScore`
//! is the one concrete implementation this crate ships, for use by the toy
//! collaborators in `hindsolve-test` and by callers who have no existing
//! score type of their own.

use std::fmt::Debug;
use std::ops::{Add, Sub};

/// A totally ordered, additive score. Lower is better — this falls out of
/// `Ord` directly (smaller tuples compare `Less`), so no inversion wrapper
/// is needed anywhere a `Score` is compared. `Sub` lets a splitter recover
/// each component's own contribution from an absolute captured score
/// (spec §4.2's "score delta against the splitter's entry score").
pub trait Score:
    Copy + Debug + Default + Send + Sync + Eq + Ord + Add<Output = Self> + Sub<Output = Self> + 'static
{
    /// The identity element for accumulation.
    fn zero() -> Self {
        Self::default()
    }
}

/// Default score: a three-level tuple compared lexicographically.
///
/// Levels, highest priority first:
/// 1. `generic_overloads` — count of generic (penalized) overload choices
///    taken instead of a concrete one.
/// 2. `literal_defaults` — count of literal-default bindings used instead
///    of a direct or supertype binding.
/// 3. `cost` — an opaque accumulator for any other per-choice cost the
///    simplifier wants to track (e.g. supertype distance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefaultScore {
    pub generic_overloads: u32,
    pub literal_defaults: u32,
    pub cost: u32,
}

impl DefaultScore {
    pub const ZERO: DefaultScore = DefaultScore {
        generic_overloads: 0,
        literal_defaults: 0,
        cost: 0,
    };

    pub const fn new(generic_overloads: u32, literal_defaults: u32, cost: u32) -> Self {
        DefaultScore {
            generic_overloads,
            literal_defaults,
            cost,
        }
    }

    pub const fn generic_overload() -> Self {
        DefaultScore::new(1, 0, 0)
    }

    pub const fn literal_default() -> Self {
        DefaultScore::new(0, 1, 0)
    }

    pub const fn cost_of(cost: u32) -> Self {
        DefaultScore::new(0, 0, cost)
    }
}

impl Add for DefaultScore {
    type Output = DefaultScore;

    fn add(self, other: DefaultScore) -> DefaultScore {
        DefaultScore {
            generic_overloads: self.generic_overloads + other.generic_overloads,
            literal_defaults: self.literal_defaults + other.literal_defaults,
            cost: self.cost + other.cost,
        }
    }
}

impl Sub for DefaultScore {
    type Output = DefaultScore;

    fn sub(self, other: DefaultScore) -> DefaultScore {
        DefaultScore {
            generic_overloads: self.generic_overloads - other.generic_overloads,
            literal_defaults: self.literal_defaults - other.literal_defaults,
            cost: self.cost - other.cost,
        }
    }
}

impl Score for DefaultScore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_is_better() {
        assert!(DefaultScore::ZERO < DefaultScore::literal_default());
        assert!(DefaultScore::literal_default() < DefaultScore::generic_overload());
    }

    #[test]
    fn accumulates_additively() {
        let total = DefaultScore::literal_default() + DefaultScore::cost_of(3);
        assert_eq!(total, DefaultScore::new(0, 1, 3));
    }

    #[test]
    fn subtraction_recovers_a_delta() {
        let entry = DefaultScore::cost_of(2);
        let after = entry + DefaultScore::literal_default();
        assert_eq!(after - entry, DefaultScore::literal_default());
    }
}

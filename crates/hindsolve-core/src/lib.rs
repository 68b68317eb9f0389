//! hindsolve-core — data model and collaborator traits for the hindsolve
//! constraint solver.
//!
//! This crate provides the fundamental abstractions shared by
//! `hindsolve-solver` and its embedders:
//! - The shared mutable solving context (`ConstraintSystem`)
//! - Constraint, type-variable, binding, and solution types
//! - Score trait + a default scalar-tuple score
//! - Narrow traits for the external simplifier, constraint graph, and
//!   solution filter collaborators

pub mod binding;
pub mod constraint;
pub mod error;
pub mod filter;
pub mod graph;
pub mod ids;
pub mod overload;
pub mod repr;
pub mod score;
pub mod simplifier;
pub mod solution;
pub mod system;
pub mod type_var;

pub use binding::{Binding, BindingSource};
pub use constraint::{Constraint, Disjunction, DisjunctionChoice};
pub use error::{Contradiction, Result, SolveError};
pub use filter::{MinimumScoreFilter, RetainAllFilter, SolutionFilter};
pub use graph::{ComponentPlan, ConstraintGraphOps, GraphPartition};
pub use ids::{ConstraintId, OverloadDeclId, TypeVariableId};
pub use overload::OverloadHistory;
pub use repr::TypeRepr;
pub use score::{DefaultScore, Score};
pub use simplifier::{Simplifier, SimplifyOutcome};
pub use solution::Solution;
pub use system::ConstraintSystem;
pub use type_var::TypeVariable;

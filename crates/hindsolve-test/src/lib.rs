//! Shared test fixtures for hindsolve crates.
//!
//! This crate provides a minimal concrete collaborator set — [`Ty`], a toy
//! [`Simplifier`](hindsolve_core::Simplifier), and a toy
//! [`ConstraintGraphOps`](hindsolve_core::ConstraintGraphOps) — plus a set of
//! schematic end-to-end scenarios built on top of them.
//!
//! - [`ty`] - the toy three-primitive type representation
//! - [`simplifier`] - `ToySimplifier`, satisfying equality/conformance/
//!   overload-binding/disjunction constraints over [`Ty`]
//! - [`graph`] - `ToyGraph`, union-find partitioning over not-yet-bound
//!   free variables
//! - [`scenario`] - builder functions for the end-to-end scenarios and
//!   boundary cases, plus the test suite exercising `hindsolve_solver::solve`
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! hindsolve-test = { workspace = true }
//! ```

pub mod graph;
pub mod scenario;
pub mod simplifier;
pub mod ty;

pub use graph::ToyGraph;
pub use simplifier::ToySimplifier;
pub use ty::Ty;

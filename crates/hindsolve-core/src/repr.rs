//! Marker trait for the external type representation.
//!
//! The AST and type representation are out of scope (spec §1); the step
//! machine only needs to move these values around, compare them for
//! equality, and print them in diagnostics.

use std::fmt::Debug;

/// A concrete type representation, supplied by the embedder.
pub trait TypeRepr: Clone + Debug + PartialEq + Send + Sync + 'static {}

impl<T: Clone + Debug + PartialEq + Send + Sync + 'static> TypeRepr for T {}

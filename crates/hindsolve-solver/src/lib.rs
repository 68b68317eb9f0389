//! hindsolve-solver — the stack-based resumable step machine.
//!
//! The four step kinds (`SplitterStep`, `ComponentStep`, `TypeVariableStep`,
//! `DisjunctionStep`) share the state machine in [`step`] and the scope
//! snapshot/rewind discipline in [`scope`]; [`driver`] is the scheduler that
//! owns the work list and exposes the public [`solve`] entry point.

pub mod component;
pub mod disjunction;
pub mod driver;
pub mod producer;
pub mod scope;
pub mod splitter;
pub mod step;
pub mod type_variable;

pub use component::ComponentStep;
pub use disjunction::DisjunctionStep;
pub use driver::{solve, new_buffer, Driver, DriverStatistics, SolveStatus, SolutionBuffer};
pub use producer::{ChoiceProducer, VecCursor};
pub use scope::Scope;
pub use splitter::SplitterStep;
pub use step::{Collaborators, Step, StepOutcome, StepResult, StepState};
pub use type_variable::TypeVariableStep;

pub use hindsolve_config::SolverConfig;

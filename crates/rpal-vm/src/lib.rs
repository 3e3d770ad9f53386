#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! The CSE machine: a stack evaluator over flattened RPAL control
//! structures, with an environment tree rooted at the primitive
//! environment.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{Builtin, Closure, EnvId, EnvTree, Machine, RuntimeError, Value, evaluate};

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Control-structure format shared by the RPAL compiler and CSE machine.
//!
//! This crate contains:
//! - Control symbol definitions (`ControlOp`, `Literal`, operator kinds)
//! - The flattened program form (`Program`, indexed `Delta` blocks)
//! - A human-readable dump of control structures for debugging

pub mod ops;
pub mod program;

#[cfg(test)]
mod program_tests;

pub use ops::{BinaryOp, ControlOp, DeltaId, Literal, UnaryOp};
pub use program::{Delta, Program};

//! The flattened program form: an indexed collection of δ blocks.

use std::fmt::Write as _;

use serde::Serialize;

use crate::ops::{ControlOp, DeltaId};

/// One δ block: a flat, immutable list of control symbols.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct Delta {
    pub ops: Vec<ControlOp>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: ControlOp) {
        self.ops.push(op);
    }
}

/// A fully flattened program. Block 0 is the entry; the machine reads
/// blocks by index and never mutates them.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct Program {
    deltas: Vec<Delta>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty block and return its index.
    pub fn alloc(&mut self) -> DeltaId {
        let id = DeltaId(self.deltas.len() as u32);
        self.deltas.push(Delta::new());
        id
    }

    pub fn block(&self, id: DeltaId) -> &Delta {
        &self.deltas[id.index()]
    }

    pub fn block_mut(&mut self, id: DeltaId) -> &mut Delta {
        &mut self.deltas[id.index()]
    }

    pub fn entry(&self) -> &Delta {
        &self.deltas[0]
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeltaId, &Delta)> {
        self.deltas
            .iter()
            .enumerate()
            .map(|(i, d)| (DeltaId(i as u32), d))
    }

    /// Human-readable dump, one block per line:
    ///
    /// ```text
    /// delta 0: gamma lambda{x.1} 5
    /// delta 1: gamma Print + 3 x
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (id, delta) in self.iter() {
            write!(out, "delta {id}:").expect("String write never fails");
            for op in &delta.ops {
                write!(out, " {op}").expect("String write never fails");
            }
            out.push('\n');
        }
        out
    }
}

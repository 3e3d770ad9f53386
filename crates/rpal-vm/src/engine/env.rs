//! The environment tree.
//!
//! Environments live in an arena and refer to their parent by index, so
//! closures can share frames without reference cycles. A frame is never
//! mutated after its binding step; the `removed` flag only affects which
//! frame counts as current when markers unwind.

use indexmap::IndexMap;

use super::intrinsics;
use super::value::Value;

/// Index of an environment in the [`EnvTree`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EnvId(u32);

impl EnvId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Frame {
    parent: Option<EnvId>,
    bindings: IndexMap<String, Value>,
    removed: bool,
}

/// Arena of environments rooted at the primitive environment `E(0)`.
#[derive(Clone, Debug)]
pub struct EnvTree {
    frames: Vec<Frame>,
}

impl EnvTree {
    /// Build the tree with `E(0)` holding the primitive bindings.
    pub fn with_primitives() -> (Self, EnvId) {
        let mut bindings = IndexMap::new();
        intrinsics::install(&mut bindings);
        let tree = Self {
            frames: vec![Frame {
                parent: None,
                bindings,
                removed: false,
            }],
        };
        (tree, EnvId(0))
    }

    /// Allocate a child environment.
    pub fn push(&mut self, parent: EnvId) -> EnvId {
        let id = EnvId(self.frames.len() as u32);
        self.frames.push(Frame {
            parent: Some(parent),
            bindings: IndexMap::new(),
            removed: false,
        });
        id
    }

    pub fn bind(&mut self, env: EnvId, name: String, value: Value) {
        self.frames[env.index()].bindings.insert(name, value);
    }

    /// Look `name` up from `env`, chasing parents.
    pub fn lookup(&self, env: EnvId, name: &str) -> Option<Value> {
        let mut current = Some(env);
        while let Some(id) = current {
            let frame = &self.frames[id.index()];
            if let Some(value) = frame.bindings.get(name) {
                return Some(value.clone());
            }
            current = frame.parent;
        }
        None
    }

    pub fn mark_removed(&mut self, env: EnvId) {
        self.frames[env.index()].removed = true;
    }

    pub fn is_removed(&self, env: EnvId) -> bool {
        self.frames[env.index()].removed
    }
}

//! Lookup of shape variants by type tag

use std::collections::BTreeMap;

use super::{Generator, ShapeKind};

/// Maps type tags to shape variants. The codec only builds shapes whose tag
/// is registered here.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    kinds: BTreeMap<&'static str, ShapeKind>,
}

impl ShapeRegistry {
    /// A registry that knows no shapes
    pub fn empty() -> Self {
        Self { kinds: BTreeMap::new() }
    }

    /// A registry with every built-in variant
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(ShapeKind::CIRCLE);
        registry.register(ShapeKind::LINE);
        registry.register(ShapeKind::POLYGON);
        registry
    }

    /// Register a variant under its tag, returning any variant it replaced
    pub fn register(&mut self, kind: ShapeKind) -> Option<ShapeKind> {
        self.kinds.insert(kind.tag(), kind)
    }

    pub fn get(&self, tag: &str) -> Option<ShapeKind> {
        self.kinds.get(tag).copied()
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

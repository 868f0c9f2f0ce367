//! Caller-supplied named instruction sets.

use crate::error::{Error, Result};
use crate::instruction::InstructionSet;
use std::collections::BTreeMap;

/// Custom instruction sets keyed by name, owned by one [`Installer`].
///
/// Stored sets are templates. [`resolve`](Self::resolve) hands out a copy,
/// so attaching the same set twice never shares a node.
///
/// [`Installer`]: crate::Installer
#[derive(Debug, Clone, Default)]
pub struct SetRegistry {
    sets: BTreeMap<String, InstructionSet>,
}

impl SetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `set` under its own name, replacing any earlier set with
    /// that name.
    pub fn register(&mut self, set: InstructionSet) -> &mut Self {
        self.sets.insert(set.name().to_string(), set);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// A fresh copy of the set registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<InstructionSet> {
        self.sets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnregisteredSet {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_set() {
        let mut tools = InstructionSet::new("tools");
        tools.package(["htop"]);

        let mut registry = SetRegistry::new();
        registry.register(tools);

        assert!(registry.contains("tools"));
        assert_eq!(registry.resolve("tools").unwrap().packages(), ["htop"]);
    }

    #[test]
    fn test_resolve_unknown_set_fails() {
        let registry = SetRegistry::new();
        assert_eq!(
            registry.resolve("missing").unwrap_err(),
            Error::UnregisteredSet {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut first = InstructionSet::new("tools");
        first.package(["htop"]);
        let mut second = InstructionSet::new("tools");
        second.package(["btop"]);

        let mut registry = SetRegistry::new();
        registry.register(first).register(second);

        assert_eq!(registry.names().collect::<Vec<_>>(), ["tools"]);
        assert_eq!(registry.resolve("tools").unwrap().packages(), ["btop"]);
    }
}

//! Process-wide diagnostic flags read from the environment.
//!
//! - `SILENT`: diagnostics are suppressed unless this is `0`.
//! - `DEBUG_TREE`: `1` dumps the instruction tree as JSON to stderr.
//!
//! Neither flag changes the generated script.

use std::env;

pub const SILENT_VAR: &str = "SILENT";
pub const DEBUG_TREE_VAR: &str = "DEBUG_TREE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub silent: bool,
    pub debug_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            silent: true,
            debug_tree: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            silent: lookup(SILENT_VAR).map_or(true, |v| v.trim() != "0"),
            debug_tree: lookup(DEBUG_TREE_VAR).is_some_and(|v| v.trim() == "1"),
        }
    }

    /// Whether the debug tree should actually be printed.
    pub fn dump_tree(&self) -> bool {
        self.debug_tree && !self.silent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_are_silent() {
        assert_eq!(settings(&[]), Settings::default());
        assert!(!Settings::default().dump_tree());
    }

    #[test]
    fn test_only_zero_disables_silence() {
        assert!(!settings(&[("SILENT", "0")]).silent);
        assert!(settings(&[("SILENT", "false")]).silent);
        assert!(settings(&[("SILENT", "1")]).silent);
    }

    #[test]
    fn test_debug_tree_requires_verbose() {
        assert!(settings(&[("DEBUG_TREE", "1")]).debug_tree);
        assert!(!settings(&[("DEBUG_TREE", "1")]).dump_tree());
        assert!(settings(&[("DEBUG_TREE", "1"), ("SILENT", "0")]).dump_tree());
        assert!(!settings(&[("DEBUG_TREE", "yes"), ("SILENT", "0")]).debug_tree);
    }
}

//! Instruction sets: named, composable fragments of provisioning intent.
//!
//! An [`InstructionSet`] holds one layer of "what should be on the host"
//! (apt sources, signing keys, architectures, PPAs, packages, commands and
//! `.deb` downloads) plus an ordered list of uniquely named children.
//! [`InstructionSet::render`] flattens the node and its subtree into shell
//! lines in a fixed order, independent of the order the fragments were
//! added in.
//!
//! # Example
//!
//! ```rust
//! use liliana::InstructionSet;
//!
//! let mut set = InstructionSet::new("tools");
//! set.ppa(["git-core/ppa"]).package(["git", "vim"]);
//!
//! let script = set.render();
//! assert!(script.contains("add-apt-repository -y ppa:git-core/ppa"));
//! assert!(script.ends_with("apt install -y git vim"));
//! ```

mod render;

pub use render::{cleanup_command, quote, REFRESH_COMMAND, TEMP_PREFIX};

use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Insertion-ordered string-keyed map. Setting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entries<V>(Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Entries<V> {
    fn set(&mut self, key: String, value: V) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for Entries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A named configuration fragment and its children.
///
/// All mutators return `&mut Self` so calls can be chained. Adding
/// architectures, pre-install commands, keys, source lists or PPAs marks
/// the node dirty, which makes [`render`](Self::render) emit an
/// `apt update` right before this node's own package install.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InstructionSet {
    name: String,
    architectures: Vec<String>,
    exec_before: Vec<String>,
    keychains: Entries<String>,
    source_lists: Entries<Vec<String>>,
    ppas: Vec<String>,
    packages: Vec<String>,
    cmds: Vec<String>,
    debs: Vec<String>,
    children: Vec<InstructionSet>,
    #[serde(skip)]
    dirty: bool,
}

fn strings(items: impl IntoIterator<Item = impl Into<String>>) -> impl Iterator<Item = String> {
    items.into_iter().map(Into::into)
}

impl InstructionSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architectures: Vec::new(),
            exec_before: Vec::new(),
            keychains: Entries::default(),
            source_lists: Entries::default(),
            ppas: Vec::new(),
            packages: Vec::new(),
            cmds: Vec::new(),
            debs: Vec::new(),
            children: Vec::new(),
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn architectures(&self) -> &[String] {
        &self.architectures
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn cmds(&self) -> &[String] {
        &self.cmds
    }

    pub fn debs(&self) -> &[String] {
        &self.debs
    }

    pub fn ppas(&self) -> &[String] {
        &self.ppas
    }

    /// Key source URL registered under a keyring filename.
    pub fn keychain_url(&self, filename: &str) -> Option<&str> {
        self.keychains.get(filename).map(String::as_str)
    }

    /// Lines registered for an apt list filename.
    pub fn source_list_lines(&self, filename: &str) -> Option<&[String]> {
        self.source_lists.get(filename).map(Vec::as_slice)
    }

    pub fn children(&self) -> &[InstructionSet] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&InstructionSet> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Mark the node dirty without adding anything.
    pub fn force_refresh(&mut self) -> &mut Self {
        self.dirty = true;
        self
    }

    /// Enable additional dpkg architectures (e.g. `i386`).
    pub fn arch(&mut self, archs: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.architectures.extend(strings(archs));
        self.force_refresh()
    }

    /// Commands run after repositories are configured but before packages
    /// are installed.
    pub fn exec_before(&mut self, cmds: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.exec_before.extend(strings(cmds));
        self.force_refresh()
    }

    /// Fetch a signing key from `url` into `/etc/apt/keyrings/<filename>`.
    pub fn keychain(&mut self, filename: impl Into<String>, url: impl Into<String>) -> &mut Self {
        self.keychains.set(filename.into(), url.into());
        self.force_refresh()
    }

    /// Write `lines` to `/etc/apt/sources.list.d/<filename>`.
    pub fn source_list(
        &mut self,
        filename: impl Into<String>,
        lines: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.source_lists
            .set(filename.into(), strings(lines).collect());
        self.force_refresh()
    }

    /// Add PPAs in `owner/repo` form.
    pub fn ppa(&mut self, ppas: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.ppas.extend(strings(ppas));
        self.force_refresh()
    }

    pub fn package(&mut self, pkgs: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.packages.extend(strings(pkgs));
        self
    }

    /// Commands run after this node's packages are installed.
    pub fn cmd(&mut self, cmds: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.cmds.extend(strings(cmds));
        self
    }

    /// Download and install `.deb` files.
    pub fn deb(&mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.debs.extend(strings(urls));
        self
    }

    /// Append a child. Fails if a child with the same name exists.
    pub fn attach_child(&mut self, child: InstructionSet) -> Result<&mut Self> {
        if self.child(&child.name).is_some() {
            return Err(Error::DuplicateChild {
                parent: self.name.clone(),
                child: child.name,
            });
        }
        self.children.push(child);
        Ok(self)
    }

    /// Remove every child with the given name. Missing names are ignored.
    pub fn detach_child(&mut self, child: impl AsRef<str>) -> &mut Self {
        let name = child.as_ref();
        self.children.retain(|c| c.name != name);
        self
    }

    /// Detach any same-named child, then attach `child` at the end.
    pub fn replace_child(&mut self, child: InstructionSet) -> &mut Self {
        self.detach_child(&child.name);
        self.children.push(child);
        self
    }
}

impl AsRef<str> for InstructionSet {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_duplicate_child_fails() {
        let mut root = InstructionSet::new("base");
        root.attach_child(InstructionSet::new("docker")).unwrap();

        let err = root.attach_child(InstructionSet::new("docker")).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateChild {
                parent: "base".into(),
                child: "docker".into()
            }
        );
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_detach_then_attach_succeeds() {
        let mut root = InstructionSet::new("base");
        root.attach_child(InstructionSet::new("docker")).unwrap();
        root.detach_child("docker");
        assert!(root.attach_child(InstructionSet::new("docker")).is_ok());
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_detach_missing_child_is_noop() {
        let mut root = InstructionSet::new("base");
        root.attach_child(InstructionSet::new("php")).unwrap();
        root.detach_child("steam");
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_detach_by_node_reference() {
        let mut root = InstructionSet::new("base");
        let steam = InstructionSet::new("steam");
        root.attach_child(steam.clone()).unwrap();
        root.detach_child(&steam);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_replace_child_keeps_single_entry() {
        let mut root = InstructionSet::new("base");
        let mut first = InstructionSet::new("vscode");
        first.package(["code"]);
        let mut second = InstructionSet::new("vscode");
        second.package(["code-insiders"]);

        root.replace_child(first).replace_child(second);

        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].packages(), ["code-insiders"]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut set = InstructionSet::new("plain");
        set.package(["vim"]).cmd(["true"]).deb(["https://example.com/a.deb"]);
        assert!(!set.is_dirty());

        let marks: [fn(&mut InstructionSet); 5] = [
            |s: &mut InstructionSet| {
                s.arch(["i386"]);
            },
            |s: &mut InstructionSet| {
                s.exec_before(["echo hi"]);
            },
            |s: &mut InstructionSet| {
                s.keychain("a.gpg", "https://example.com/a.asc");
            },
            |s: &mut InstructionSet| {
                s.source_list("a.list", ["deb https://example.com stable main"]);
            },
            |s: &mut InstructionSet| {
                s.ppa(["ondrej/php"]);
            },
        ];
        for mark in marks {
            let mut set = InstructionSet::new("dirty");
            mark(&mut set);
            assert!(set.is_dirty());
        }
    }

    #[test]
    fn test_keychain_overwrites_in_place() {
        let mut set = InstructionSet::new("keys");
        set.keychain("a.gpg", "https://one")
            .keychain("b.gpg", "https://two")
            .keychain("a.gpg", "https://three");

        assert_eq!(set.keychain_url("a.gpg"), Some("https://three"));
        let order: Vec<&str> = set.keychains.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["a.gpg", "b.gpg"]);
    }

    #[test]
    fn test_source_list_overwrites_in_place() {
        let mut set = InstructionSet::new("sources");
        set.source_list("a.list", ["deb https://old main", "deb-src https://old main"])
            .source_list("b.list", ["deb https://other main"])
            .source_list("a.list", ["deb https://new main"]);

        assert_eq!(
            set.source_list_lines("a.list"),
            Some(&["deb https://new main".to_string()][..])
        );
        let order: Vec<&str> = set.source_lists.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["a.list", "b.list"]);

        let script = set.render();
        let a_lines: Vec<&str> = script
            .lines()
            .filter(|l| l.ends_with("/etc/apt/sources.list.d/a.list"))
            .collect();
        assert_eq!(
            a_lines,
            ["echo \"deb https://new main\" | tee /etc/apt/sources.list.d/a.list"]
        );
        assert!(!script.contains("https://old"));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(InstructionSet::new("signal").to_string(), "signal");
    }

    #[test]
    fn test_debug_tree_serialization() {
        let mut root = InstructionSet::new("base");
        let mut child = InstructionSet::new("docker");
        child
            .keychain("docker.gpg", "https://download.docker.com/linux/ubuntu/gpg")
            .package(["docker-ce"]);
        root.attach_child(child).unwrap();

        let tree = serde_json::to_value(&root).unwrap();
        assert_eq!(tree["name"], "base");
        assert_eq!(tree["children"][0]["name"], "docker");
        assert_eq!(
            tree["children"][0]["keychains"]["docker.gpg"],
            "https://download.docker.com/linux/ubuntu/gpg"
        );
        assert!(tree.get("dirty").is_none());
    }
}

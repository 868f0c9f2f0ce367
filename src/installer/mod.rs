//! Installer facade: feature toggles over a root instruction set.
//!
//! Every feature method follows the same contract. A disabled toggle
//! detaches the feature's reserved child from the root (a no-op when it
//! was never enabled). An enabled toggle builds a fresh recipe node and
//! replaces any earlier node of the same name, so the last call wins.
//!
//! `package` and `deb` are different: they append to the root node itself
//! and accumulate across calls.
//!
//! # Example
//!
//! ```rust
//! use liliana::recipe::{DockerEdition, PhpOptions};
//! use liliana::Installer;
//!
//! let mut installer = Installer::new();
//! installer
//!     .docker(DockerEdition::Desktop)
//!     .php(PhpOptions {
//!         versions: vec!["8.2".into()],
//!         extensions: vec!["cli".into()],
//!         ..PhpOptions::default()
//!     })
//!     .steam(true)
//!     .package(["vim"]);
//!
//! let script = installer.build().unwrap();
//! assert!(script.starts_with("apt update"));
//! assert!(script.ends_with("rm -rf /tmp/liliana--*"));
//! ```

mod registry;

pub use registry::SetRegistry;

use crate::error::Result;
use crate::instruction::{cleanup_command, InstructionSet};
use crate::recipe::{
    apps, names, php, DockerEdition, PhpOptions, Toggle, ToolboxRelease, VsCodeChannel,
};
use tracing::{debug, info};

/// Packages the generated script itself relies on (wget, gpg, gdebi,
/// add-apt-repository). They are installed before anything else and
/// cannot be toggled off.
pub const DEPENDENT_PACKAGES: &[&str] = &[
    "software-properties-common",
    "apt-transport-https",
    "wget",
    "gdebi-core",
    "gnupg",
    "ca-certificates",
    "lsb-release",
];

/// The standalone node that installs [`DEPENDENT_PACKAGES`]. It always
/// refreshes the apt index first.
pub fn requirements() -> InstructionSet {
    let mut set = InstructionSet::new(names::REQUIREMENTS);
    set.force_refresh().package(DEPENDENT_PACKAGES.iter().copied());
    set
}

/// One-shot builder for a provisioning script.
#[derive(Debug, Clone)]
pub struct Installer {
    root: InstructionSet,
    registry: SetRegistry,
}

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer {
    pub fn new() -> Self {
        Self::with_registry(SetRegistry::new())
    }

    pub fn with_registry(registry: SetRegistry) -> Self {
        Self {
            root: InstructionSet::new(names::BASE),
            registry,
        }
    }

    pub fn root(&self) -> &InstructionSet {
        &self.root
    }

    pub fn registry(&self) -> &SetRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SetRegistry {
        &mut self.registry
    }

    /// JSON dump of the root node and all attached children.
    pub fn debug_tree(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.root)
    }

    fn toggle<T>(
        &mut self,
        name: &str,
        toggle: Toggle<T>,
        recipe: impl FnOnce(T) -> InstructionSet,
    ) -> &mut Self {
        match toggle {
            Toggle::Enabled(options) => {
                debug!(set = name, "enabling");
                self.root.replace_child(recipe(options));
            }
            Toggle::Disabled => {
                debug!(set = name, "disabling");
                self.root.detach_child(name);
            }
        }
        self
    }

    pub fn docker(&mut self, docker: impl Into<Toggle<DockerEdition>>) -> &mut Self {
        self.toggle(names::DOCKER, docker.into(), apps::docker)
    }

    pub fn php(&mut self, toggle: impl Into<Toggle<PhpOptions>>) -> &mut Self {
        self.toggle(names::PHP, toggle.into(), |options| php::php(&options))
    }

    pub fn vscode(&mut self, vscode: impl Into<Toggle<VsCodeChannel>>) -> &mut Self {
        self.toggle(names::VSCODE, vscode.into(), apps::vscode)
    }

    pub fn jetbrains_toolbox(&mut self, toolbox: impl Into<Toggle<ToolboxRelease>>) -> &mut Self {
        let toolbox = toolbox.into();
        if toolbox.is_enabled() {
            info!("JetBrains Toolbox will pop out once installed, you can use or close it");
        }
        self.toggle(names::JETBRAINS_TOOLBOX, toolbox, |release| {
            apps::jetbrains_toolbox(&release)
        })
    }

    pub fn spotify(&mut self, spotify: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::SPOTIFY, spotify.into(), |()| apps::spotify())
    }

    pub fn steam(&mut self, steam: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::STEAM, steam.into(), |()| apps::steam())
    }

    pub fn discord(&mut self, discord: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::DISCORD, discord.into(), |()| apps::discord())
    }

    pub fn telegram(&mut self, telegram: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::TELEGRAM, telegram.into(), |()| apps::telegram())
    }

    pub fn signal(&mut self, signal: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::SIGNAL, signal.into(), |()| apps::signal())
    }

    pub fn one_password(&mut self, one_password: impl Into<Toggle>) -> &mut Self {
        self.toggle(names::ONE_PASSWORD, one_password.into(), |()| {
            apps::one_password()
        })
    }

    /// Append apt packages to the root node. Accumulates across calls.
    pub fn package(&mut self, pkgs: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.root.package(pkgs);
        self
    }

    /// Append `.deb` URLs to the root node. Accumulates across calls.
    pub fn deb(&mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.root.deb(urls);
        self
    }

    /// Enable or disable a registered custom set.
    ///
    /// The name is resolved first, so an unregistered name fails even when
    /// disabling.
    pub fn custom_set(&mut self, name: &str, toggle: impl Into<Toggle>) -> Result<&mut Self> {
        let set = self.registry.resolve(name)?;
        Ok(self.toggle(name, toggle.into(), |()| set))
    }

    /// Finish the session and render the script: the requirements block,
    /// then the whole tree, ending with temp-file cleanup.
    ///
    /// Fails if a custom set already occupies the `cleanup` name.
    pub fn build(mut self) -> Result<String> {
        let mut cleanup = InstructionSet::new(names::CLEANUP);
        cleanup.cmd([cleanup_command()]);
        self.root.attach_child(cleanup)?;

        info!(
            sets = self.root.children().len(),
            packages = self.root.packages().len(),
            debs = self.root.debs().len(),
            "rendering provisioning script"
        );

        Ok(format!("{}\n{}", requirements().render(), self.root.render()))
    }
}

//! Definitions file: the declarative list of software wanted on the host.
//!
//! ```toml
//! docker = "desktop"          # true, false or "desktop"
//! vscode = true               # true, false or "insiders"
//! jetbrains_toolbox = "1.27.3.14493"
//! steam = true
//! additional_packages = ["vim"]
//! custom = ["cli-tools"]
//!
//! [php]
//! versions = ["8.2"]
//! extensions = ["cli", "mbstring"]
//! apache_mod = true
//! composer = true             # only `php = true` implies it
//!
//! [sets.cli-tools]
//! ppas = ["git-core/ppa"]
//! packages = ["git", "htop"]
//! ```
//!
//! Toggles that are absent are disabled.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::instruction::InstructionSet;
use crate::recipe::{DockerEdition, PhpOptions, Toggle, ToolboxRelease, VsCodeChannel};
use crate::Installer;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionsToml {
    docker: Option<SwitchToml>,
    php: Option<PhpToml>,
    vscode: Option<SwitchToml>,
    jetbrains_toolbox: Option<SwitchToml>,
    discord: Option<bool>,
    spotify: Option<bool>,
    telegram: Option<bool>,
    signal: Option<bool>,
    one_password: Option<bool>,
    steam: Option<bool>,
    #[serde(default)]
    custom: Vec<String>,
    #[serde(default)]
    additional_packages: Vec<String>,
    #[serde(default)]
    additional_debs: Vec<String>,
    #[serde(default)]
    sets: BTreeMap<String, SetToml>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SwitchToml {
    Flag(bool),
    Variant(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PhpToml {
    Flag(bool),
    Options(PhpOptionsToml),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhpOptionsToml {
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
    composer: Option<bool>,
    apache_mod: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetToml {
    #[serde(default)]
    architectures: Vec<String>,
    #[serde(default)]
    exec_before: Vec<String>,
    #[serde(default)]
    keychains: BTreeMap<String, String>,
    #[serde(default)]
    source_lists: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    ppas: Vec<String>,
    #[serde(default)]
    packages: Vec<String>,
    #[serde(default)]
    cmds: Vec<String>,
    #[serde(default)]
    debs: Vec<String>,
}

/// Parsed definitions, ready to be applied to an [`Installer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    pub docker: Toggle<DockerEdition>,
    pub php: Toggle<PhpOptions>,
    pub vscode: Toggle<VsCodeChannel>,
    pub jetbrains_toolbox: Toggle<ToolboxRelease>,
    pub discord: Toggle,
    pub spotify: Toggle,
    pub telegram: Toggle,
    pub signal: Toggle,
    pub one_password: Toggle,
    pub steam: Toggle,
    /// Custom sets to enable, by name.
    pub custom: Vec<String>,
    /// Custom sets declared in the file, registered before `custom` is
    /// resolved.
    pub sets: Vec<InstructionSet>,
    pub additional_packages: Vec<String>,
    pub additional_debs: Vec<String>,
}

impl Definitions {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading definitions '{}'", path.display()))?;
        Self::parse(&text, path)
    }

    /// Parse definitions from TOML text. `origin` only appears in errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let parsed: DefinitionsToml = toml::from_str(text)
            .with_context(|| format!("parsing definitions '{}'", origin.display()))?;
        let invalid = || format!("invalid definitions '{}'", origin.display());

        Ok(Self {
            docker: parse_docker(parsed.docker).with_context(invalid)?,
            php: parse_php(parsed.php),
            vscode: parse_vscode(parsed.vscode).with_context(invalid)?,
            jetbrains_toolbox: parse_toolbox(parsed.jetbrains_toolbox).with_context(invalid)?,
            discord: flag(parsed.discord),
            spotify: flag(parsed.spotify),
            telegram: flag(parsed.telegram),
            signal: flag(parsed.signal),
            one_password: flag(parsed.one_password),
            steam: flag(parsed.steam),
            custom: parsed.custom,
            sets: parsed
                .sets
                .into_iter()
                .map(|(name, set)| build_set(name, set))
                .collect(),
            additional_packages: parsed.additional_packages,
            additional_debs: parsed.additional_debs,
        })
    }

    /// Apply every definition to `installer` in a fixed order.
    pub fn apply(&self, installer: &mut Installer) -> Result<()> {
        for set in &self.sets {
            installer.registry_mut().register(set.clone());
        }

        installer
            .docker(self.docker.clone())
            .php(self.php.clone())
            .vscode(self.vscode.clone())
            .jetbrains_toolbox(self.jetbrains_toolbox.clone())
            .discord(self.discord.clone())
            .spotify(self.spotify.clone())
            .telegram(self.telegram.clone())
            .signal(self.signal.clone())
            .one_password(self.one_password.clone())
            .steam(self.steam.clone());

        for name in &self.custom {
            installer
                .custom_set(name, true)
                .with_context(|| format!("enabling custom set '{}'", name))?;
        }

        installer
            .package(self.additional_packages.iter().cloned())
            .deb(self.additional_debs.iter().cloned());
        Ok(())
    }

    /// A fresh installer with these definitions applied.
    pub fn installer(&self) -> Result<Installer> {
        let mut installer = Installer::new();
        self.apply(&mut installer)?;
        Ok(installer)
    }
}

fn flag(value: Option<bool>) -> Toggle {
    value.unwrap_or(false).into()
}

fn parse_docker(value: Option<SwitchToml>) -> Result<Toggle<DockerEdition>> {
    match value {
        None => Ok(Toggle::Disabled),
        Some(SwitchToml::Flag(enabled)) => Ok(enabled.into()),
        Some(SwitchToml::Variant(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DockerEdition::Desktop.into()),
            "engine" | "ce" => Ok(DockerEdition::Engine.into()),
            other => bail!(
                "unsupported docker edition '{}' (expected true, false, 'engine' or 'desktop')",
                other
            ),
        },
    }
}

fn parse_vscode(value: Option<SwitchToml>) -> Result<Toggle<VsCodeChannel>> {
    match value {
        None => Ok(Toggle::Disabled),
        Some(SwitchToml::Flag(enabled)) => Ok(enabled.into()),
        Some(SwitchToml::Variant(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(VsCodeChannel::Stable.into()),
            "insiders" => Ok(VsCodeChannel::Insiders.into()),
            other => bail!(
                "unsupported vscode channel '{}' (expected true, false, 'stable' or 'insiders')",
                other
            ),
        },
    }
}

fn parse_toolbox(value: Option<SwitchToml>) -> Result<Toggle<ToolboxRelease>> {
    match value {
        None => Ok(Toggle::Disabled),
        Some(SwitchToml::Flag(enabled)) => Ok(enabled.into()),
        Some(SwitchToml::Variant(raw)) => {
            let version = raw.trim();
            if version.is_empty() {
                bail!("jetbrains_toolbox version must not be empty");
            }
            Ok(ToolboxRelease::Version(version.to_string()).into())
        }
    }
}

fn parse_php(value: Option<PhpToml>) -> Toggle<PhpOptions> {
    match value {
        None => Toggle::Disabled,
        Some(PhpToml::Flag(enabled)) => enabled.into(),
        Some(PhpToml::Options(options)) => PhpOptions {
            versions: options.versions,
            extensions: options.extensions,
            composer: options.composer.unwrap_or(false),
            apache_mod: options.apache_mod.unwrap_or(false),
        }
        .into(),
    }
}

fn build_set(name: String, toml: SetToml) -> InstructionSet {
    let mut set = InstructionSet::new(name);
    set.package(toml.packages)
        .cmd(toml.cmds)
        .deb(toml.debs);
    // Repository-affecting fragments mark the node dirty, so only add
    // them when present.
    if !toml.architectures.is_empty() {
        set.arch(toml.architectures);
    }
    if !toml.exec_before.is_empty() {
        set.exec_before(toml.exec_before);
    }
    if !toml.ppas.is_empty() {
        set.ppa(toml.ppas);
    }
    for (filename, url) in toml.keychains {
        set.keychain(filename, url);
    }
    for (filename, lines) in toml.source_lists {
        set.source_list(filename, lines);
    }
    set
}

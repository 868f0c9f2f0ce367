//! Per-application recipes and the toggle values that select them.
//!
//! A recipe is a function that builds a fresh [`InstructionSet`] under the
//! application's reserved name. Recipes hold no state: calling one twice
//! yields two independent nodes.
//!
//! [`InstructionSet`]: crate::InstructionSet

pub mod apps;
pub mod php;

pub use php::PhpOptions;

/// Reserved child names under the installer's root node.
pub mod names {
    pub const DOCKER: &str = "docker";
    pub const PHP: &str = "php";
    pub const VSCODE: &str = "vscode";
    pub const JETBRAINS_TOOLBOX: &str = "jetbrains-toolbox";
    pub const SPOTIFY: &str = "spotify";
    pub const STEAM: &str = "steam";
    pub const DISCORD: &str = "discord";
    pub const TELEGRAM: &str = "telegram";
    pub const SIGNAL: &str = "signal";
    pub const ONE_PASSWORD: &str = "1password";
    pub const CLEANUP: &str = "cleanup";
    pub const REQUIREMENTS: &str = "requirements";
    pub const BASE: &str = "base";
}

/// Enable/disable switch for one feature, carrying the feature's options
/// when enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle<T = ()> {
    Disabled,
    Enabled(T),
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Toggle::Disabled
    }
}

impl<T> Toggle<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Toggle::Enabled(_))
    }
}

/// `true` enables the feature with its default options.
macro_rules! enable_from_bool {
    ($($options:ty),+ $(,)?) => {
        $(
            impl From<bool> for Toggle<$options> {
                fn from(enabled: bool) -> Self {
                    if enabled {
                        Toggle::Enabled(<$options>::default())
                    } else {
                        Toggle::Disabled
                    }
                }
            }
        )+
    };
}

enable_from_bool!((), DockerEdition, VsCodeChannel, ToolboxRelease);

/// A bare `true` also installs Composer; an options value only does when
/// it asks for it.
impl From<bool> for Toggle<PhpOptions> {
    fn from(enabled: bool) -> Self {
        if enabled {
            Toggle::Enabled(PhpOptions {
                composer: true,
                ..PhpOptions::default()
            })
        } else {
            Toggle::Disabled
        }
    }
}

macro_rules! enable_with {
    ($($options:ty),+ $(,)?) => {
        $(
            impl From<$options> for Toggle<$options> {
                fn from(options: $options) -> Self {
                    Toggle::Enabled(options)
                }
            }
        )+
    };
}

enable_with!(DockerEdition, VsCodeChannel, ToolboxRelease, PhpOptions);

/// Which Docker flavor to install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DockerEdition {
    /// Docker CE engine, CLI, containerd, buildx and compose plugins.
    #[default]
    Engine,
    Desktop,
}

/// VS Code release channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VsCodeChannel {
    #[default]
    Stable,
    Insiders,
}

/// JetBrains Toolbox tarball to download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolboxRelease {
    #[default]
    Latest,
    /// A specific build, e.g. `1.27.3.14493`.
    Version(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversion() {
        assert_eq!(Toggle::<DockerEdition>::from(false), Toggle::Disabled);
        assert_eq!(
            Toggle::<DockerEdition>::from(true),
            Toggle::Enabled(DockerEdition::Engine)
        );
        assert_eq!(Toggle::<()>::from(true), Toggle::Enabled(()));
    }

    #[test]
    fn test_php_true_brings_composer() {
        let Toggle::Enabled(options) = Toggle::<PhpOptions>::from(true) else {
            panic!("php(true) should be enabled");
        };
        assert!(options.composer);
        assert!(!PhpOptions::default().composer);
        assert_eq!(Toggle::<PhpOptions>::from(false), Toggle::Disabled);
    }

    #[test]
    fn test_options_conversion() {
        assert_eq!(
            Toggle::from(VsCodeChannel::Insiders),
            Toggle::Enabled(VsCodeChannel::Insiders)
        );
        let release = Toggle::from(ToolboxRelease::Version("1.27.3.14493".into()));
        assert!(release.is_enabled());
    }
}

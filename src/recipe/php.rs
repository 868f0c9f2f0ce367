//! PHP from the ondrej/php PPA, with optional Apache module, extensions
//! and Composer.

use super::names;
use crate::instruction::{InstructionSet, TEMP_PREFIX};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpOptions {
    /// Versions such as `8.2`. Empty selects the distro default `php`.
    pub versions: Vec<String>,
    /// Extension suffixes, installed as `php<version>-<extension>`.
    pub extensions: Vec<String>,
    /// Off unless asked for; `Toggle::from(true)` turns it on.
    pub composer: bool,
    pub apache_mod: bool,
}

fn enable_extension(version: &str, extension: &str) -> String {
    if version.is_empty() {
        format!("phpenmod {}", extension)
    } else {
        format!("phpenmod -v {} {}", version, extension)
    }
}

pub fn php(options: &PhpOptions) -> InstructionSet {
    let mut set = InstructionSet::new(names::PHP);
    set.ppa(["ondrej/php"]);

    let default_version = [String::new()];
    let versions: &[String] = if options.versions.is_empty() {
        info!("php versions not specified, using default package `php`");
        &default_version
    } else {
        &options.versions
    };

    for version in versions {
        let pkg = format!("php{}", version);

        set.package([pkg.clone()]);
        if options.apache_mod {
            set.package([format!("libapache2-mod-{}", pkg)]);
        }
        set.package(options.extensions.iter().map(|ext| format!("{}-{}", pkg, ext)))
            .cmd(
                options
                    .extensions
                    .iter()
                    .map(|ext| enable_extension(version, ext)),
            );
    }

    if options.composer {
        let installer = format!("{}composer-setup.php", TEMP_PREFIX);
        set.cmd([
            format!("wget -qO {} https://getcomposer.org/installer", installer),
            format!(
                "php {} --install-dir=/usr/local/bin --filename=composer",
                installer
            ),
        ]);
    }

    set
}

//! Recipes for single-purpose desktop applications and developer tools.
//!
//! Every recipe uses the vendor's official apt repository where one
//! exists. Discord and JetBrains Toolbox are fetched out of band.

use super::names;
use super::{DockerEdition, ToolboxRelease, VsCodeChannel};
use crate::instruction::{quote, InstructionSet, TEMP_PREFIX};

const KEYRINGS: &str = "/etc/apt/keyrings";

fn signed_by(keyring: &str) -> String {
    format!("signed-by={}/{}", KEYRINGS, keyring)
}

pub fn docker(edition: DockerEdition) -> InstructionSet {
    let packages: &[&str] = match edition {
        DockerEdition::Desktop => &["gnome-terminal", "docker-desktop"],
        DockerEdition::Engine => &[
            "docker-ce",
            "docker-ce-cli",
            "containerd.io",
            "docker-buildx-plugin",
            "docker-compose-plugin",
        ],
    };

    let mut set = InstructionSet::new(names::DOCKER);
    set.keychain("docker.gpg", "https://download.docker.com/linux/ubuntu/gpg")
        .source_list(
            "docker.list",
            [format!(
                "deb [arch=amd64 {}] https://download.docker.com/linux/ubuntu $(lsb_release -cs) stable",
                signed_by("docker.gpg")
            )],
        )
        .package(packages.iter().copied());
    set
}

pub fn vscode(channel: VsCodeChannel) -> InstructionSet {
    let package = match channel {
        VsCodeChannel::Stable => "code",
        VsCodeChannel::Insiders => "code-insiders",
    };

    let mut set = InstructionSet::new(names::VSCODE);
    set.keychain(
        "packages.microsoft.gpg",
        "https://packages.microsoft.com/keys/microsoft.asc",
    )
    .source_list(
        "vscode.list",
        [format!(
            "deb [arch=amd64,arm64,armhf {}] https://packages.microsoft.com/repos/code stable main",
            signed_by("packages.microsoft.gpg")
        )],
    )
    .package([package]);
    set
}

/// Download URL of the Toolbox tarball for a release.
pub fn toolbox_url(release: &ToolboxRelease) -> String {
    match release {
        ToolboxRelease::Latest => {
            "https://data.services.jetbrains.com/products/download?code=TBA&platform=linux".into()
        }
        ToolboxRelease::Version(version) => format!(
            "https://download.jetbrains.com/toolbox/jetbrains-toolbox-{}.tar.gz",
            version
        ),
    }
}

pub fn jetbrains_toolbox(release: &ToolboxRelease) -> InstructionSet {
    let dir = format!("{}toolbox", TEMP_PREFIX);
    let tarball = format!("{}/jetbrains-toolbox.tar.gz", dir);

    let mut set = InstructionSet::new(names::JETBRAINS_TOOLBOX);
    set.cmd([
        format!("mkdir -p {}", dir),
        format!("wget -O {} {}", tarball, quote(&toolbox_url(release))),
        format!("tar -xzvf {} -C {} --strip-components=1", tarball, dir),
        format!("chmod +x {}/jetbrains-toolbox", dir),
        format!("bash {}/jetbrains-toolbox", dir),
    ]);
    set
}

pub fn spotify() -> InstructionSet {
    let mut set = InstructionSet::new(names::SPOTIFY);
    set.keychain(
        "spotify.gpg",
        "https://download.spotify.com/debian/pubkey_7A3A762FAFD4A51F.gpg",
    )
    .source_list(
        "spotify.list",
        [format!(
            "deb [{}] http://repository.spotify.com stable non-free",
            signed_by("spotify.gpg")
        )],
    )
    .package(["spotify-client"]);
    set
}

pub fn steam() -> InstructionSet {
    let options = format!("[arch=amd64,i386 {}]", signed_by("steam.gpg"));

    let mut set = InstructionSet::new(names::STEAM);
    set.keychain(
        "steam.gpg",
        "https://repo.steampowered.com/steam/archive/stable/steam.gpg",
    )
    .source_list(
        "steam-stable.list",
        [
            format!("deb {} https://repo.steampowered.com/steam/ stable steam", options),
            format!("deb-src {} https://repo.steampowered.com/steam/ stable steam", options),
        ],
    )
    .arch(["i386"])
    .package([
        "libgl1-mesa-dri:amd64",
        "libgl1-mesa-dri:i386",
        "libgl1-mesa-glx:amd64",
        "libgl1-mesa-glx:i386",
        "steam-launcher",
    ]);
    set
}

pub fn discord() -> InstructionSet {
    let mut set = InstructionSet::new(names::DISCORD);
    set.deb(["https://discordapp.com/api/download?platform=linux&format=deb"]);
    set
}

/// Telegram has no official apt repository, so the distro package is used.
pub fn telegram() -> InstructionSet {
    let mut set = InstructionSet::new(names::TELEGRAM);
    set.package(["telegram-desktop"]);
    set
}

pub fn signal() -> InstructionSet {
    let mut set = InstructionSet::new(names::SIGNAL);
    set.keychain(
        "signal-desktop-keyring.gpg",
        "https://updates.signal.org/desktop/apt/keys.asc",
    )
    .source_list(
        "signal-desktop-archive.list",
        [format!(
            "deb [arch=amd64 {}] https://updates.signal.org/desktop/apt xenial main",
            signed_by("signal-desktop-keyring.gpg")
        )],
    )
    .package(["signal-desktop"]);
    set
}

pub fn one_password() -> InstructionSet {
    let mut set = InstructionSet::new(names::ONE_PASSWORD);
    set.keychain(
        "1password-archive-keyring.gpg",
        "https://downloads.1password.com/linux/keys/1password.asc",
    )
    .source_list(
        "1password.list",
        [format!(
            "deb [arch=amd64 {}] https://downloads.1password.com/linux/debian/amd64 stable main",
            signed_by("1password-archive-keyring.gpg")
        )],
    )
    .package(["1password"]);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docker_editions_share_repository() {
        let engine = docker(DockerEdition::Engine);
        let desktop = docker(DockerEdition::Desktop);

        assert_eq!(engine.name(), "docker");
        assert_eq!(
            engine.keychain_url("docker.gpg"),
            desktop.keychain_url("docker.gpg")
        );
        assert_eq!(
            engine.source_list_lines("docker.list"),
            desktop.source_list_lines("docker.list")
        );
        assert!(engine.packages().iter().any(|p| p == "docker-ce-cli"));
        assert_eq!(desktop.packages(), ["gnome-terminal", "docker-desktop"]);
    }

    #[test]
    fn test_vscode_channel_changes_package_only() {
        let stable = vscode(VsCodeChannel::Stable);
        let insiders = vscode(VsCodeChannel::Insiders);

        assert_eq!(stable.packages(), ["code"]);
        assert_eq!(insiders.packages(), ["code-insiders"]);
        assert_eq!(
            stable.source_list_lines("vscode.list"),
            insiders.source_list_lines("vscode.list")
        );
    }

    #[test]
    fn test_steam_enables_i386_with_deb_src() {
        let set = steam();
        assert_eq!(set.architectures(), ["i386"]);

        let lines = set.source_list_lines("steam-stable.list").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("deb "));
        assert!(lines[1].starts_with("deb-src "));
    }

    #[test]
    fn test_toolbox_uses_temp_prefix() {
        let set = jetbrains_toolbox(&ToolboxRelease::Version("1.27.3.14493".into()));
        assert!(set.packages().is_empty());
        assert!(set.cmds().iter().all(|c| c.contains("/tmp/liliana--toolbox")));
        assert!(set.cmds()[1].contains("jetbrains-toolbox-1.27.3.14493.tar.gz"));
    }

    #[test]
    fn test_discord_is_out_of_band() {
        let set = discord();
        assert!(set.packages().is_empty());
        assert_eq!(set.debs().len(), 1);
        assert!(!set.is_dirty());
    }

    #[test]
    fn test_keyrings_match_signed_by() {
        for set in [spotify(), signal(), one_password()] {
            let script = set.render();
            let keyring = script
                .lines()
                .find_map(|l| l.strip_prefix("install -D -o root -g root -m 644 "))
                .and_then(|l| l.split_whitespace().nth(1))
                .unwrap()
                .to_string();
            assert!(
                script.contains(&format!("signed-by={}", keyring)),
                "{} source list should be signed by {}",
                set,
                keyring
            );
        }
    }
}

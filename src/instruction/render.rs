//! Shell rendering for instruction sets.
//!
//! Within one node the output order is fixed:
//! source lists, signing keys, architectures, `.deb` installs, pre-install
//! commands, PPAs, `apt update` (dirty nodes only), `apt install`,
//! post-install commands, then each child in attachment order.

use super::InstructionSet;

/// Scratch path prefix for everything the script downloads. The cleanup
/// step removes `TEMP_PREFIX*` in one go.
pub const TEMP_PREFIX: &str = "/tmp/liliana--";

pub const REFRESH_COMMAND: &str = "apt update";

const SOURCES_DIR: &str = "/etc/apt/sources.list.d";
const KEYRINGS_DIR: &str = "/etc/apt/keyrings";

/// Command that removes every temp file the script created.
pub fn cleanup_command() -> String {
    format!("rm -rf {}*", TEMP_PREFIX)
}

/// Single-quote `value` for POSIX shells.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Escape `value` for a double-quoted shell word. `$` is left alone so
/// `$(lsb_release -cs)` and friends still expand.
fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn source_list_lines(filename: &str, lines: &[String], out: &mut Vec<String>) {
    for (i, line) in lines.iter().enumerate() {
        // Later lines append so deb-src entries survive next to deb ones.
        let tee = if i == 0 { "tee" } else { "tee -a" };
        out.push(format!(
            "echo \"{}\" | {} {}/{}",
            escape_double_quoted(line),
            tee,
            SOURCES_DIR,
            filename
        ));
    }
}

fn keychain_lines(filename: &str, url: &str, out: &mut Vec<String>) {
    let scratch = format!("{}{}", TEMP_PREFIX, filename);
    out.push(format!(
        "wget -qO- {} | gpg --dearmor --yes > {}",
        quote(url),
        scratch
    ));
    out.push(format!(
        "install -D -o root -g root -m 644 {} {}/{}",
        scratch, KEYRINGS_DIR, filename
    ));
}

fn deb_lines(index: usize, url: &str, out: &mut Vec<String>) {
    let scratch = format!("{}deb-{}.deb", TEMP_PREFIX, index);
    out.push(format!("wget -O {} {}", scratch, quote(url)));
    out.push(format!("gdebi -n {}", scratch));
}

impl InstructionSet {
    /// Render this node and its subtree as newline-separated shell lines.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_into(&mut lines);
        lines.join("\n")
    }

    pub(crate) fn render_into(&self, out: &mut Vec<String>) {
        for (filename, lines) in self.source_lists.iter() {
            source_list_lines(filename, lines, out);
        }
        for (filename, url) in self.keychains.iter() {
            keychain_lines(filename, url, out);
        }
        out.extend(
            self.architectures
                .iter()
                .map(|arch| format!("dpkg --add-architecture {}", arch)),
        );
        for (i, url) in self.debs.iter().enumerate() {
            deb_lines(i, url, out);
        }
        out.extend(self.exec_before.iter().cloned());
        out.extend(
            self.ppas
                .iter()
                .map(|ppa| format!("add-apt-repository -y ppa:{}", ppa)),
        );
        if self.dirty {
            out.push(REFRESH_COMMAND.to_string());
        }
        if !self.packages.is_empty() {
            out.push(format!("apt install -y {}", self.packages.join(" ")));
        }
        out.extend(self.cmds.iter().cloned());

        for child in &self.children {
            child.render_into(out);
        }
    }
}

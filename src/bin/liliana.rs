use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use liliana::{Definitions, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage:\n  liliana build <definitions.toml> [output.sh]\n  liliana tree <definitions.toml>\n\n\
     Environment:\n  SILENT=0      print diagnostics to stderr\n  DEBUG_TREE=1  dump the instruction tree to stderr during build"
}

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings);

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [build, definitions] if build == "build" => {
            let script = build_script(Path::new(definitions), &settings)?;
            println!("{}", script);
            Ok(())
        }
        [build, definitions, output] if build == "build" => {
            let script = build_script(Path::new(definitions), &settings)?;
            write_script(Path::new(output), &script)
        }
        [tree, definitions] if tree == "tree" => print_tree(Path::new(definitions)),
        _ => bail!(usage()),
    }
}

fn init_logging(settings: &Settings) {
    if settings.silent {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn build_script(definitions: &Path, settings: &Settings) -> Result<String> {
    let installer = Definitions::load(definitions)?
        .installer()
        .with_context(|| format!("applying definitions '{}'", definitions.display()))?;

    if settings.dump_tree() {
        let tree = installer
            .debug_tree()
            .context("serializing instruction tree")?;
        eprintln!("{}", serde_json::to_string_pretty(&tree)?);
    }

    installer
        .build()
        .with_context(|| format!("building script for '{}'", definitions.display()))
}

fn print_tree(definitions: &Path) -> Result<()> {
    let installer = Definitions::load(definitions)?
        .installer()
        .with_context(|| format!("applying definitions '{}'", definitions.display()))?;
    let tree = installer
        .debug_tree()
        .context("serializing instruction tree")?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn write_script(output: &Path, script: &str) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    fs::write(output, format!("{}\n", script))
        .with_context(|| format!("writing script '{}'", output.display()))?;

    let mut perms = fs::metadata(output)
        .with_context(|| format!("reading metadata '{}'", output.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(output, perms)
        .with_context(|| format!("setting permissions '{}'", output.display()))?;

    info!(path = %output.display(), "wrote script");
    Ok(())
}

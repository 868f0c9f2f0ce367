//! Generates an idempotent Ubuntu provisioning script from a declarative
//! description of the software that should be present on a host.
//!
//! - **Instruction sets** - Named tree nodes holding apt sources, signing
//!   keys, architectures, PPAs, packages, commands and `.deb` URLs, and
//!   rendering them in a fixed order
//! - **Recipes** - Per-application node builders (Docker, PHP, VS Code, ...)
//! - **Installer** - Feature toggles with enable/disable/replace semantics
//!   over one root node, plus the final script assembly
//! - **Definitions** - TOML file format mapped onto the installer
//!
//! # Architecture
//!
//! ```text
//! Definitions (TOML)
//!     │
//!     └── Installer ── toggles ──> recipe::* ──> InstructionSet
//!             │
//!             └── build(): requirements + base tree + cleanup ──> shell text
//! ```
//!
//! Nothing here executes the script. It only emits text for a later
//! provisioning step that runs as root on a Debian/Ubuntu host.

pub mod definitions;
pub mod error;
pub mod installer;
pub mod instruction;
pub mod recipe;
pub mod settings;

pub use definitions::Definitions;
pub use error::{Error, Result};
pub use installer::{Installer, SetRegistry, DEPENDENT_PACKAGES};
pub use instruction::InstructionSet;
pub use recipe::Toggle;
pub use settings::Settings;

//! Structural errors raised while composing an instruction tree.

use thiserror::Error;

/// Errors produced by the instruction tree and the installer facade.
///
/// Both variants describe caller misuse. Nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("instruction set '{parent}' already has a child named '{child}'")]
    DuplicateChild { parent: String, child: String },

    #[error("instruction set '{name}' is not registered")]
    UnregisteredSet { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;

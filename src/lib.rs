mod artifacts;
mod chain;
pub mod cli;
pub mod command;
mod credentials;
mod error;
mod forge;
mod reconcile;
mod references;
mod registry;

pub use error::{ReleaseToolsError, Result};

#[cfg(test)]
pub mod test_helpers;

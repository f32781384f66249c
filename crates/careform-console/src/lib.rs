//! careform-console library root.
//!
//! Re-exports the config and command modules so integration tests can
//! exercise them without going through the clap layer.

pub mod commands;
pub mod config;

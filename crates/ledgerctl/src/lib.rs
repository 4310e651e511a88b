pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Commands, ConfigCommand};
pub use error::{CtlError, Result};

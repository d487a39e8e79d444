//! Library side of the `dasm` binary: commands, logging, settings and tables.

pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;

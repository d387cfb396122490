//! Logging utilities.
//!
//! This module centralizes logger initialization. Library code only talks to
//! the `log` facade; binaries and tests pick the backend here.

mod init;

pub use init::{init_logging, LoggingConfig};

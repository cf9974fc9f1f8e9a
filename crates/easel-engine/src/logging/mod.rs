//! Logging setup.
//!
//! The engine itself only talks to the `log` facade; this module offers an
//! `env_logger` initializer for hosts and tests that want console output.

mod init;

pub use init::{LoggingConfig, init_logging};

//! Library entry point for engine-cli components.
//!
//! Exposes reusable modules (formatter, session, config, etc.) so integration
//! tests and other crates can leverage CLI formatting and behaviors without
//! going through the binary entry point.

pub mod config;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod parser;
pub mod session;

pub use config::CLIConfiguration;
pub use error::{CLIError, Result};
pub use formatter::{OutputFormat, OutputFormatter};
pub use session::CLISession;

//! tfjunit library
//!
//! This module exports the command-line configuration and the conversion
//! pipeline of the `tfjunit` binary for use in integration tests.

pub mod config;
pub mod convert;

pub use config::Config;
pub use convert::run;

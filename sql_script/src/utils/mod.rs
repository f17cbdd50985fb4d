//! Utilities for sql_script

pub mod logging;

pub use logging::init_logging;

//! Process-level plumbing for the `smartslug` binary

pub mod logging;

pub use logging::init_logging;

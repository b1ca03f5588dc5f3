/// The current version of the application.
/// This should match the version in Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target used by the default log filter; the crate name with underscores.
pub const LOG_TARGET: &str = "obc_commands";

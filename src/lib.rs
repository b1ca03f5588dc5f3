pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod utils;
pub mod version;

pub use db::Database;
pub use error::{CommandError, Result};
pub use version::VERSION;

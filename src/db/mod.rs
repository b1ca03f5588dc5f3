pub mod models;
pub mod store;

pub use models::{Command, CommandStatus, MainCommand};
pub use store::{CommandFilter, Database};

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod terminal;

pub use config::{Cli, Mode, Pacing};
pub use error::CliError;
pub use server::StdioServer;
pub use terminal::ConsoleSession;

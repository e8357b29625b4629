pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{AppsScriptClient, ConsoleNotifier, MemoryNotifier, SupabaseClient};
pub use config::AdminConfig;
pub use core::{importer::BatchImporter, session::SessionController};
pub use utils::error::{AdminError, ParseError, Result};

mod asset_handler;
mod cli;
mod configuration;
mod file_system;
mod format;

pub use asset_handler::*;
pub use cli::*;
pub use configuration::*;
pub use file_system::*;
pub use format::*;

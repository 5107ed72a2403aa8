mod config;
mod formatting;

pub use config::*;
pub use formatting::*;

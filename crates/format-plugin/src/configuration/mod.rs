mod resolve_config;
mod types;
mod upgrade;

pub use resolve_config::*;
pub use types::*;
pub use upgrade::*;

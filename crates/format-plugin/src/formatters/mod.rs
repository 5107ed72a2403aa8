mod factory;
mod in_process;
mod process;
mod types;

pub use factory::*;
pub use in_process::*;
pub use process::*;
pub use types::*;

mod file_path_utils;

pub use file_path_utils::*;

pub mod cli_interface;
mod fs;
pub mod shell;
pub mod utils;
pub use fs::*;

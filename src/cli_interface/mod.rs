//! command line arguments of the `memfs` binary
mod cli_struct;
pub use cli_struct::*;

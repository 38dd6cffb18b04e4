use byte_unit::Byte;
use clap::Parser;

use crate::fs::{DEFAULT_BLOCK_SIZE, DEFAULT_DISK_SIZE, DIRECT_POINTERS};

/// an interactive shell over a simulated, memory resident filesystem
#[derive(Parser, Debug, PartialEq)]
#[command(author, version, about, long_about)]
pub struct MemFsCli {
    /// the size of the simulated disk, like `64000` or `64 KiB`
    #[clap(short, long, default_value_t = DEFAULT_DISK_SIZE, value_parser = parse_disk_size)]
    pub disk_size: u64,
    /// the block size of the file system
    #[clap(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u32,
    /// how many blocks a single file may own
    #[clap(short, long, default_value_t = DIRECT_POINTERS)]
    pub max_direct_blocks: usize,
}

fn parse_disk_size(s: &str) -> Result<u64, String> {
    let bytes = Byte::from_str(s).map_err(|e| e.to_string())?.get_bytes();
    u64::try_from(bytes).map_err(|e| e.to_string())
}

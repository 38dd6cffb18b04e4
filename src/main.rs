use clap::Parser;
use log::info;
use memfs::{cli_interface::MemFsCli, shell::Shell, MemFS};
/// an interactive shell over a freshly created, unformatted filesystem.
///
/// Everything lives in memory and is gone once the shell exits.
fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let args = MemFsCli::parse();
    let fs = MemFS::with_direct_blocks(args.disk_size, args.block_size, args.max_direct_blocks)?;
    info!(
        "created filesystem with {} blocks of {} bytes",
        fs.get_total_block_count(),
        fs.block_size()
    );

    let stdout = std::io::stdout();
    let mut shell = Shell::new(fs, stdout.lock());
    shell.run(std::io::stdin().lock())
}

//! a line based command interpreter on top of [MemFS]
use std::io::{BufRead, Write};

use byte_unit::Byte;
use log::{error, info, warn};

use crate::{FsError, MemFS};

const HELP: &str = "Available commands:
  format                        - Format the filesystem
  create <filename>             - Create a new empty file
  write <filename> <data...>    - Write data to a file
  read <filename>               - Read and display file content
  delete <filename>             - Delete a file
  ls                            - List all files
  stats                         - Show block usage stats
  stat <filename>               - Show the metadata of a file
  fsck                          - Check filesystem consistency
  help                          - Show this help menu
  exit                          - Exit the program";

/// one parsed input line
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Format,
    Create(String),
    Write { name: String, data: String },
    Read(String),
    Delete(String),
    Ls,
    Stats,
    Stat(String),
    Fsck,
    /// a known command with missing arguments, carries its usage line
    Usage(&'static str),
    Unknown(String),
    Empty,
}

// split off the first whitespace separated word
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let (cmd, rest) = next_word(line);
        let (name, tail) = next_word(rest);
        let with_name = |usage: &'static str, f: fn(String) -> Command| {
            if name.is_empty() {
                Command::Usage(usage)
            } else {
                f(name.to_string())
            }
        };
        match cmd {
            "" => Command::Empty,
            "help" => Command::Help,
            "exit" => Command::Exit,
            "format" => Command::Format,
            "ls" => Command::Ls,
            "stats" => Command::Stats,
            "fsck" => Command::Fsck,
            "create" => with_name("Usage: create <filename>", Command::Create),
            "read" => with_name("Usage: read <filename>", Command::Read),
            "delete" => with_name("Usage: delete <filename>", Command::Delete),
            "stat" => with_name("Usage: stat <filename>", Command::Stat),
            "write" => {
                if name.is_empty() || tail.is_empty() {
                    return Command::Usage("Usage: write <filename> <data>");
                }
                let data = tail.strip_prefix(' ').unwrap_or(tail);
                Command::Write {
                    name: name.to_string(),
                    data: data.to_string(),
                }
            }
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// runs commands against one filesystem and prints the results to `out`
pub struct Shell<W: Write> {
    fs: MemFS,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(fs: MemFS, out: W) -> Self {
        Shell { fs, out }
    }

    pub fn fs(&self) -> &MemFS {
        &self.fs
    }

    pub fn into_inner(self) -> (MemFS, W) {
        (self.fs, self.out)
    }

    /// read commands until `exit` or the end of `input`
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        writeln!(self.out, "In-Memory Filesystem Simulator")?;
        writeln!(self.out, "Type 'help' for a list of commands.")?;
        let mut lines = input.lines();
        loop {
            write!(self.out, "fs> ")?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            if !self.execute(Command::parse(&line?))? {
                break;
            }
        }
        writeln!(self.out, "Exiting filesystem.")?;
        Ok(())
    }

    /// run one command
    /// # Return
    /// `false` once the shell should stop
    pub fn execute(&mut self, command: Command) -> anyhow::Result<bool> {
        info!("shell command: {command:?}");
        if command == Command::Exit {
            return Ok(false);
        }
        if let Err(e) = self.dispatch(command) {
            match e.downcast::<FsError>() {
                Ok(FsError::UnformattedFilesystem) => writeln!(
                    self.out,
                    "Error: filesystem not formatted. Run 'format' first."
                )?,
                Ok(e @ (FsError::FileAlreadyExists { .. } | FsError::FileMissing { .. })) => {
                    writeln!(self.out, "{e}")?
                }
                Ok(e) if e.is_recoverable() => {
                    warn!("{e}");
                    writeln!(self.out, "Error: {e}")?
                }
                Ok(e) => {
                    error!("{e}");
                    writeln!(self.out, "Error: {e}")?
                }
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, command: Command) -> anyhow::Result<()> {
        let out = &mut self.out;
        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Exit | Command::Empty => {}
            Command::Format => {
                self.fs.format();
                writeln!(out, "Filesystem formatted.")?;
            }
            Command::Create(name) => {
                if self.fs.create_file(&name)? {
                    writeln!(out, "Created file: {name}")?;
                } else {
                    writeln!(out, "Failed to create file: {name}")?;
                }
            }
            Command::Write { name, data } => {
                self.fs.write_file(&name, &data)?;
                writeln!(out, "Wrote to {name}: \"{data}\"")?;
            }
            Command::Read(name) => match self.fs.read_file(&name)? {
                Some(content) if content.is_empty() => writeln!(out, "{name} is empty.")?,
                Some(content) => writeln!(
                    out,
                    "{name} content: \"{}\"",
                    String::from_utf8_lossy(&content)
                )?,
                None => writeln!(out, "File not found: {name}")?,
            },
            Command::Delete(name) => {
                if self.fs.delete_file(&name)? {
                    writeln!(out, "Deleted file: {name}")?;
                } else {
                    writeln!(out, "File not found: {name}")?;
                }
            }
            Command::Ls => {
                let files = self.fs.list_files()?;
                if files.is_empty() {
                    writeln!(out, "(no files)")?;
                }
                for f in files {
                    writeln!(out, "{f}")?;
                }
            }
            Command::Stats => {
                let stats = self.fs.stats();
                writeln!(
                    out,
                    "Free blocks: {} / {}",
                    stats.free_blocks, stats.total_blocks
                )?;
                writeln!(
                    out,
                    "Block size: {}, free space: {}",
                    Byte::from_bytes(stats.block_size as _).get_appropriate_unit(true),
                    Byte::from_bytes((stats.free_blocks * stats.block_size as usize) as _)
                        .get_appropriate_unit(true)
                )?;
                writeln!(
                    out,
                    "Free inodes: {} / {}, files: {}",
                    stats.free_inodes, stats.total_inodes, stats.files
                )?;
            }
            Command::Stat(name) => {
                let stat = self.fs.stat(&name)?;
                writeln!(out, "{name}: inode {}, {} bytes", stat.inode, stat.size)?;
                writeln!(out, "  blocks:   {:?}", stat.blocks)?;
                writeln!(out, "  created:  {:?}", stat.created_at)?;
                writeln!(out, "  modified: {:?}", stat.modified_at)?;
            }
            Command::Fsck => {
                let report = self.fs.fsck()?;
                if report.is_clean() {
                    writeln!(out, "fsck: clean")?;
                }
                for e in report.errors {
                    writeln!(out, "fsck: {e}")?;
                }
            }
            Command::Usage(usage) => writeln!(out, "{usage}")?,
            Command::Unknown(cmd) => writeln!(out, "Unknown command: {cmd}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> String {
        let fs = MemFS::new(64000, 64).unwrap();
        let mut shell = Shell::new(fs, Vec::new());
        shell.run(script.as_bytes()).unwrap();
        output(shell)
    }

    fn output(shell: Shell<Vec<u8>>) -> String {
        let (_, out) = shell.into_inner();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("  format "), Command::Format);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(
            Command::parse("create a.txt"),
            Command::Create("a.txt".into())
        );
        assert_eq!(
            Command::parse("create"),
            Command::Usage("Usage: create <filename>")
        );
        assert_eq!(
            Command::parse("frobnicate now"),
            Command::Unknown("frobnicate".into())
        );
    }

    #[test]
    fn test_parse_write_keeps_rest_of_line() {
        assert_eq!(
            Command::parse("write a.txt hello  big world"),
            Command::Write {
                name: "a.txt".into(),
                data: "hello  big world".into()
            }
        );
        assert_eq!(
            Command::parse("write a.txt"),
            Command::Usage("Usage: write <filename> <data>")
        );
    }

    #[test]
    fn test_unformatted_session() {
        let out = run_script("create a.txt\nls\n");
        assert_eq!(
            out.matches("Error: filesystem not formatted. Run 'format' first.")
                .count(),
            2
        );
    }

    #[test]
    fn test_session() {
        let out = run_script(
            "format\ncreate a.txt\nwrite a.txt hello\nread a.txt\nstats\ncreate a.txt\n\
             create b\nread b\nls\ndelete a.txt\ndelete a.txt\nread a.txt\nfsck\nexit\nls\n",
        );
        assert!(out.contains("Filesystem formatted."));
        assert!(out.contains("Created file: a.txt"));
        assert!(out.contains("Wrote to a.txt: \"hello\""));
        assert!(out.contains("a.txt content: \"hello\""));
        assert!(out.contains("Free blocks: 999 / 1000"));
        assert!(out.contains("file already exists: a.txt"));
        assert!(out.contains("b is empty."));
        assert!(out.contains("a.txt\nb\n"));
        assert!(out.contains("Deleted file: a.txt"));
        assert!(out.contains("File not found: a.txt"));
        assert!(out.contains("fsck: clean"));
        // nothing after `exit` runs
        assert!(out.ends_with("fs> Exiting filesystem.\n"));
    }

    #[test]
    fn test_write_missing_and_too_large() {
        let big = "x".repeat(641);
        let out = run_script(&format!("format\nwrite nope data\ncreate f\nwrite f {big}\n"));
        assert!(out.contains("fs> file not found: nope\n"));
        assert!(out.contains("Error: file f is too large"));
    }

    #[test]
    fn test_write_on_full_disk() {
        let mut fs = MemFS::new(64000, 64).unwrap();
        fs.format();
        fs.create_file("f").unwrap();
        fs.write_file("f", "old").unwrap();
        fs.create_file("g").unwrap();
        // take every remaining block away from the files
        fs.block_manager_mut().allocate_blocks(999).unwrap();

        let mut shell = Shell::new(fs, Vec::new());
        shell.execute(Command::parse("write g hello")).unwrap();
        shell.execute(Command::parse("write f x")).unwrap();
        assert_eq!(shell.fs().get_free_block_count(), 0);
        assert_eq!(shell.fs().read_file("g").unwrap(), Some(vec![]));
        assert_eq!(shell.fs().read_file("f").unwrap(), Some(b"x".to_vec()));

        let long = "y".repeat(100);
        shell.execute(Command::parse(&format!("write f {long}"))).unwrap();
        assert_eq!(shell.fs().read_file("f").unwrap(), Some(b"x".to_vec()));
        let out = output(shell);
        assert_eq!(
            out,
            "Error: no free block available: requested 1, 0 free\n\
             Wrote to f: \"x\"\n\
             Error: no free block available: requested 2, 1 free\n"
        );
    }

    #[test]
    fn test_eof_exits() {
        let out = run_script("help\nbogus");
        assert!(out.contains("Available commands:"));
        assert!(out.contains("Unknown command: bogus"));
        assert!(out.ends_with("Exiting filesystem.\n"));
    }
}

//! Startup configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::ShellError;
use crate::system::DEFAULT_SEARCH_PATH;

/// Prompt shown before each line read from a terminal.
pub const PROMPT: &str = "wish> ";

/// Command line of the `wish` binary.
///
/// Help and version flags are disabled and every argument, `--` included,
/// is an operand: either the one batch file or a usage error.
#[derive(Debug, Parser)]
#[command(name = "wish", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// File to read commands from instead of standard input.
    #[arg(value_name = "BATCH_FILE")]
    operands: Vec<PathBuf>,
}

impl Cli {
    /// Parses a full argument list, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Cli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().unwrap_or_else(|| OsString::from("wish"));
        // Everything after our own `--` is positional, a literal `--` too.
        let escaped = [program, OsString::from("--")].into_iter().chain(args);
        Cli::try_parse_from(escaped)
    }

    /// The batch file, or `None` to read standard input.
    pub fn batch_file(&self) -> Result<Option<&Path>, ShellError> {
        match self.operands.as_slice() {
            [] => Ok(None),
            [batch_file] => Ok(Some(batch_file.as_path())),
            operands => Err(ShellError::Usage(operands.len())),
        }
    }
}

/// Settings the interpreter starts with.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Initial directories searched for executables.
    pub search_path: Vec<PathBuf>,

    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            search_path: DEFAULT_SEARCH_PATH.iter().map(PathBuf::from).collect(),
            prompt: String::from(PROMPT),
        }
    }
}

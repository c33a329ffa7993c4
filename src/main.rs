mod ast;
mod builtin;
mod config;
mod editing;
mod engine;
mod error;
mod parser;
mod scanner;
mod system;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;

use anyhow::Context;

use crate::config::{Cli, ShellConfig};
use crate::editing::{Batch, Interactive, LineSource};
use crate::engine::{LineStatus, Shell};
use crate::error::display_error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("WISH_LOG", "off")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:#}");
            display_error(&mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Sets up the line source named on the command line and runs the shell.
fn run() -> anyhow::Result<()> {
    let cli = Cli::from_args(std::env::args_os()).context("usage: wish [batch-file]")?;
    let config = ShellConfig::default();

    let mut source: Box<dyn LineSource> = match cli.batch_file()? {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open batch file {}", path.display()))?;
            Box::new(Batch::new(BufReader::new(file)))
        }
        None if io::stdin().is_terminal() => Box::new(Interactive::new(&config.prompt)?),
        None => Box::new(Batch::new(io::stdin().lock())),
    };

    let mut shell = Shell::new(&config);
    repl(&mut shell, source.as_mut())
}

/// Read, eval loop. Returns at the end of input or on `exit`.
fn repl(shell: &mut Shell, source: &mut dyn LineSource) -> anyhow::Result<()> {
    while let Some(line) = source.read_line(shell.search_path())? {
        if shell.run_line(&line)? == LineStatus::Exit {
            return Ok(());
        }
    }
    Ok(())
}

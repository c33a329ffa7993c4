//! Dispatches the parallel commands of a line and waits for them.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::{
    ast::ParsedCommand,
    builtin::{BuiltIn, Flow},
    config::ShellConfig,
    error::{report, ShellError},
    parser::parse_line,
    system::SearchPath,
};

/// Whether the shell should read another line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStatus {
    Continue,
    Exit,
}

/// The interpreter state that outlives a single line.
pub struct Shell {
    search_path: SearchPath,
}

impl Shell {
    pub fn new(config: &ShellConfig) -> Shell {
        Shell {
            search_path: SearchPath::new(&config.search_path),
        }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Parses and runs one line, returning once every command it spawned
    /// has finished.
    ///
    /// Recoverable faults are reported and swallowed. An error is returned
    /// only when the shell cannot go on; reporting it is left to the caller.
    pub fn run_line(&mut self, line: &str) -> Result<LineStatus, ShellError> {
        let commands = match parse_line(line) {
            Ok(commands) => commands,
            Err(e) => {
                report(&mut io::stderr(), &e);
                return Ok(LineStatus::Continue);
            }
        };
        self.execute_commands(&commands)
    }

    /// Runs the commands in order. External programs are started without
    /// waiting; built-ins run to completion before the next command starts.
    fn execute_commands(&mut self, commands: &[ParsedCommand]) -> Result<LineStatus, ShellError> {
        let mut children = Vec::new();

        for command in commands {
            let mut destination = match Destination::open(command.redirect.as_deref()) {
                Ok(destination) => destination,
                Err(e) => {
                    report(&mut io::stderr(), &e);
                    continue;
                }
            };

            match self.dispatch(command, &destination) {
                Ok(Dispatched::Child(child)) => children.push(child),
                Ok(Dispatched::Inline) => {}
                Ok(Dispatched::Exit) => return Ok(LineStatus::Exit),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => report(&mut destination.error_sink(), &e),
            }
        }

        for mut child in children {
            let pid = child.id();
            match child.wait() {
                Ok(status) => log::debug!("process {pid} finished: {status}"),
                Err(e) => log::warn!("could not wait for process {pid}: {e}"),
            }
        }
        Ok(LineStatus::Continue)
    }

    /// Resolves a command against the current search path and starts it.
    fn dispatch(
        &mut self,
        command: &ParsedCommand,
        destination: &Destination,
    ) -> Result<Dispatched, ShellError> {
        if let Some(path) = self.search_path.resolve_executable(command.name()) {
            let child = spawn(&path, command, destination)?;
            log::debug!("started `{}` as process {}", path.display(), child.id());
            return Ok(Dispatched::Child(child));
        }

        let Some(built_in) = BuiltIn::resolve(command.name()) else {
            return Err(ShellError::UnknownCommand(command.name().to_string()));
        };
        match built_in.run(command.operands(), &mut self.search_path)? {
            Flow::Continue => Ok(Dispatched::Inline),
            Flow::Exit => Ok(Dispatched::Exit),
        }
    }
}

/// The outcome of starting one command.
enum Dispatched {
    /// An external program now running.
    Child(Child),

    /// A built-in that has already finished.
    Inline,

    /// The `exit` built-in.
    Exit,
}

/// Where a command's output and error streams go.
enum Destination {
    /// The shell's own streams.
    Inherit,

    /// A file receiving both streams.
    File(File),
}

impl Destination {
    /// Creates or truncates the redirection target, if any.
    fn open(redirect: Option<&str>) -> Result<Destination, ShellError> {
        let Some(filename) = redirect else {
            return Ok(Destination::Inherit);
        };
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o700)
            .open(filename)
            .map(Destination::File)
            .map_err(|source| ShellError::OpenRedirect {
                path: PathBuf::from(filename),
                source,
            })
    }

    /// Handles for a child's stdout and stderr.
    fn stdio(&self) -> io::Result<(Stdio, Stdio)> {
        match self {
            Destination::Inherit => Ok((Stdio::inherit(), Stdio::inherit())),
            Destination::File(file) => Ok((
                Stdio::from(file.try_clone()?),
                Stdio::from(file.try_clone()?),
            )),
        }
    }

    /// Where the shell reports faults of this command.
    fn error_sink(&mut self) -> Box<dyn Write + '_> {
        match self {
            Destination::Inherit => Box::new(io::stderr()),
            Destination::File(file) => Box::new(file),
        }
    }
}

/// Starts `path` with the command's arguments, `argv[0]` being the name as
/// typed.
fn spawn(path: &Path, command: &ParsedCommand, destination: &Destination) -> Result<Child, ShellError> {
    let (stdout, stderr) = destination.stdio().map_err(|source| ShellError::OpenRedirect {
        path: PathBuf::from(command.redirect.as_deref().unwrap_or_default()),
        source,
    })?;

    Command::new(path)
        .arg0(command.name())
        .args(command.operands())
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|source| spawn_error(path, source))
}

/// Out of processes or memory ends the shell; any other failure to start a
/// program only affects that command.
fn spawn_error(path: &Path, source: io::Error) -> ShellError {
    let path = path.to_path_buf();
    match source.kind() {
        ErrorKind::WouldBlock | ErrorKind::OutOfMemory => ShellError::Spawn { path, source },
        _ => ShellError::Exec { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ERROR_MESSAGE;
    use std::fs;

    fn shell() -> Shell {
        Shell::new(&ShellConfig::default())
    }

    fn scratch_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wish-engine-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(name);
        let _ = fs::remove_file(&file);
        file
    }

    #[test]
    fn resource_exhaustion_is_fatal() {
        let path = Path::new("/bin/true");
        for kind in [ErrorKind::WouldBlock, ErrorKind::OutOfMemory] {
            let error = spawn_error(path, io::Error::from(kind));
            assert!(matches!(error, ShellError::Spawn { .. }));
            assert!(error.is_fatal());
        }
    }

    #[test]
    fn other_spawn_failures_are_command_local() {
        let path = Path::new("/bin/true");
        let exec_format = io::Error::from_raw_os_error(8); // ENOEXEC
        for source in [exec_format, io::Error::from(ErrorKind::PermissionDenied)] {
            let error = spawn_error(path, source);
            assert!(matches!(error, ShellError::Exec { .. }));
            assert!(!error.is_fatal());
        }
    }

    #[test]
    fn exit_ends_the_shell() {
        assert_eq!(shell().run_line("exit\n").unwrap(), LineStatus::Exit);
    }

    #[test]
    fn exit_with_arguments_keeps_running() {
        assert_eq!(shell().run_line("exit 1\n").unwrap(), LineStatus::Continue);
    }

    #[test]
    fn blank_line_does_nothing() {
        assert_eq!(shell().run_line("   \n").unwrap(), LineStatus::Continue);
        assert_eq!(shell().run_line("").unwrap(), LineStatus::Continue);
    }

    #[test]
    fn built_in_effects_are_visible_later_in_the_line() {
        let mut shell = shell();
        let status = shell.run_line("path /opt/wish & exit").unwrap();
        assert_eq!(status, LineStatus::Exit);
        assert_eq!(shell.search_path().dirs(), &[PathBuf::from("/opt/wish")]);
    }

    #[test]
    fn malformed_redirection_skips_the_whole_line() {
        let mut shell = shell();
        let status = shell.run_line("path /opt/wish & exit & ls > a b").unwrap();
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(shell.search_path(), &SearchPath::default());
    }

    #[test]
    fn redirected_error_goes_to_the_file() {
        let target = scratch_file("unknown.out");
        let mut shell = shell();
        shell
            .run_line(&format!("path & no-such-command > {}", target.display()))
            .unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), ERROR_MESSAGE);
    }

    #[test]
    fn redirection_truncates_existing_file() {
        let target = scratch_file("truncate.out");
        fs::write(&target, "stale contents that should disappear").unwrap();
        let mut shell = shell();
        shell.run_line(&format!("path >{}", target.display())).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "");
    }

    #[test]
    fn unopenable_redirect_target_skips_only_that_command() {
        let mut shell = shell();
        let status = shell
            .run_line("path /opt/a > /nonexistent/wish/out & path /opt/b")
            .unwrap();
        assert_eq!(status, LineStatus::Continue);
        assert_eq!(shell.search_path().dirs(), &[PathBuf::from("/opt/b")]);
    }
}

//! Commands implemented inside the shell process itself.

use std::path::Path;

use crate::{
    error::ShellError,
    system::{change_directory, SearchPath},
};

/// A shell built-in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltIn {
    /// Terminates the shell.
    Exit,

    /// Changes the working directory to a given path.
    Cd,

    /// Replaces the search path.
    Path,
}

/// What the shell should do once a built-in has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl BuiltIn {
    /// Every built-in, in lookup order.
    pub const ALL: [BuiltIn; 3] = [BuiltIn::Exit, BuiltIn::Cd, BuiltIn::Path];

    pub fn name(self) -> &'static str {
        match self {
            BuiltIn::Exit => "exit",
            BuiltIn::Cd => "cd",
            BuiltIn::Path => "path",
        }
    }

    /// Looks up the built-in called `name`.
    pub fn resolve(name: &str) -> Option<BuiltIn> {
        BuiltIn::ALL
            .into_iter()
            .find(|built_in| built_in.name() == name)
    }

    /// Runs the built-in with the arguments following its name.
    pub fn run(self, operands: &[String], search_path: &mut SearchPath) -> Result<Flow, ShellError> {
        match self {
            BuiltIn::Exit => exit(operands),
            BuiltIn::Cd => cd(operands),
            BuiltIn::Path => {
                search_path.replace(operands);
                Ok(Flow::Continue)
            }
        }
    }
}

fn exit(operands: &[String]) -> Result<Flow, ShellError> {
    if !operands.is_empty() {
        return Err(ShellError::BuiltInUsage {
            name: BuiltIn::Exit.name(),
            expected: "no arguments",
            given: operands.len(),
        });
    }
    Ok(Flow::Exit)
}

fn cd(operands: &[String]) -> Result<Flow, ShellError> {
    match operands {
        [target] => {
            change_directory(Path::new(target))?;
            Ok(Flow::Continue)
        }
        _ => Err(ShellError::BuiltInUsage {
            name: BuiltIn::Cd.name(),
            expected: "one argument",
            given: operands.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_matches_exact_names() {
        assert_eq!(BuiltIn::resolve("exit"), Some(BuiltIn::Exit));
        assert_eq!(BuiltIn::resolve("cd"), Some(BuiltIn::Cd));
        assert_eq!(BuiltIn::resolve("path"), Some(BuiltIn::Path));
        assert_eq!(BuiltIn::resolve("Exit"), None);
        assert_eq!(BuiltIn::resolve("pwd"), None);
    }

    #[test]
    fn exit_alone_requests_exit() {
        let mut search_path = SearchPath::default();
        assert_eq!(BuiltIn::Exit.run(&[], &mut search_path).unwrap(), Flow::Exit);
    }

    #[test]
    fn exit_with_arguments_is_an_error() {
        let mut search_path = SearchPath::default();
        let result = BuiltIn::Exit.run(&strings(&["0"]), &mut search_path);
        assert!(matches!(result, Err(ShellError::BuiltInUsage { given: 1, .. })));
    }

    #[test]
    fn cd_needs_exactly_one_argument() {
        let before = std::env::current_dir().unwrap();
        let mut search_path = SearchPath::default();

        assert!(BuiltIn::Cd.run(&[], &mut search_path).is_err());
        assert!(BuiltIn::Cd.run(&strings(&["/", "/tmp"]), &mut search_path).is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_to_missing_directory_is_an_error() {
        let mut search_path = SearchPath::default();
        let result = BuiltIn::Cd.run(&strings(&["/nonexistent/wish/dir"]), &mut search_path);
        assert!(matches!(result, Err(ShellError::ChangeDirectory { .. })));
    }

    #[test]
    fn path_replaces_search_path() {
        let mut search_path = SearchPath::default();
        let flow = BuiltIn::Path
            .run(&strings(&["/opt/bin", "/usr/local/bin"]), &mut search_path)
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            search_path.dirs(),
            &[PathBuf::from("/opt/bin"), PathBuf::from("/usr/local/bin")]
        );

        BuiltIn::Path.run(&[], &mut search_path).unwrap();
        assert!(search_path.dirs().is_empty());
    }
}

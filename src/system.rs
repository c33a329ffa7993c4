//! Contains all code dealing with system access.
use std::fs::{metadata, read_dir};
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

use crate::error::ShellError;

/// Directories searched for executables when no `path` has been set.
pub const DEFAULT_SEARCH_PATH: [&str; 2] = ["/bin", "/usr/bin"];

/// Ordered directories used to resolve command names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(dirs: I) -> SearchPath
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        SearchPath {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Discards every directory and uses `dirs` instead.
    pub fn replace<I, P>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        *self = SearchPath::new(dirs);
        log::debug!("search path is now {:?}", self.dirs());
    }

    /// Finds the first directory holding an executable file called `name`.
    pub fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable_file(candidate));
        log::debug!("resolved `{name}` to {found:?}");
        found
    }

    /// Names of all executables in the search path, in no particular order.
    pub fn executable_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for dir in self.dirs.iter() {
            let read_dir_iter = match read_dir(dir) {
                Ok(read_dir_iter) => read_dir_iter,
                Err(e) => {
                    log::debug!("error reading dir {}: {}", dir.display(), e);
                    continue;
                }
            };
            for dir_entry in read_dir_iter.flatten() {
                if is_executable_file(&dir_entry.path()) {
                    names.push(dir_entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        names
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        SearchPath::new(DEFAULT_SEARCH_PATH)
    }
}

/// Determines if `path` is a regular file the shell's effective user may
/// execute.
fn is_executable_file(path: &Path) -> bool {
    let is_file = metadata(path).map(|metadata| metadata.is_file()).unwrap_or(false);
    is_file && access(path, AccessFlags::X_OK).is_ok()
}

/// Changes the current directory.
pub fn change_directory(path: &Path) -> Result<(), ShellError> {
    std::env::set_current_dir(path).map_err(|source| ShellError::ChangeDirectory {
        path: path.to_path_buf(),
        source,
    })
}

//! # Executable lookup.
//!
//! Mirrors what a shell does with a command name:
//! - a name containing a path separator is used as-is (made absolute);
//! - anything else is searched in the directories listed in `PATH`, first hit wins.
//!
//! Empty `PATH` entries are skipped rather than treated as the current directory.

use std::{
    env,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Failure to resolve a command name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The command name is empty.
    #[error("empty command name")]
    Empty,

    /// No executable with this name in `PATH`.
    #[error("executable file not found in $PATH")]
    NotFound,

    /// The path exists but is not an executable file.
    #[error("{path:?} is not an executable file")]
    NotExecutable {
        /// Path that was checked.
        path: PathBuf,
    },
}

/// Resolves `name` to an absolute path of an executable file.
pub fn lookup(name: &str) -> Result<PathBuf, LookupError> {
    if name.is_empty() {
        return Err(LookupError::Empty);
    }

    if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
        let path = Path::new(name);
        if !is_executable(path) {
            return Err(LookupError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
        return std::path::absolute(path).map_err(|_| LookupError::NotExecutable {
            path: path.to_path_buf(),
        });
    }

    let paths = env::var_os("PATH").ok_or(LookupError::NotFound)?;
    env::split_paths(&paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .and_then(|found| std::path::absolute(found).ok())
        .ok_or(LookupError::NotFound)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::BuildError;

/// The directory relative paths are resolved against, and that child processes are started in.
///
/// Changing the active directory only affects this value, never the current directory of the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkDir {
    path: PathBuf,
}

/// Outcome of [`WorkDir::delete_file`]
#[derive(Debug)]
pub enum Deletion {
    Deleted,
    NotFound,
    Failed(io::Error),
}

impl Deletion {
    /// `true` unless deletion failed for a reason other than the file not existing
    pub fn is_ok(&self) -> bool {
        !matches!(self, Deletion::Failed(_))
    }
}

impl WorkDir {
    pub fn new(path: impl Into<PathBuf>) -> crate::Result<WorkDir> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(BuildError::RelativeWorkDir(path));
        }
        if !path.is_dir() {
            return Err(BuildError::NotADirectory(path));
        }

        Ok(WorkDir { path: canonical(normalize(&path)) })
    }

    /// The current directory of the process
    pub fn current() -> crate::Result<WorkDir> {
        WorkDir::new(std::env::current_dir()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The absolute form of `path`. Symlinks are resolved if the path exists.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        canonical(self.absolute(path))
    }

    /// Join `path` to this directory and remove `.` and `..` components without touching the filesystem
    fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize(&self.path.join(path))
    }

    /// The directory `count` levels above the directory containing `path`, using forward slashes.
    ///
    /// A count of 0 gives the directory containing `path`.
    pub fn path_traverse_up(&self, path: impl AsRef<Path>, count: usize) -> crate::Result<String> {
        let absolute = self.absolute(path);
        let Some(ancestor) = absolute.ancestors().skip(1).nth(count) else {
            return Err(BuildError::NoAncestor { path: absolute, count });
        };

        Ok(utils::forward_slashes(&self.resolve(ancestor)))
    }

    pub fn file_exist(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).exists()
    }

    /// Remove a file. Never fails, the result tells what happened.
    pub fn delete_file(&self, path: impl AsRef<Path>) -> Deletion {
        // symlinks themselves are removed, not their target
        let path = self.absolute(path);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Deletion::Deleted
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Deletion::NotFound,
            Err(err) => {
                debug!("Couldn't delete {}: {}", path.display(), err);
                Deletion::Failed(err)
            }
        }
    }

    /// Make `path`, resolved against the current active directory, the new active directory
    pub fn change_active_directory(&mut self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = self.resolve(path);
        if !path.is_dir() {
            return Err(BuildError::NotADirectory(path));
        }

        debug!("Active directory: {} -> {}", self, path.display());
        self.path = path;
        Ok(())
    }
}

impl std::fmt::Display for WorkDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&utils::forward_slashes(&self.path))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => { normalized.pop(); },
            component => normalized.push(component.as_os_str()),
        }
    }
    normalized
}

fn canonical(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}

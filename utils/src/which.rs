use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Finds the first path to an executable named `cmd` inside of `paths`
///
/// # Parameters
/// - `paths`: the directories to search in, usually from [`path`]
/// - `pathext`: executable extensions to try (Windows)
pub fn which<'a, P: AsRef<OsStr>>(
    cmd: &str,
    paths: impl Iterator<Item = &'a PathBuf>,
    pathext: Option<&[P]>
) -> Option<PathBuf> {
    for dir in paths {
        let candidate = dir.join(cmd);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }

        if let Some(exts) = pathext {
            for ext in exts {
                let ext = ext.as_ref().to_string_lossy();
                let mut file_name = OsString::from(cmd);
                file_name.push(".");
                file_name.push(ext.trim_start_matches('.'));
                let candidate = dir.join(file_name);
                if is_executable_file(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn is_executable_file(path: &Path) -> bool {
    path.exists() && !path.is_dir()
}

/// Returns the `PATH` environment variable
pub fn path() -> Option<Vec<PathBuf>> {
    env::var_os("PATH").map(|path| {
        env::split_paths(&path).collect()
    })
}

/// Returns the `PATHEXT` environment variable
///
/// Only set on Windows, where extensions are separated by `;`
pub fn pathext() -> Option<Vec<OsString>> {
    env::var_os("PATHEXT").map(|pathext| {
        pathext.to_string_lossy()
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(OsString::from)
            .collect()
    })
}

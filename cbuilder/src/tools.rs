use std::ffi::OsString;
use std::path::PathBuf;

use lazy_static::lazy_static;
use log::warn;

use crate::{BuildError, Platform};

struct Tool<'a> {
    name: &'a str,
    aliases: Option<&'a [&'a str]>,
    env: Option<&'a str>
}

impl<'a> Tool<'a> {
    fn find(&self) -> Option<PathBuf> {
        if let Some(env) = self.env {
            if let Some(path) = std::env::var_os(env) {
                let pathbuf = PathBuf::from(&path);
                if pathbuf.exists() {
                    return Some(pathbuf);
                }
                match path.to_str() {
                    Some(path) => match lookup(path) {
                        Some(path) => return Some(path),
                        None => warn!("Environment variable `{}` does not point to a valid path", env)
                    },
                    None => warn!("Environment variable `{}` contains an invalid UTF-8 string", env)
                }
            }
        }

        if let Some(path) = lookup(self.name) {
            return Some(path);
        }

        self.aliases?.iter().find_map(|alias| lookup(alias))
    }
}

impl<'a> Default for Tool<'a> {
    fn default() -> Self {
        Tool {
            name: "",
            aliases: None,
            env: None
        }
    }
}

fn lookup(name: &str) -> Option<PathBuf> {
    utils::which(name, env_path.iter(), env_pathext.as_ref().map(|v| v.as_slice()))
}

// Paths to executables installed on the system
lazy_static! {
    static ref env_path: Vec<PathBuf> = utils::path().unwrap_or_default();
    // mainly used for Windows
    static ref env_pathext: Option<Vec<OsString>> = utils::pathext();

    static ref sh: Option<PathBuf> = Tool { name: "sh", aliases: Some(&["bash", "zsh"]), env: None }.find();
    static ref cmd: Option<PathBuf> = Tool { name: "cmd", env: Some("COMSPEC"), ..Default::default() }.find();

    static ref open: Option<PathBuf> = Tool { name: "open", ..Default::default() }.find();
    static ref xdg_open: Option<PathBuf> = Tool {
        name: "xdg-open",
        aliases: Some(&["sensible-browser", "x-www-browser"]),
        env: Some("BROWSER")
    }.find();
}

fn require(tool: &'static Option<PathBuf>, name: &str) -> crate::Result<&'static PathBuf> {
    tool.as_ref().ok_or_else(|| BuildError::ToolNotFound(name.to_string()))
}

/// `name` itself when it is a path to an existing file, otherwise its location on `PATH`
pub(crate) fn find(name: &str) -> crate::Result<PathBuf> {
    let path = PathBuf::from(name);
    if path.components().count() > 1 && path.is_file() {
        return Ok(path);
    }
    lookup(name).ok_or_else(|| BuildError::ToolNotFound(name.to_string()))
}

/// The shell used to run command strings, and the flag that makes it read a command from its arguments
pub(crate) fn shell() -> crate::Result<(&'static PathBuf, &'static str)> {
    match Platform::host() {
        Platform::Windows => Ok((require(&cmd, "cmd")?, "/C")),
        _ => Ok((require(&sh, "sh")?, "-c")),
    }
}

/// The program (and leading arguments) that opens a url in the default browser
pub(crate) fn browser_opener() -> crate::Result<(&'static PathBuf, &'static [&'static str])> {
    match Platform::host() {
        // the empty argument is the window title
        Platform::Windows => Ok((require(&cmd, "cmd")?, &["/C", "start", ""])),
        Platform::Mac => Ok((require(&open, "open")?, &[])),
        _ => Ok((require(&xdg_open, "xdg-open")?, &[])),
    }
}

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::TokenKind;

#[derive(thiserror::Error)]
pub enum BuildError {
    // Command line builder //
    #[error("Empty {0} cannot be added to the command line")]
    EmptyArgument(TokenKind),
    #[error("The command line is empty, add at least a compiler path")]
    EmptyCommand,

    // Commands //
    #[error("Couldn't split command `{0}` into arguments")]
    InvalidCommand(String),
    #[error("A child process exited with a non-zero exit code: {0}")]
    NonZeroExitStatus(ExitStatus),
    #[error("Can't find `{0}` in path")]
    ToolNotFound(String),

    // Working directory //
    #[error("Working directory must be an absolute path, got {}", .0.display())]
    RelativeWorkDir(PathBuf),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} has no ancestor {} levels above its parent", .path.display(), .count)]
    NoAncestor { path: PathBuf, count: usize },

    // Launch //
    #[error("html file does not exist: {}", .0.display())]
    HtmlNotFound(PathBuf),
    #[error("Invalid page url: {0}")]
    UrlError(#[from] url::ParseError),

    // Recipe //
    #[error("Couldn't find a recipe file in {}. Possible filenames are {}. Alternatively you can specify the filename using `--recipe <FILE>`", .dir, .names.iter().map(|name| format!("'{}'", name)).collect::<Vec<String>>().join(", "))]
    RecipeNotFound {
        dir: String,
        names: &'static [&'static str],
    },
    #[error("Error parsing recipe {}: {}", .0.display(), .1)]
    RecipeParseError(PathBuf, toml::de::Error),
    #[error("Recipe {} has no compiler and no emscripten preset", .0.display())]
    MissingCompiler(PathBuf),

    // General Errors //
    #[error("IO Error: {0}")]
    IOError(#[from] io::Error),
}

pub type Result<Success> = std::result::Result<Success, BuildError>;

impl std::fmt::Debug for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Automatically get propper error messages from main function returning a result
        std::fmt::Display::fmt(self, f)
    }
}

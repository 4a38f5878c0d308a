use itertools::Itertools;
use log::debug;

use crate::process;
use crate::{BuildError, WorkDir};

/// The category of a [`Token`]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TokenKind {
    Compiler,
    Source,
    Optimization,
    Macro,
    Setting,
    IncludePath,
    LibraryPath,
    Library,
    Output,
    Raw,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Compiler => "compiler path",
            TokenKind::Source => "source file",
            TokenKind::Optimization => "optimization level",
            TokenKind::Macro => "macro",
            TokenKind::Setting => "compiler setting",
            TokenKind::IncludePath => "include path",
            TokenKind::LibraryPath => "library path",
            TokenKind::Library => "library",
            TokenKind::Output => "output file",
            TokenKind::Raw => "argument",
        })
    }
}

/// One argument group of a compiler invocation.
///
/// Flagged tokens are rendered as the flag, a single space and the value (`-D FOO=1`).
/// Values are never escaped or quoted.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Token {
    Compiler(String),
    Source(String),
    /// Rendered as `-O<level>`, any level is accepted
    Optimization(i32),
    /// `name` or `name=value`
    Macro(String),
    /// Backend specific setting, e.g. emscripten's `-s USE_SDL=2`
    Setting(String),
    IncludePath(String),
    LibraryPath(String),
    Library(String),
    Output(String),
    /// Appended verbatim
    Raw(String),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Compiler(_) => TokenKind::Compiler,
            Token::Source(_) => TokenKind::Source,
            Token::Optimization(_) => TokenKind::Optimization,
            Token::Macro(_) => TokenKind::Macro,
            Token::Setting(_) => TokenKind::Setting,
            Token::IncludePath(_) => TokenKind::IncludePath,
            Token::LibraryPath(_) => TokenKind::LibraryPath,
            Token::Library(_) => TokenKind::Library,
            Token::Output(_) => TokenKind::Output,
            Token::Raw(_) => TokenKind::Raw,
        }
    }

    /// The flag preceding the value, if the token has one
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Token::Optimization(_) => Some("-O"),
            Token::Macro(_) => Some("-D"),
            Token::Setting(_) => Some("-s"),
            Token::IncludePath(_) => Some("-I"),
            Token::LibraryPath(_) => Some("-L"),
            Token::Library(_) => Some("-l"),
            Token::Output(_) => Some("-o"),
            Token::Compiler(_) | Token::Source(_) | Token::Raw(_) => None,
        }
    }

    fn value(&self) -> Option<&str> {
        match self {
            Token::Optimization(_) => None,
            Token::Compiler(v) | Token::Source(v) | Token::Macro(v) |
            Token::Setting(v) | Token::IncludePath(v) | Token::LibraryPath(v) |
            Token::Library(v) | Token::Output(v) | Token::Raw(v) => Some(v.as_str()),
        }
    }

    fn validate(&self) -> crate::Result<()> {
        let invalid = match (self, self.value()) {
            (_, None) => false,
            (Token::Raw(value), _) => value.is_empty(),
            (_, Some(value)) => value.trim().is_empty(),
        };

        if invalid {
            Err(BuildError::EmptyArgument(self.kind()))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self, self.flag(), self.value()) {
            (Token::Optimization(level), _, _) => write!(f, "-O{}", level),
            (_, Some(flag), Some(value)) => write!(f, "{} {}", flag, value),
            (_, _, Some(value)) => f.write_str(value),
            (_, _, None) => Ok(()),
        }
    }
}

/// Accumulates the tokens of a compiler invocation and runs it.
///
/// Tokens are kept in the order they are added. A typical invocation adds them in this order:
/// compiler path, source files, optimization level, macros, compiler settings, include paths,
/// library paths, libraries and finally the output file. This order is not enforced.
#[derive(Clone, Debug, Default)]
pub struct CommandLineBuilder {
    tokens: Vec<Token>,
}

impl CommandLineBuilder {
    pub fn new() -> CommandLineBuilder {
        CommandLineBuilder::default()
    }

    /// Append a token, rejecting structured tokens with an empty value
    pub fn push(&mut self, token: Token) -> crate::Result<&mut Self> {
        token.validate()?;
        self.tokens.push(token);
        Ok(self)
    }

    pub fn compiler(&mut self, path: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Compiler(path.into()))
    }

    pub fn source(&mut self, path: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Source(path.into()))
    }

    /// Append `-O<level>`. Typically 2 or 3
    pub fn optimization(&mut self, level: i32) -> &mut Self {
        self.tokens.push(Token::Optimization(level));
        self
    }

    /// Append `-D <macro>`, where the macro is either `name` or `name=value`.
    ///
    /// Values containing characters special to the shell must be quoted by the caller.
    pub fn define(&mut self, macro_def: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Macro(macro_def.into()))
    }

    /// Append `-s <setting>`, supported by some compilers like emscripten
    pub fn setting(&mut self, setting: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Setting(setting.into()))
    }

    pub fn include_path(&mut self, path: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::IncludePath(path.into()))
    }

    pub fn library_path(&mut self, path: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::LibraryPath(path.into()))
    }

    pub fn library(&mut self, name: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Library(name.into()))
    }

    pub fn output(&mut self, path: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Output(path.into()))
    }

    /// Append an arbitrary argument for anything the other methods don't cover
    pub fn raw(&mut self, arg: impl Into<String>) -> crate::Result<&mut Self> {
        self.push(Token::Raw(arg.into()))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The tokens joined by single spaces
    pub fn command_line(&self) -> String {
        self.tokens.iter().join(" ")
    }

    /// Run the command line through the shell inside of `dir`, streaming its output
    pub fn build(&self, dir: &WorkDir) -> crate::Result<()> {
        if self.tokens.is_empty() {
            return Err(BuildError::EmptyCommand);
        }

        debug!("Building in {} ({} tokens)", dir, self.tokens.len());
        let status = process::stream_command(&self.command_line(), dir.path())?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::NonZeroExitStatus(status))
        }
    }
}

impl std::fmt::Display for CommandLineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_main_c() {
        let mut builder = CommandLineBuilder::new();
        builder.compiler("cc").unwrap()
            .source("main.c").unwrap()
            .output("a.out").unwrap();

        assert_eq!(builder.command_line(), "cc main.c -o a.out");
        assert_eq!(builder.to_string(), "cc main.c -o a.out");
    }

    #[test]
    fn macro_token() {
        let mut builder = CommandLineBuilder::new();
        builder.define("FOO=1").unwrap();
        assert_eq!(builder.tokens()[0].to_string(), "-D FOO=1");

        builder.define(r#"DEBUG_KEYWORDS='"main()"'"#).unwrap();
        assert_eq!(builder.tokens()[1].to_string(), r#"-D DEBUG_KEYWORDS='"main()"'"#);
    }

    #[test]
    fn preserves_order() {
        let mut builder = CommandLineBuilder::new();
        builder.compiler("g++").unwrap()
            .source("a.cpp").unwrap()
            .source("b.cpp").unwrap()
            .optimization(3)
            .define("NDEBUG").unwrap()
            .setting("FULL_ES3=1").unwrap()
            .include_path("include").unwrap()
            .library_path("lib").unwrap()
            .library("m").unwrap()
            .raw("-Wall").unwrap()
            .output("run").unwrap();

        assert_eq!(builder.len(), 11);
        let expected = [
            "g++", "a.cpp", "b.cpp", "-O3", "-D NDEBUG", "-s FULL_ES3=1",
            "-I include", "-L lib", "-l m", "-Wall", "-o run",
        ];
        let rendered: Vec<String> = builder.tokens().iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, expected);
        assert_eq!(builder.command_line(), expected.join(" "));
    }

    #[test]
    fn appending_out_of_order_is_kept() {
        let mut builder = CommandLineBuilder::new();
        builder.output("a.out").unwrap()
            .compiler("cc").unwrap()
            .output("b.out").unwrap();

        assert_eq!(builder.command_line(), "-o a.out cc -o b.out");
    }

    #[test]
    fn optimization_is_verbatim() {
        let mut builder = CommandLineBuilder::new();
        builder.optimization(-7).optimization(42);
        assert_eq!(builder.command_line(), "-O-7 -O42");
    }

    #[test]
    fn rejects_empty_values() {
        let mut builder = CommandLineBuilder::new();
        assert!(matches!(builder.include_path(""), Err(BuildError::EmptyArgument(TokenKind::IncludePath))));
        assert!(matches!(builder.output("  "), Err(BuildError::EmptyArgument(TokenKind::Output))));
        assert!(matches!(builder.compiler(""), Err(BuildError::EmptyArgument(TokenKind::Compiler))));
        assert!(matches!(builder.raw(""), Err(BuildError::EmptyArgument(TokenKind::Raw))));
        assert!(builder.is_empty());

        // raw tokens are only rejected when empty
        builder.raw(" ").unwrap();
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn empty_build() {
        let dir = WorkDir::current().unwrap();
        assert!(matches!(CommandLineBuilder::new().build(&dir), Err(BuildError::EmptyCommand)));
    }
}

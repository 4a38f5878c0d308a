//! Running command strings as child processes

use std::path::Path;
use std::process::{Command, ExitStatus};

use log::{trace, warn};

use crate::{tools, BuildError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Output goes straight to this process' stdout/stderr while the command runs
    Stream,
    /// Output is collected and returned once the command completes
    Capture,
}

#[derive(Debug)]
pub enum CommandOutput {
    Streamed(ExitStatus),
    Captured(String),
}

/// Print and run `command` inside of `dir`.
///
/// In [`OutputMode::Stream`] the command is passed to the shell as is. The exit status is returned
/// and not checked.
///
/// In [`OutputMode::Capture`] the command is split into arguments using shell quoting rules and the
/// program is started directly. Stdout followed by stderr is returned, with literal `\n` sequences
/// replaced by newlines. A non-zero exit status is an error.
pub fn run_command(command: &str, dir: &Path, mode: OutputMode) -> crate::Result<CommandOutput> {
    match mode {
        OutputMode::Stream => stream_command(command, dir).map(CommandOutput::Streamed),
        OutputMode::Capture => {
            println!("{}", command);
            let output = run_captured(command, dir)?;
            print!("{}", output);
            Ok(CommandOutput::Captured(output))
        },
    }
}

/// Print and run `command` through the shell inside of `dir`, returning its exit status
pub fn stream_command(command: &str, dir: &Path) -> crate::Result<ExitStatus> {
    println!("{}", command);
    run_streaming(command, dir)
}

fn run_streaming(command: &str, dir: &Path) -> crate::Result<ExitStatus> {
    let (shell, flag) = tools::shell()?;
    trace!("{} {} {:?} (in {})", shell.display(), flag, command, dir.display());

    let mut process = Command::new(shell)
        .args([flag, command])
        .current_dir(dir)
        .spawn()?;
    let status = process.wait()?;

    if !status.success() {
        warn!("`{}` exited with {}", command, status);
    }

    Ok(status)
}

fn run_captured(command: &str, dir: &Path) -> crate::Result<String> {
    let args = split_command(command)?;
    let Some((program, args)) = args.split_first() else {
        return Err(BuildError::InvalidCommand(command.to_string()));
    };
    trace!("{} {:?} (in {})", program, args, dir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()?;

    if !output.status.success() {
        return Err(BuildError::NonZeroExitStatus(output.status));
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(normalize_newlines(&text))
}

/// Split a command string into its arguments following POSIX shell quoting
pub fn split_command(command: &str) -> crate::Result<Vec<String>> {
    match shlex::split(command) {
        Some(args) if !args.is_empty() => Ok(args),
        _ => Err(BuildError::InvalidCommand(command.to_string())),
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_quoted_arguments() {
        let args = split_command(r#"g++ main.cpp -D "GREETING=hello world" -o a.out"#).unwrap();
        assert_eq!(args, ["g++", "main.cpp", "-D", "GREETING=hello world", "-o", "a.out"]);
    }

    #[test]
    fn split_collapses_whitespace() {
        let args = split_command("  cc   main.c  ").unwrap();
        assert_eq!(args, ["cc", "main.c"]);
    }

    #[test]
    fn split_errors() {
        assert!(matches!(split_command(""), Err(BuildError::InvalidCommand(_))));
        assert!(matches!(split_command("echo \"unbalanced"), Err(BuildError::InvalidCommand(_))));
    }

    #[test]
    fn newlines() {
        assert_eq!(normalize_newlines("a\\nb\n"), "a\nb\n");
    }
}

//! Subprocess execution
//!
//! Every external tool goes through a [`Runner`]: [`SystemRunner`] spawns real processes,
//! tests substitute a recording fake.

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::BuildError;

/// A fully assembled external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    /// Extra environment variables for the child
    env: Vec<(String, String)>,
    /// Shell snippet (ending in `&&`) that must run before the command, e.g. SDK activation
    shell_prefix: Option<String>,
    /// Name reported when the command fails
    label: Option<String>,
}

impl CommandLine {
    /// Create a command for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the command through the host shell behind `prefix`
    pub fn shell_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.shell_prefix = Some(prefix.into());
        self
    }

    /// Set the tool name used in error messages
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn get_shell_prefix(&self) -> Option<&str> {
        self.shell_prefix.as_deref()
    }

    /// The name reported when the command fails
    pub fn tool_name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.program.clone())
    }

    /// Program and arguments quoted for display
    fn invocation(&self) -> String {
        self.words().map(quote).collect::<Vec<_>>().join(" ")
    }

    /// The script handed to the host shell: `prefix` followed by the quoted command
    fn shell_script(&self, prefix: &str) -> String {
        let words: Vec<String> = self.words().map(shell_quote).collect();
        format!("{} {}", prefix, words.join(" "))
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.env.is_empty() {
            write!(f, "env ")?;
            for (key, value) in &self.env {
                write!(f, "{}={} ", key, quote(value))?;
            }
        }
        if let Some(prefix) = &self.shell_prefix {
            write!(f, "{} ", prefix)?;
        }
        write!(f, "{}", self.invocation())
    }
}

/// Quote an argument for display when it needs it
fn quote(s: &str) -> String {
    if !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Quote an argument for `sh -c`. Anything outside a small safe set is single quoted,
/// so `$`, `;`, `&` and backticks reach the program literally.
#[cfg(not(windows))]
fn shell_quote(s: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if !s.is_empty() && s.chars().all(safe) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(windows)]
fn shell_quote(s: &str) -> String {
    quote(s)
}

/// Captured output of a probe command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Executes external commands
pub trait Runner {
    /// Run with stdout/stderr passed through to the user.
    /// A non-zero exit code becomes [`BuildError::ToolFailed`].
    fn run(&mut self, command: &CommandLine, cwd: &Path) -> Result<(), BuildError>;

    /// Run and capture the output. The exit code is reported, not turned into an error.
    fn capture(&mut self, command: &CommandLine) -> Result<Captured, BuildError>;
}

/// Runner backed by real child processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(command: &CommandLine) -> Command {
        let mut cmd = match command.get_shell_prefix() {
            Some(prefix) => shell(&command.shell_script(prefix)),
            None => {
                let mut cmd = Command::new(command.program());
                cmd.args(command.get_args());
                cmd
            }
        };
        cmd.envs(command.get_env().iter().map(|(k, v)| (k, v)));
        cmd
    }

    fn invocation_error(command: &CommandLine, e: std::io::Error) -> BuildError {
        BuildError::ToolInvocation {
            tool: command.tool_name(),
            message: e.to_string(),
            hint: None,
        }
    }
}

#[cfg(windows)]
fn shell(script: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(script);
    cmd
}

#[cfg(not(windows))]
fn shell(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

impl Runner for SystemRunner {
    fn run(&mut self, command: &CommandLine, cwd: &Path) -> Result<(), BuildError> {
        let status = Self::build(command)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Self::invocation_error(command, e))?;

        if !status.success() {
            return Err(BuildError::tool_failed(
                command.tool_name(),
                status.code().unwrap_or(-1),
            ));
        }
        Ok(())
    }

    fn capture(&mut self, command: &CommandLine) -> Result<Captured, BuildError> {
        let output = Self::build(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::invocation_error(command, e))?;

        Ok(Captured {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

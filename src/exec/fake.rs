//! Recording runner for tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::exec::subprocess::Captured;
use crate::exec::{CommandLine, Runner};

type Hook = Box<dyn FnMut(&CommandLine, &Path)>;

/// Records every command instead of running it
#[derive(Default)]
pub struct FakeRunner {
    /// `run` calls in order, with their working directory
    pub runs: Vec<(PathBuf, CommandLine)>,
    /// `capture` calls in order
    pub captures: Vec<CommandLine>,
    outputs: HashMap<String, Captured>,
    failures: Vec<(String, i32)>,
    hook: Option<Hook>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `capture` of `program` with a successful stdout
    pub fn with_output(mut self, program: &str, stdout: &str) -> Self {
        self.outputs.insert(
            program.to_string(),
            Captured {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Fail every `run` whose rendered command line contains `needle`
    pub fn failing_on(mut self, needle: &str, code: i32) -> Self {
        self.failures.push((needle.to_string(), code));
        self
    }

    /// Call `hook` for every successful `run`, e.g. to fake generated files
    pub fn with_hook(mut self, hook: impl FnMut(&CommandLine, &Path) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Rendered command lines of all `run` calls
    pub fn rendered(&self) -> Vec<String> {
        self.runs.iter().map(|(_, c)| c.to_string()).collect()
    }
}

impl Runner for FakeRunner {
    fn run(&mut self, command: &CommandLine, cwd: &Path) -> Result<(), BuildError> {
        self.runs.push((cwd.to_path_buf(), command.clone()));
        let rendered = command.to_string();
        if let Some((_, code)) = self.failures.iter().find(|(n, _)| rendered.contains(n)) {
            return Err(BuildError::tool_failed(command.tool_name(), *code));
        }
        if let Some(hook) = self.hook.as_mut() {
            hook(command, cwd);
        }
        Ok(())
    }

    fn capture(&mut self, command: &CommandLine) -> Result<Captured, BuildError> {
        self.captures.push(command.clone());
        self.outputs
            .get(command.program())
            .cloned()
            .ok_or_else(|| BuildError::ToolInvocation {
                tool: command.tool_name(),
                message: "not installed".to_string(),
                hint: None,
            })
    }
}

use crate::env::Environment;
use crate::redirect::RedirectionTarget;
use anyhow::Result;
use std::ffi::{CString, NulError};
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// One element of a pipeline: a program and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Every token of the stage; `arguments[0]` is the program name.
    arguments: Vec<String>,
}

impl Stage {
    /// Build a stage from its tokens. Returns `None` if there are none.
    pub fn new(arguments: Vec<String>) -> Option<Self> {
        if arguments.is_empty() {
            None
        } else {
            Some(Self { arguments })
        }
    }

    pub fn program(&self) -> &str {
        &self.arguments[0]
    }

    /// All tokens, program included.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Tokens after the program name.
    pub fn args(&self) -> &[String] {
        &self.arguments[1..]
    }

    /// Argument vector in the form `execvp` expects. The terminating null
    /// pointer is appended by `nix` when the call is made.
    pub fn argv(&self) -> Result<Vec<CString>, NulError> {
        self.arguments.iter().map(|a| CString::new(a.as_str())).collect()
    }
}

/// An ordered list of stages with an optional redirection of the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
    pub redirect: Option<RedirectionTarget>,
}

impl Pipeline {
    /// A lone stage without redirection; the only shape builtins run in.
    pub fn as_simple(&self) -> Option<&Stage> {
        match (self.stages.as_slice(), &self.redirect) {
            ([stage], None) => Some(stage),
            _ => None,
        }
    }
}

/// Object-safe trait for anything the interpreter runs in-process.
pub trait ExecutableCommand {
    /// Executes the command; regular output goes to `stdout`, diagnostics to `stderr`.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

/// Factory that tries to create an in-process command for a stage.
///
/// Returns `None` when the factory doesn't recognize the program name, in
/// which case the stage is run as an external program.
pub trait CommandFactory {
    fn try_create(&self, stage: &Stage) -> Option<Box<dyn ExecutableCommand>>;
}

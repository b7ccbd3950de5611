//! The `+ completed` line written after every accepted command.

use crate::command::ExitCode;
use std::fmt;
use std::io::{self, Write};

/// Outcome of one accepted command line: its text and one exit code per stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub command: String,
    pub codes: Vec<ExitCode>,
}

impl ExecutionReport {
    pub fn new(command: impl Into<String>, codes: Vec<ExitCode>) -> Self {
        Self {
            command: command.into(),
            codes,
        }
    }

    /// Report for commands that run as a single unit (builtins).
    pub fn single(command: impl Into<String>, code: ExitCode) -> Self {
        Self::new(command, vec![code])
    }

    /// Write the completion line, e.g. `+ completed 'a | b' [0][2]`.
    pub fn emit(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{self}")?;
        out.flush()
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+ completed '{}' ", self.command)?;
        for code in &self.codes {
            write!(f, "[{code}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_bracket_per_stage() {
        let report = ExecutionReport::new("a | b", vec![0, 2]);
        assert_eq!(report.to_string(), "+ completed 'a | b' [0][2]");
    }

    #[test]
    fn single_command_has_one_bracket() {
        let report = ExecutionReport::single("pwd", 0);
        assert_eq!(report.to_string(), "+ completed 'pwd' [0]");
    }

    #[test]
    fn emit_terminates_the_line() {
        let mut out = Vec::new();
        ExecutionReport::new("ls > out.txt", vec![0]).emit(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "+ completed 'ls > out.txt' [0]\n");
    }
}

use std::env as stdenv;
use std::path::PathBuf;

/// Interpreter state that survives from one command line to the next.
///
/// The environment contains:
/// - `current_dir`: the working directory, kept in sync with the process by `cd`.
/// - `should_exit`: set by `exit`; the REPL stops after the current line.
///
/// Variables are not tracked here: children inherit the process environment
/// through `execvp` unchanged.
#[derive(Debug, Clone)]
pub struct Environment {
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current working directory of the process.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            should_exit: false,
        }
    }

    /// Home directory from `$HOME`, used by `cd` without an argument.
    pub fn home(&self) -> Option<PathBuf> {
        stdenv::var_os("HOME").map(PathBuf::from)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_an_absolute_directory() {
        let env = Environment::new();
        assert!(env.current_dir.is_absolute());
        assert!(!env.should_exit);
    }
}

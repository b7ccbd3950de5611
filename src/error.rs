use std::io;

/// Reasons a command line is rejected before any process is spawned.
///
/// The `Display` text is the part printed after `Error: `; scripted harnesses
/// compare it byte for byte, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// A stage has no program: the line starts with `|` or `>`, ends with `|`,
    /// or two pipes enclose nothing.
    #[error("missing command")]
    MissingCommand,
    /// The redirection operator has no target path after it.
    #[error("no output file")]
    NoOutputFile,
    /// A redirection appears anywhere but at the very end of the last stage.
    #[error("mislocated output redirection")]
    MislocatedRedirection,
    /// The redirection target cannot be opened for writing.
    #[error("cannot open output file")]
    CannotOpenFile,
    /// A stage has more tokens than the configured limit.
    #[error("too many arguments")]
    TooManyArguments,
}

/// Failures of the operating system plumbing while running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("pipe: {0}")]
    Pipe(#[source] nix::Error),
    #[error("fork: {0}")]
    Fork(#[source] nix::Error),
    #[error("waitpid: {0}")]
    Wait(#[source] nix::Error),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("argument contains a nul byte: {0}")]
    Nul(#[from] std::ffi::NulError),
}

impl ExecError {
    /// Pipe and fork failures leave the interpreter unable to run anything,
    /// so the REPL stops on them instead of moving to the next line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::Pipe(_) | ExecError::Fork(_) | ExecError::Wait(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_error_messages_match_the_harness_texts() {
        let cases = [
            (LineError::MissingCommand, "Error: missing command"),
            (LineError::NoOutputFile, "Error: no output file"),
            (LineError::MislocatedRedirection, "Error: mislocated output redirection"),
            (LineError::CannotOpenFile, "Error: cannot open output file"),
            (LineError::TooManyArguments, "Error: too many arguments"),
        ];
        for (err, text) in cases {
            assert_eq!(format!("Error: {err}"), text);
        }
    }

    #[test]
    fn only_os_plumbing_failures_are_fatal() {
        assert!(ExecError::Fork(nix::Error::EAGAIN).is_fatal());
        assert!(ExecError::Pipe(nix::Error::EMFILE).is_fatal());
        let open = ExecError::Open {
            path: "x".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!open.is_fatal());
    }
}

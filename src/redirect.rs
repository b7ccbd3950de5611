//! Output redirection clauses: detaching them from the last stage and opening the target file.

use crate::error::LineError;
use crate::lexer::Token;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

/// How the redirection target is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`: create or truncate.
    Truncate,
    /// `>>`: create or append.
    Append,
}

/// Destination of the last stage's standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectionTarget {
    pub path: PathBuf,
    pub mode: RedirectMode,
}

impl RedirectionTarget {
    pub fn new(path: impl Into<PathBuf>, mode: RedirectMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// Open the target for writing, creating it with mode `0666` (minus umask).
    pub fn open(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        match self.mode {
            RedirectMode::Truncate => options.truncate(true),
            RedirectMode::Append => options.append(true),
        };
        options.open(&self.path)
    }

    /// Check that the target can be opened, then close it again right away.
    pub fn preflight(&self) -> Result<(), LineError> {
        match self.open() {
            Ok(file) => {
                drop(file);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "redirection pre-flight failed");
                Err(LineError::CannotOpenFile)
            }
        }
    }
}

/// Detach a trailing redirection clause from the tokens of the last stage.
///
/// Returns the remaining tokens and the target, if any. A clause with no
/// target is [`LineError::NoOutputFile`]; a redirection anywhere but at the
/// end is [`LineError::MislocatedRedirection`].
pub fn resolve(stage: &[Token]) -> Result<(&[Token], Option<RedirectionTarget>), LineError> {
    let (rest, target) = match stage.split_last() {
        Some((Token::Redirect { mode, target }, rest)) => {
            if target.is_empty() {
                return Err(LineError::NoOutputFile);
            }
            (rest, Some(RedirectionTarget::new(target, *mode)))
        }
        _ => (stage, None),
    };
    if rest.iter().any(|t| matches!(t, Token::Redirect { .. })) {
        return Err(LineError::MislocatedRedirection);
    }
    Ok((rest, target))
}

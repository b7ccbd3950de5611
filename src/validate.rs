//! Pre-flight classification of a tokenized command line.
//!
//! Runs before anything is forked. The checks are ordered and the first one
//! that matches decides the outcome:
//! missing command, no output file, mislocated redirection, cannot open file.

use crate::error::LineError;
use crate::lexer::Token;
use crate::redirect::RedirectionTarget;

/// Classify `tokens` as well-formed or as one of the [`LineError`] kinds.
///
/// The only side effect is the open/close of the redirection target, which
/// creates the file (and truncates it in `>` mode) exactly as running the
/// command would.
pub fn validate(tokens: &[Token]) -> Result<(), LineError> {
    check_missing_command(tokens)?;
    check_no_output_file(tokens)?;
    check_redirection_position(tokens)?;
    check_output_file(tokens)
}

fn check_missing_command(tokens: &[Token]) -> Result<(), LineError> {
    match tokens.first() {
        Some(Token::Pipe | Token::Redirect { .. }) => return Err(LineError::MissingCommand),
        _ => {}
    }
    if let Some(Token::Pipe) = tokens.last() {
        return Err(LineError::MissingCommand);
    }
    if tokens
        .split(|t| *t == Token::Pipe)
        .any(|stage| !stage.iter().any(Token::is_word))
    {
        return Err(LineError::MissingCommand);
    }
    Ok(())
}

fn check_no_output_file(tokens: &[Token]) -> Result<(), LineError> {
    match tokens.last() {
        Some(Token::Redirect { target, .. }) if target.is_empty() => Err(LineError::NoOutputFile),
        _ => Ok(()),
    }
}

fn check_redirection_position(tokens: &[Token]) -> Result<(), LineError> {
    let Some((_, rest)) = tokens.split_last() else {
        return Ok(());
    };
    if rest.iter().any(|t| matches!(t, Token::Redirect { .. })) {
        return Err(LineError::MislocatedRedirection);
    }
    Ok(())
}

fn check_output_file(tokens: &[Token]) -> Result<(), LineError> {
    match tokens.last() {
        Some(Token::Redirect { mode, target }) => {
            RedirectionTarget::new(target, *mode).preflight()
        }
        _ => Ok(()),
    }
}

//! Builds a [`Pipeline`] out of a validated token stream.

use crate::command::{Pipeline, Stage};
use crate::error::LineError;
use crate::lexer::Token;
use crate::redirect;

/// Turn a validated token stream into a [`Pipeline`].
///
/// Stages are separated by [`Token::Pipe`]; the redirection clause, if any,
/// is detached from the last stage before its words are collected. A stage
/// with more than `max_args` tokens (program included) is rejected with
/// [`LineError::TooManyArguments`].
pub fn construct_pipeline(tokens: &[Token], max_args: usize) -> Result<Pipeline, LineError> {
    let mut chunks: Vec<&[Token]> = tokens.split(|t| *t == Token::Pipe).collect();
    let last = chunks.pop().unwrap_or(&[]);
    let (last, redirect) = redirect::resolve(last)?;
    chunks.push(last);

    let stages = chunks
        .into_iter()
        .map(|chunk| parse_stage(chunk, max_args))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pipeline { stages, redirect })
}

fn parse_stage(tokens: &[Token], max_args: usize) -> Result<Stage, LineError> {
    let mut arguments = Vec::new();
    for token in tokens {
        match token {
            Token::Word(w) => {
                if arguments.len() >= max_args {
                    return Err(LineError::TooManyArguments);
                }
                arguments.push(w.clone());
            }
            Token::Pipe => return Err(LineError::MissingCommand),
            Token::Redirect { .. } => return Err(LineError::MislocatedRedirection),
        }
    }
    Stage::new(arguments).ok_or(LineError::MissingCommand)
}

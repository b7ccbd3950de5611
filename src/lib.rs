//! A small line-oriented shell in the spirit of the classic `sshell` exercise.
//!
//! Each command line is tokenized once ([`lexer`]), checked before anything
//! runs ([`validate`]), turned into a [`command::Pipeline`] ([`parser`]) and
//! executed as one child process per stage, connected by pipes, with an
//! optional `>`/`>>` redirection of the last stage ([`executor`]). Every
//! accepted line ends with a completion report on standard error:
//!
//! ```text
//! + completed 'cat notes.txt | grep todo | wc -l' [0][1][0]
//! ```
//!
//! The main entry point is [`Interpreter`], which also hosts the `cd`, `pwd`,
//! `exit` and `sls` builtins and the read-eval-print loop.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod redirect;
pub mod report;
pub mod validate;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::{Interpreter, Outcome};

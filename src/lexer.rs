//! Lexical analysis of a command line.
//!
//! The line is scanned exactly once. Everything later in the pipeline
//! (validation, redirection, parsing, builtin dispatch) works on the
//! resulting tokens and never looks at the raw text again.

use crate::redirect::RedirectMode;

/// A token produced by [`split_into_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of characters that are neither whitespace, `|` nor `>`.
    Word(String),
    /// The pipe operator, `|`.
    Pipe,
    /// An output redirection, `>` or `>>`, together with its target text.
    ///
    /// The target spans everything up to the next `|`, `>` or the end of the
    /// line, with surrounding whitespace removed. It may be empty.
    Redirect { mode: RedirectMode, target: String },
}

impl Token {
    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

struct LexingFSM<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LexingFSM<'a> {
    fn new(input: &'a str) -> Self {
        LexingFSM { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    /// Consume characters while `keep` holds and return the consumed slice.
    fn take_while<F>(&mut self, keep: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !keep(ch) {
                break;
            }
            self.advance(ch);
        }
        &self.input[start..self.pos]
    }

    fn is_operator(ch: char) -> bool {
        ch == '|' || ch == '>'
    }

    fn read_redirect(&mut self) -> Token {
        self.advance('>');
        let mode = if self.peek_char() == Some('>') {
            self.advance('>');
            RedirectMode::Append
        } else {
            RedirectMode::Truncate
        };
        let target = self.take_while(|c| !Self::is_operator(c)).trim();
        Token::Redirect {
            mode,
            target: target.to_string(),
        }
    }

    fn make_tokens(mut self) -> Vec<Token> {
        let mut out = Vec::new();
        loop {
            self.take_while(char::is_whitespace);
            match self.peek_char() {
                None => break,
                Some('|') => {
                    self.advance('|');
                    out.push(Token::Pipe);
                }
                Some('>') => out.push(self.read_redirect()),
                Some(_) => {
                    let word = self.take_while(|c| !c.is_whitespace() && !Self::is_operator(c));
                    out.push(Token::Word(word.to_string()));
                }
            }
        }
        out
    }
}

/// Split a command line into [`Token`]s.
///
/// Lexing never fails: every structural problem (a dangling pipe, an empty
/// redirection target, ...) is left for the validator to classify.
pub fn split_into_tokens(line: &str) -> Vec<Token> {
    let tokens = LexingFSM::new(line).make_tokens();
    tracing::debug!(?tokens, "tokenized command line");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    fn redirect(mode: RedirectMode, target: &str) -> Token {
        Token::Redirect {
            mode,
            target: target.to_string(),
        }
    }

    #[test]
    fn splits_on_runs_of_whitespace() {
        assert_eq!(
            split_into_tokens("  ls   -l\t/tmp "),
            vec![word("ls"), word("-l"), word("/tmp")]
        );
    }

    #[test]
    fn pipes_need_no_surrounding_spaces() {
        assert_eq!(
            split_into_tokens("echo hi|tr a-z A-Z | cat"),
            vec![
                word("echo"),
                word("hi"),
                Token::Pipe,
                word("tr"),
                word("a-z"),
                word("A-Z"),
                Token::Pipe,
                word("cat"),
            ]
        );
    }

    #[test]
    fn truncate_and_append_redirections() {
        assert_eq!(
            split_into_tokens("echo hi >out.txt"),
            vec![word("echo"), word("hi"), redirect(RedirectMode::Truncate, "out.txt")]
        );
        assert_eq!(
            split_into_tokens("echo hi >>   log.txt"),
            vec![word("echo"), word("hi"), redirect(RedirectMode::Append, "log.txt")]
        );
    }

    #[test]
    fn redirect_target_keeps_inner_spaces() {
        assert_eq!(
            split_into_tokens("echo hi > my file"),
            vec![word("echo"), word("hi"), redirect(RedirectMode::Truncate, "my file")]
        );
    }

    #[test]
    fn redirect_target_stops_at_pipe() {
        assert_eq!(
            split_into_tokens("echo hi > out.txt | cat"),
            vec![
                word("echo"),
                word("hi"),
                redirect(RedirectMode::Truncate, "out.txt"),
                Token::Pipe,
                word("cat"),
            ]
        );
    }

    #[test]
    fn empty_redirect_target_is_kept_for_validation() {
        assert_eq!(
            split_into_tokens("ls >"),
            vec![word("ls"), redirect(RedirectMode::Truncate, "")]
        );
    }

    #[test]
    fn blank_line_has_no_tokens() {
        assert!(split_into_tokens("   ").is_empty());
    }
}

//! Runtime knobs of the interpreter.
//!
//! The defaults reproduce the limits of the classic `sshell` assignment:
//! 512-byte command lines and 16 tokens per command.

/// Maximum length of one command line, newline included.
pub const CMDLINE_MAX: usize = 512;

/// Maximum number of tokens (program included) in one pipeline stage.
pub const ARGS_MAX: usize = 16;

/// Prompt printed before every line.
pub const DEFAULT_PROMPT: &str = "sshell@ucd$ ";

/// Whether each line read is echoed back to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Echo only when standard input is not a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl EchoMode {
    pub fn should_echo(self, stdin_is_terminal: bool) -> bool {
        match self {
            EchoMode::Auto => !stdin_is_terminal,
            EchoMode::Always => true,
            EchoMode::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_line_len: usize,
    pub max_args: usize,
    pub echo: EchoMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_line_len: CMDLINE_MAX,
            max_args: ARGS_MAX,
            echo: EchoMode::Auto,
        }
    }
}

impl Config {
    /// Cut `line` the way a fixed `fgets` buffer would: at most
    /// `max_line_len - 1` bytes survive, never splitting a character.
    ///
    /// Returns `true` when something was dropped.
    pub fn clamp_line(&self, line: &mut String) -> bool {
        let limit = self.max_line_len.saturating_sub(1);
        if line.len() <= limit {
            return false;
        }
        let mut cut = limit;
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_classic_limits() {
        let config = Config::default();
        assert_eq!(config.max_line_len, 512);
        assert_eq!(config.max_args, 16);
        assert_eq!(config.prompt, "sshell@ucd$ ");
    }

    #[test]
    fn clamp_line_keeps_short_lines() {
        let config = Config::default();
        let mut line = "echo hello".to_string();
        assert!(!config.clamp_line(&mut line));
        assert_eq!(line, "echo hello");
    }

    #[test]
    fn clamp_line_respects_char_boundaries() {
        let config = Config {
            max_line_len: 5,
            ..Config::default()
        };
        // "abé" is 4 bytes; the limit of 4 bytes fits it exactly.
        let mut fits = "abé".to_string();
        assert!(!config.clamp_line(&mut fits));

        let mut line = "abcé".to_string();
        assert!(config.clamp_line(&mut line));
        assert_eq!(line, "abc");
    }

    #[test]
    fn echo_mode_auto_follows_terminal() {
        assert!(EchoMode::Auto.should_echo(false));
        assert!(!EchoMode::Auto.should_echo(true));
        assert!(EchoMode::Always.should_echo(true));
        assert!(!EchoMode::Never.should_echo(false));
    }
}

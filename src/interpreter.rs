use crate::command::CommandFactory;
use crate::config::Config;
use crate::env::Environment;
use crate::error::{ExecError, LineError};
use crate::executor;
use crate::lexer;
use crate::parser;
use crate::report::ExecutionReport;
use crate::validate;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, IsTerminal, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate, the builtins.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// What happened to one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing but whitespace; ignored.
    Blank,
    /// Rejected with a single `Error: ...` line; nothing was run.
    Rejected,
    /// Ran to completion; the report has been written.
    Completed(ExecutionReport),
}

/// A line-oriented shell: tokenizes, validates and runs one line at a time.
///
/// Builtins (see [`Default`]) run in-process when a line is a single stage
/// without redirection. Everything else goes through the pipeline executor.
///
/// Example
/// ```no_run
/// use sshell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = std::io::stdout();
/// let mut err = std::io::stderr();
/// sh.run_line("ls -l | wc -l", &mut out, &mut err).unwrap();
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of builtin factories.
    pub fn new(config: Config, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            config,
            commands,
        }
    }

    /// Interpreter with the default builtins and the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self::new(config, default_builtins())
    }

    /// Settings this interpreter was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `true` once `exit` has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Run one command line.
    ///
    /// Program output goes straight to the inherited descriptors; builtin output
    /// goes to `stdout`. Error messages and the completion report go to `stderr`.
    /// Only fatal plumbing failures (pipe, fork, wait) are returned as errors.
    pub fn run_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Outcome, ExecError> {
        let command = line.trim();
        if command.is_empty() {
            return Ok(Outcome::Blank);
        }

        let tokens = lexer::split_into_tokens(command);
        let pipeline = match validate::validate(&tokens)
            .and_then(|()| parser::construct_pipeline(&tokens, self.config.max_args))
        {
            Ok(pipeline) => pipeline,
            Err(e) => return Ok(reject(stderr, e)),
        };

        if let Some(stage) = pipeline.as_simple() {
            if let Some(builtin) = self.commands.iter().find_map(|f| f.try_create(stage)) {
                tracing::debug!(program = stage.program(), "running builtin");
                let _ = stdout.flush();
                return match builtin.execute(stdout, stderr, &mut self.env) {
                    Ok(code) => Ok(complete(stderr, ExecutionReport::single(command, code))),
                    Err(e) => {
                        let _ = writeln!(stderr, "Error: {e}");
                        Ok(Outcome::Rejected)
                    }
                };
            }
        }

        let _ = stdout.flush();
        match executor::execute(&pipeline, command) {
            Ok(report) => Ok(complete(stderr, report)),
            Err(e) if e.is_fatal() => Err(e),
            Err(ExecError::Open { .. }) => Ok(reject(stderr, LineError::CannotOpenFile)),
            Err(e) => {
                let _ = writeln!(stderr, "Error: {e}");
                Ok(Outcome::Rejected)
            }
        }
    }

    /// Read-eval-print loop on the process's standard streams.
    ///
    /// A terminal gets line editing and history; anything else is read line
    /// by line with each line echoed after the prompt, so transcripts of
    /// scripted sessions read like interactive ones.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        if io::stdin().is_terminal() {
            self.repl_interactive()
        } else {
            let stdin = io::stdin();
            self.run_script(stdin.lock(), &mut io::stdout(), &mut io::stderr())
        }
    }

    fn repl_interactive(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let echo = self.config.echo.should_echo(true);

        while !self.env.should_exit {
            match rl.readline(&self.config.prompt) {
                Ok(mut line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.clamp(&mut line);
                    if echo {
                        println!("{line}");
                    }
                    self.run_line(&line, &mut io::stdout(), &mut io::stderr())?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Run every line of `input` until EOF or `exit`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD before the
    /// line is tokenized.
    pub fn run_script<R: BufRead>(
        &mut self,
        mut input: R,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let echo = self.config.echo.should_echo(false);
        let mut buf = Vec::new();

        while !self.env.should_exit {
            write!(stdout, "{}", self.config.prompt)?;
            stdout.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Invalid UTF-8 only spoils the bytes it covers, not the session.
            let mut line = String::from_utf8_lossy(&buf)
                .trim_end_matches(['\n', '\r'])
                .to_string();
            self.clamp(&mut line);
            if echo {
                writeln!(stdout, "{line}")?;
                stdout.flush()?;
            }
            self.run_line(&line, stdout, stderr)?;
        }
        Ok(())
    }

    fn clamp(&self, line: &mut String) {
        if self.config.clamp_line(line) {
            tracing::warn!(
                max = self.config.max_line_len,
                "command line too long, truncated"
            );
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default configuration and builtins:
    /// `pwd`, `cd`, `exit`, `sls`.
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

fn default_builtins() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Sls>::default()),
    ]
}

fn reject(stderr: &mut dyn Write, err: LineError) -> Outcome {
    tracing::debug!(%err, "command line rejected");
    let _ = writeln!(stderr, "Error: {err}");
    Outcome::Rejected
}

fn complete(stderr: &mut dyn Write, report: ExecutionReport) -> Outcome {
    let _ = report.emit(stderr);
    Outcome::Completed(report)
}

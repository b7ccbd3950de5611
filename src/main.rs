use argh::FromArgs;
use sshell::Interpreter;
use sshell::config::{Config, EchoMode};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A simple shell: pipelines, output redirection and a few builtins.
struct Args {
    /// prompt printed before each command line
    #[argh(option)]
    prompt: Option<String>,

    /// maximum number of tokens per command, program included
    #[argh(option)]
    max_args: Option<usize>,

    /// maximum command line length in bytes, newline included
    #[argh(option)]
    max_line_len: Option<usize>,

    /// echo every command line, even when reading from a terminal
    #[argh(switch)]
    echo: bool,

    /// never echo command lines read from a non-terminal input
    #[argh(switch)]
    no_echo: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let defaults = Config::default();
        let echo = match (self.echo, self.no_echo) {
            (true, true) => anyhow::bail!("--echo and --no-echo are mutually exclusive"),
            (true, false) => EchoMode::Always,
            (false, true) => EchoMode::Never,
            (false, false) => defaults.echo,
        };
        Ok(Config {
            prompt: self.prompt.unwrap_or(defaults.prompt),
            max_args: self.max_args.unwrap_or(defaults.max_args),
            max_line_len: self.max_line_len.unwrap_or(defaults.max_line_len),
            echo,
        })
    }
}

fn main() -> anyhow::Result<()> {
    // Off by default: stderr is reserved for diagnostics and completion lines.
    let filter = EnvFilter::try_from_env("SSHELL_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args: Args = argh::from_env();
    let mut sh = Interpreter::with_config(args.into_config()?);
    tracing::debug!(config = ?sh.config(), "starting");

    if let Err(e) = sh.repl() {
        tracing::error!(error = %e, "shell terminated");
        return Err(e);
    }
    Ok(())
}

//! Running a [`Pipeline`] as a chain of child processes.
//!
//! For `N` stages the executor opens `N - 1` pipes, forks one child per stage,
//! points each child's standard streams at the right pipe ends (or at the
//! redirection target for the last stage) and then waits for every child in
//! stage order.
//!
//! All descriptors live in `Plumbing` as [`OwnedFd`]s, so they are closed
//! when it is dropped: in the parent once every child is forked, in a child
//! right after its two `dup2` calls, and on every early-return path.

use crate::command::{ExitCode, Pipeline};
use crate::error::ExecError;
use crate::report::ExecutionReport;
use nix::errno::Errno;
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
use nix::fcntl::{FcntlArg, FdFlag, fcntl};
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{self, ForkResult, Pid};
use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

/// Exit code of a stage whose program could not be executed.
pub const COMMAND_NOT_FOUND: ExitCode = 127;

/// Exit code of a child that failed to set up its standard streams.
const SETUP_FAILED: ExitCode = 126;

/// Offset added to the signal number when a stage is killed by a signal.
pub const SIGNAL_EXIT_BASE: ExitCode = 128;

/// Every descriptor the executor opens for one pipeline.
struct Plumbing {
    /// `pipes[i]` connects stage `i` (write end) to stage `i + 1` (read end).
    pipes: Vec<(OwnedFd, OwnedFd)>,
    target: Option<OwnedFd>,
}

impl Plumbing {
    fn new(stages: usize, target: Option<OwnedFd>) -> Result<Self, ExecError> {
        let pipes = (1..stages)
            .map(|_| cloexec_pipe().map_err(ExecError::Pipe))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pipes, target })
    }

    /// Descriptor that replaces standard input of stage `i`, if any.
    fn stdin_of(&self, i: usize) -> Option<RawFd> {
        let prev = i.checked_sub(1)?;
        self.pipes.get(prev).map(|(read, _)| read.as_raw_fd())
    }

    /// Descriptor that replaces standard output of stage `i`, if any.
    fn stdout_of(&self, i: usize) -> Option<RawFd> {
        match self.pipes.get(i) {
            Some((_, write)) => Some(write.as_raw_fd()),
            None => self.target.as_ref().map(AsRawFd::as_raw_fd),
        }
    }
}

/// A pipe whose ends are closed by `exec` in any process that did not `dup2`
/// them onto a standard stream.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn cloexec_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    unistd::pipe2(OFlag::O_CLOEXEC)
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
fn cloexec_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    let (read, write) = unistd::pipe()?;
    for fd in [&read, &write] {
        fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
    }
    Ok((read, write))
}

/// Run `pipeline` to completion and report one exit code per stage.
///
/// `command` is the text echoed back in the report. A stage whose program
/// cannot be executed prints `Error: command not found` and contributes
/// [`COMMAND_NOT_FOUND`]; a stage killed by signal `s` contributes
/// `128 + s`.
///
/// Pipe and fork failures are returned as errors; children already started
/// at that point are waited for first.
pub fn execute(pipeline: &Pipeline, command: &str) -> Result<ExecutionReport, ExecError> {
    let programs = pipeline
        .stages
        .iter()
        .map(|stage| stage.argv())
        .collect::<Result<Vec<_>, _>>()?;

    let target = match &pipeline.redirect {
        Some(redirect) => {
            let file = redirect.open().map_err(|source| ExecError::Open {
                path: redirect.path.display().to_string(),
                source,
            })?;
            Some(OwnedFd::from(file))
        }
        None => None,
    };
    let plumbing = Plumbing::new(programs.len(), target)?;

    // Anything still buffered would otherwise be written once more by each child.
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    let mut children = Vec::with_capacity(programs.len());
    for (i, argv) in programs.iter().enumerate() {
        let stdin = plumbing.stdin_of(i);
        let stdout = plumbing.stdout_of(i);
        // SAFETY: the interpreter is single-threaded; the child only calls
        // dup2/close/execvp/write/_exit.
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Parent { child }) => {
                tracing::debug!(stage = i, pid = %child, program = ?argv[0], "spawned stage");
                children.push(child);
            }
            Ok(ForkResult::Child) => exec_stage(argv, stdin, stdout, plumbing),
            Err(e) => {
                tracing::error!(stage = i, error = %e, "fork failed");
                drop(plumbing);
                reap(&children);
                return Err(ExecError::Fork(e));
            }
        }
    }
    drop(plumbing);

    let codes = children
        .iter()
        .map(|&pid| wait_for(pid))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ExecutionReport::new(command, codes))
}

/// Child side of one stage: wire the standard streams, close everything
/// inherited from the pipeline, then become `argv[0]`.
fn exec_stage(
    argv: &[CString],
    stdin: Option<RawFd>,
    stdout: Option<RawFd>,
    plumbing: Plumbing,
) -> ! {
    let wired = redirect_stream(stdin, libc::STDIN_FILENO)
        .and_then(|_| redirect_stream(stdout, libc::STDOUT_FILENO));
    drop(plumbing);
    if wired.is_err() {
        child_exit(b"Error: cannot set up pipeline\n", SETUP_FAILED);
    }

    match unistd::execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(_) => child_exit(b"Error: command not found\n", COMMAND_NOT_FOUND),
    }
}

fn redirect_stream(from: Option<RawFd>, to: RawFd) -> nix::Result<()> {
    match from {
        Some(fd) if fd != to => unistd::dup2(fd, to).map(|_| ()),
        _ => Ok(()),
    }
}

/// Unbuffered write to stderr, then `_exit` so the parent's atexit handlers
/// and stdio buffers are left alone.
fn child_exit(message: &[u8], code: ExitCode) -> ! {
    let _ = unistd::write(io::stderr(), message);
    unsafe { libc::_exit(code) }
}

/// Block until `pid` terminates and translate its status into an exit code.
fn wait_for(pid: Pid) -> Result<ExitCode, ExecError> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => {
                tracing::debug!(%pid, code, "stage exited");
                return Ok(code);
            }
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                tracing::debug!(%pid, ?signal, "stage killed by signal");
                return Ok(SIGNAL_EXIT_BASE + signal as ExitCode);
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(e) => return Err(ExecError::Wait(e)),
        }
    }
}

/// Wait for children that were started before a later stage failed to fork.
fn reap(children: &[Pid]) {
    for &pid in children {
        if let Err(e) = wait_for(pid) {
            tracing::warn!(%pid, error = %e, "could not reap stage");
        }
    }
}

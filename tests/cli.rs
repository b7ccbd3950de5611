use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_script(dir: &Path, script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sshell"))
        .current_dir(dir)
        .env_remove("SSHELL_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start sshell");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn transcript_of_a_short_session() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_script(dir.path(), "echo hello\nls |\nexit\necho never\n");

    assert!(out.status.success());
    assert_eq!(
        text(&out.stdout),
        "sshell@ucd$ echo hello\nhello\nsshell@ucd$ ls |\nsshell@ucd$ exit\n"
    );
    assert_eq!(
        text(&out.stderr),
        "+ completed 'echo hello' [0]\nError: missing command\nBye...\n+ completed 'exit' [0]\n"
    );
}

#[test]
fn unknown_program_is_reported_by_the_child() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_script(dir.path(), "sshell-no-such-program arg\n");

    assert!(out.status.success());
    assert_eq!(
        text(&out.stderr),
        "Error: command not found\n+ completed 'sshell-no-such-program arg' [127]\n"
    );
}

#[test]
fn redirection_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_script(
        dir.path(),
        "echo one > out.txt\necho two >> out.txt\ncat out.txt | wc -l\n",
    );

    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "one\ntwo\n"
    );
    let stdout = text(&out.stdout);
    assert!(stdout.contains("cat out.txt | wc -l\n2\n"), "{stdout}");
    assert!(text(&out.stderr).ends_with("+ completed 'cat out.txt | wc -l' [0][0]\n"));
}

#[test]
fn syntax_errors_never_produce_reports() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_script(
        dir.path(),
        "| ls\nls >\necho hi > out.txt | cat\nls > /no/such/dir/out.txt\n",
    );

    assert_eq!(
        text(&out.stderr),
        "Error: missing command\n\
         Error: no output file\n\
         Error: mislocated output redirection\n\
         Error: cannot open output file\n"
    );
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn cd_changes_directory_for_later_commands() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("file.txt"), "abc").unwrap();

    let out = run_script(dir.path(), "cd sub\nsls\ncd missing-dir\n");

    assert!(text(&out.stdout).contains("file.txt (3 bytes)\n"));
    assert_eq!(
        text(&out.stderr),
        "+ completed 'cd sub' [0]\n\
         + completed 'sls' [0]\n\
         Error: cannot cd into directory\n\
         + completed 'cd missing-dir' [1]\n"
    );
}

#[test]
fn no_echo_flag_suppresses_echo() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_sshell"))
        .args(["--no-echo", "--prompt", "$ "])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"true\n").unwrap();
    let out = child.wait_with_output().unwrap();

    assert_eq!(text(&out.stdout), "$ $ ");
    assert_eq!(text(&out.stderr), "+ completed 'true' [0]\n");
}

#[test]
fn echo_flags_conflict() {
    let out = Command::new(env!("CARGO_BIN_EXE_sshell"))
        .args(["--echo", "--no-echo"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(text(&out.stderr).contains("mutually exclusive"));
    assert!(out.stdout.is_empty());
}

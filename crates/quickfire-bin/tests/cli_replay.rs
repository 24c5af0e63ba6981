use std::io::Write;
use std::process::{Command, Stdio};

const CONFIG: &str = r#"[[triggers]]
match = "brb"
replace = "be right back"

[[triggers]]
match = ":)"
replace = "🙂"
prefix = '^$|\s$'
"#;

fn quickfire(dir: &tempfile::TempDir) -> Command {
    let config = dir.path().join("quickfire.toml");
    std::fs::write(&config, CONFIG).unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quickfire"));
    cmd.arg("--config")
        .arg(&config)
        .arg("--log-dir")
        .arg(dir.path());
    cmd
}

#[test]
fn text_arguments_are_typed_and_printed() {
    let dir = tempfile::tempdir().unwrap();
    let out = quickfire(&dir).args(["ok", "brb", ":)"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "ok be right back 🙂\n");
    assert!(dir.path().join("quickfire.log").exists());
}

#[test]
fn stdin_is_typed_line_by_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = quickfire(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"brb\n:) x:)\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "be right back\n🙂 x:)\n"
    );
}

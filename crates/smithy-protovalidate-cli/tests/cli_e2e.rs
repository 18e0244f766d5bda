use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_inject-protovalidate"))
}

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, text).expect("write fixture");
}

fn fixture(root: &Path) -> (PathBuf, PathBuf) {
    let smithy = root.join("smithy");
    let proto = root.join("proto");
    write(
        &smithy.join("model.smithy"),
        "namespace demo\nstructure Msg {\n  @length(min: 1, max: 100)\n  content: String\n}\n",
    );
    write(
        &proto.join("demo/model.proto"),
        "syntax = \"proto3\";\npackage demo;\n\nmessage Msg {\n  string content = 1;\n}\n",
    );
    (smithy, proto)
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
    let out = Command::new(bin()).output().expect("run binary");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));

    let out = Command::new(bin())
        .args(["a", "b", "c"])
        .output()
        .expect("run binary");
    assert!(!out.status.success());
}

#[test]
fn patches_and_prints_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (smithy, proto) = fixture(dir.path());

    let out = Command::new(bin())
        .arg(&smithy)
        .arg(&proto)
        .output()
        .expect("run binary");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Patched 1 field(s)"));
    assert!(stdout.contains("across  1 .proto file(s)."));

    let patched = fs::read_to_string(proto.join("demo/model.proto")).expect("read proto");
    assert!(patched.contains("(buf.validate.field).string.min_len = 1"));
    assert!(patched.contains("(buf.validate.field).string.max_len = 100"));
}

#[test]
fn check_mode_reports_drift_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (smithy, proto) = fixture(dir.path());
    let target = proto.join("demo/model.proto");
    let before = fs::read_to_string(&target).expect("read proto");

    let out = Command::new(bin())
        .arg("--check")
        .arg(&smithy)
        .arg(&proto)
        .output()
        .expect("run binary");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&target).expect("read proto"), before);

    let out = Command::new(bin())
        .arg(&smithy)
        .arg(&proto)
        .output()
        .expect("run binary");
    assert!(out.status.success());

    let out = Command::new(bin())
        .arg("--check")
        .arg(&smithy)
        .arg(&proto)
        .output()
        .expect("run binary");
    assert!(out.status.success());
}

#[test]
fn verbose_run_lists_rewritten_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (smithy, proto) = fixture(dir.path());

    let out = Command::new(bin())
        .arg("-v")
        .arg(&smithy)
        .arg(&proto)
        .output()
        .expect("run binary");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let listed: Vec<&str> = stdout.lines().filter(|l| l.contains("model.proto")).collect();
    assert_eq!(listed.len(), 1, "stdout: {stdout}");
}

use std::{
    env, fs,
    path::PathBuf,
    process::{Command, Output},
};

fn bin_path() -> String {
    if let Some(path) = option_env!("CARGO_BIN_EXE_range-lang") {
        return path.to_string();
    }
    let mut fallback = PathBuf::from(root());
    fallback.push("target");
    fallback.push("debug");
    fallback.push("range-lang");
    if cfg!(windows) {
        fallback.set_extension("exe");
    }
    if fallback.exists() {
        return fallback.to_string_lossy().into_owned();
    }
    panic!(
        "binary path not set by cargo test and fallback {:?} not found",
        fallback
    );
}

fn root() -> String {
    env::var("CARGO_MANIFEST_DIR").expect("manifest dir not set by cargo")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .current_dir(root())
        .env_remove("RANGE_LANG_MAX_DEPTH")
        .args(args)
        .output()
        .expect("failed to run range-lang")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn infer_prints_the_result_type() {
    let output = run(&["infer", "demos/basics.rl", "fib", "--arg", "0..5"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "fib :: [0, 5] -> int[1, 8]");
}

#[test]
fn restrict_prints_the_narrowed_argument() {
    let output = run(&[
        "restrict",
        "demos/basics.rl",
        "fib",
        "--arg",
        "0..5",
        "--target",
        "1",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "fib :: [0, 1] -> 1");
}

#[test]
fn many_clause_recursion_completes_at_the_default_depth() {
    let output = run(&["infer", "demos/deep.rl", "down", "--arg", "100"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "down :: 100 -> 0");

    let output = run(&["run", "demos/deep.rl", "down", "100"]);
    assert_eq!(stdout(&output).trim(), "down 100 = 0");
}

#[test]
fn unbounded_recursion_reports_the_depth_limit() {
    let output = run(&["--max-depth", "600", "infer", "demos/basics.rl", "repeat", "--arg", "0.."]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("call depth exceeded 600"), "stderr: {stderr}");
}

#[test]
fn run_evaluates_concretely() {
    let output = run(&["run", "demos/basics.rl", "fib", "5"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "fib 5 = 8");

    let output = run(&["run", "demos/basics.rl", "repeat", "3"]);
    assert_eq!(stdout(&output).trim(), "repeat 3 = 3 : 2 : 1 : []");
}

#[test]
fn analysis_errors_exit_with_failure() {
    let output = run(&["infer", "demos/basics.rl", "unsafe"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot take head of an empty list"), "stderr: {stderr}");
}

#[test]
fn depth_limit_is_configurable() {
    let output = Command::new(bin_path())
        .current_dir(root())
        .env("RANGE_LANG_MAX_DEPTH", "4")
        .args(["run", "demos/basics.rl", "loop", "1"])
        .output()
        .expect("failed to run range-lang");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Runtime error"), "stderr: {stderr}");
    assert!(stderr.contains('4'), "stderr: {stderr}");
}

#[test]
fn dump_lists_folded_functions() {
    let output = run(&["dump", "demos/basics.rl"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("repeat = ifz((x - 0), [], x : repeat((x - 1)))"), "{text}");
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn syntax_errors_are_reported() {
    let mut path = env::temp_dir();
    path.push(format!("range-lang-bad-{}.rl", std::process::id()));
    fs::write(&path, "good = 1\nbad = (1 +\n").expect("write temp source");
    let output = run(&["dump", path.to_str().expect("utf-8 temp path")]);
    let _ = fs::remove_file(&path);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn rejects_unknown_extensions() {
    let output = run(&["dump", "Cargo.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Only .rl files"), "stderr: {stderr}");
}

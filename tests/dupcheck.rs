use assert_cmd::cargo::cargo_bin_cmd;

use crate::utils::testfs::TestFs;

mod utils;

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn clean_file() {
    let src = r#"
let config
{
    let local
    use config
    use local
}
let local
"#;

    let fs = TestFs::new("clean_file").unwrap();
    let input = fs.write("clean.txt", src);

    cargo_bin_cmd!("dupcheck").arg(&input).assert().success();
}

#[test]
fn redeclaration_fails() {
    let src = "let a\n{\n  let b\n  let a\n}\n";

    let output = cargo_bin_cmd!("dupcheck")
        .arg("--color=never")
        .write_stdin(src)
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("dupcheck: error: <stdin>:4: 'a' redeclared (first declared on line 1)"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn undeclared_use_fails() {
    let output = cargo_bin_cmd!("dupcheck")
        .arg("-")
        .write_stdin("{ let inner }\nuse inner\n")
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("<stdin>:2: 'inner' is not declared"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn malformed_input_reports_file() {
    let fs = TestFs::new("malformed_input_reports_file").unwrap();
    let input = fs.write("broken.txt", "let a\n}\n");

    let output = cargo_bin_cmd!("dupcheck")
        .arg(&input)
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("broken.txt: line 2: '}' without a matching '{'"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn missing_file() {
    let fs = TestFs::new("missing_file").unwrap();

    let output = cargo_bin_cmd!("dupcheck")
        .arg(fs.join_path("does-not-exist.txt"))
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(stderr_of(&output).contains("cannot read"));
}

#[test]
fn files_are_checked_independently() {
    let fs = TestFs::new("files_are_checked_independently").unwrap();
    let first = fs.write("first.txt", "let shared\n");
    let second = fs.write("second.txt", "let shared\nuse shared\n");

    cargo_bin_cmd!("dupcheck")
        .arg(&first)
        .arg(&second)
        .assert()
        .success();
}

#[test]
fn deterministic_matches_default() {
    let mut src = String::new();
    for i in 0..64 {
        src.push_str(&format!("{{ let n{i} use n{i} let n{} }}\n", i % 7));
    }

    let default = cargo_bin_cmd!("dupcheck")
        .write_stdin(src.clone())
        .output()
        .unwrap();

    let deterministic = cargo_bin_cmd!("dupcheck")
        .arg("--deterministic")
        .write_stdin(src)
        .output()
        .unwrap();

    assert_eq!(default.status.code(), deterministic.status.code());
    assert_eq!(default.stderr, deterministic.stderr);
}

#[test]
fn stats_are_printed() {
    let output = cargo_bin_cmd!("dupcheck")
        .arg("--stats")
        .write_stdin("let a\nuse a\n")
        .assert()
        .success()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("<stdin>: 1 declarations, 1 references, 1 fast hits, 1 exact lookups"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn error_limit_stops_early() {
    let mut src = String::from("let x\n");
    for _ in 0..10 {
        src.push_str("let x\n");
    }

    let output = cargo_bin_cmd!("dupcheck")
        .arg("--error-limit=3")
        .write_stdin(src)
        .assert()
        .failure()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert_eq!(stderr.matches("redeclared").count(), 3, "{stderr}");
    assert!(stderr.contains("too many errors emitted, exiting"));
}

const RED_ERROR: &str = "\x1b[0;1;31merror:\x1b[0m";

/// Runs `dupcheck` on a source with one redeclaration and returns stderr.
fn redeclaration_stderr(args: &[&str], env: &[(&str, &str)]) -> String {
    let mut cmd = cargo_bin_cmd!("dupcheck");
    for name in ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE"] {
        cmd.env_remove(name);
    }

    let output = cmd
        .args(args)
        .envs(env.iter().copied())
        .write_stdin("let a\nlet a\n")
        .assert()
        .failure()
        .get_output()
        .clone();

    stderr_of(&output)
}

#[test]
fn color_always() {
    let stderr = redeclaration_stderr(&["--color=always"], &[("NO_COLOR", "1")]);
    assert!(
        stderr.contains(&format!("dupcheck: {RED_ERROR} <stdin>:2:")),
        "unexpected stderr: {stderr:?}"
    );
}

#[test]
fn clicolor_force_enables_colors() {
    let stderr = redeclaration_stderr(&[], &[("CLICOLOR_FORCE", "1")]);
    assert!(stderr.contains(RED_ERROR), "unexpected stderr: {stderr:?}");
}

#[test]
fn no_color_wins_over_clicolor_force() {
    let stderr = redeclaration_stderr(&[], &[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]);
    assert!(!stderr.contains('\x1b'), "unexpected stderr: {stderr:?}");
    assert!(
        stderr.contains("dupcheck: error: <stdin>:2: 'a' redeclared"),
        "unexpected stderr: {stderr:?}"
    );
}

#[test]
fn auto_colors_off_when_piped() {
    let stderr = redeclaration_stderr(&["--color=auto"], &[]);
    assert!(!stderr.contains('\x1b'), "unexpected stderr: {stderr:?}");
}

#[test]
fn timing_is_printed() {
    let output = cargo_bin_cmd!("dupcheck")
        .env_remove("CLICOLOR_FORCE")
        .arg("--print-timing")
        .write_stdin("let a\nuse a\n")
        .assert()
        .success()
        .get_output()
        .clone();

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("dupcheck: info: <stdin>: check time: "),
        "unexpected stderr: {stderr}"
    );
    assert!(stderr.trim_end().ends_with("ms"), "unexpected stderr: {stderr}");
}

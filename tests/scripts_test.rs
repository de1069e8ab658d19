use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn english(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_english"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("ENGLISH_MAX_ITERATIONS")
        .env_remove("ENGLISH_TIMEOUT_MS")
        .output()
        .expect("failed to launch the english binary")
}

fn demo(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn every_demo_runs_cleanly() {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let mut scripts = fs::read_dir(&demos)
        .expect("demos directory is missing")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("eng"))
        .filter(|path| path.file_stem().and_then(|stem| stem.to_str()) != Some("errors"))
        .collect::<Vec<_>>();
    scripts.sort();
    assert!(!scripts.is_empty(), "no .eng scripts found in {:?}", demos);

    for script in scripts {
        let path = script.to_string_lossy();
        let output = english(&["run", "--fail-fast", &path]);
        assert!(
            output.status.success(),
            "{} failed\nstdout: {}\nstderr: {}",
            path,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn basics_prints_expected_values() {
    let lines = stdout_lines(&english(&["run", &demo("basics.eng")]));
    for expected in ["13", "15", "big", "4"] {
        assert!(lines.iter().any(|line| line == expected), "missing {:?} in {:?}", expected, lines);
    }
}

#[test]
fn collections_and_objects() {
    let lines = stdout_lines(&english(&["run", &demo("collections.eng")]));
    for expected in ["[42, 23, 19, 7]", "42", "2", "build"] {
        assert!(lines.iter().any(|line| line == expected), "missing {:?} in {:?}", expected, lines);
    }

    let lines = stdout_lines(&english(&["run", &demo("objects.eng")]));
    for expected in ["7", "Rex says woof"] {
        assert!(lines.iter().any(|line| line == expected), "missing {:?} in {:?}", expected, lines);
    }
}

#[test]
fn failures_do_not_stop_a_run_by_default() {
    let output = english(&["run", &demo("errors.eng")]);
    assert!(output.status.success());
    assert!(stdout_lines(&output).contains(&"still running".to_string()));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[error] DivisionByZero: division by zero"));
}

#[test]
fn fail_fast_stops_at_the_first_failure() {
    let output = english(&["run", "--fail-fast", &demo("errors.eng")]);
    assert!(!output.status.success());
    assert!(!stdout_lines(&output).contains(&"still running".to_string()));
}

#[test]
fn json_output_has_one_object_per_instruction() {
    let output = english(&["--json", "run", &demo("errors.eng")]);
    let results = stdout_lines(&output)
        .iter()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("invalid JSON line"))
        .collect::<Vec<_>>();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["kind"], "DivisionByZero");
    assert_eq!(results[2]["data"], "still running");
}

#[test]
fn iteration_cap_comes_from_the_environment() {
    let script = std::env::temp_dir().join(format!("english-cap-{}.eng", std::process::id()));
    fs::write(&script, "Set n to 0\nSet one to 1\nWhile n is less than 1000, add one to n\n")
        .expect("could not write the temporary script");

    let output = Command::new(env!("CARGO_BIN_EXE_english"))
        .args(["run", "--fail-fast", &script.to_string_lossy()])
        .env("ENGLISH_MAX_ITERATIONS", "10")
        .output()
        .expect("failed to launch the english binary");
    let _ = fs::remove_file(&script);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cancelled"));
}

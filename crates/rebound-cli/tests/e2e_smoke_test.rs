use std::{fs, path::Path};

use tempfile::tempdir;

use rebound_cli::{Args, CliError, run};

fn args_for(input: &Path, config: Option<&Path>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        config: config.map(|path| path.to_string_lossy().to_string()),
        column_width: None,
        no_line_context: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_documents() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let documents = [
        ("empty.lst", "[]", 0),
        ("flat.lst", "[1, 2, 3]\n", 3),
        ("nested.lst", "[\n  [nil, true],\n  \"x\",\n  -7\n]\n", 5),
    ];

    for (name, content, items) in documents {
        let path = temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write input");

        let value = run(&args_for(&path, None))
            .unwrap_or_else(|err| panic!("{name} should be valid: {err}"));
        assert_eq!(value.count_items(), items, "item count of {name}");
    }
}

#[test]
fn e2e_smoke_test_invalid_document_reports_position() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("broken.lst");
    fs::write(&path, "[1,\n 2,\n ?]\n").expect("Failed to write input");

    let err = run(&args_for(&path, None)).expect_err("input is malformed");

    let (err, report) = match err {
        CliError::Parse { err, report } => (err, report),
        other => panic!("expected a parse error, got {other}"),
    };
    assert_eq!(err.position().line(), 3);
    assert_eq!(err.position().column(), 2);

    let lines: Vec<&str> = report.lines().collect();
    assert!(lines[0].ends_with("broken.lst: Ln: 3 Col: 2"), "{report}");
    assert_eq!(lines[1], " ?]");
    assert_eq!(lines[2], " ^");
    assert_eq!(
        lines[3],
        "Expecting: false, integer, list, nil, string or true"
    );
}

#[test]
fn e2e_smoke_test_config_file_controls_rendering() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.lst");
    fs::write(&input, "[1 2]").expect("Failed to write input");
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[render]\ninitial_indent = \"| \"\nshow_line_context = false\n",
    )
    .expect("Failed to write config");

    let err = run(&args_for(&input, Some(&config))).expect_err("input is malformed");

    let report = err.to_string();
    assert!(report.lines().all(|line| line.starts_with("| ")), "{report}");
    assert!(!report.contains('^'), "{report}");
}

#[test]
fn e2e_smoke_test_zero_column_width_is_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("ok.lst");
    fs::write(&input, "[]").expect("Failed to write input");

    let mut args = args_for(&input, None);
    args.column_width = Some(0);

    assert!(matches!(run(&args), Err(CliError::Config(_))));
}

#[test]
fn e2e_smoke_test_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.lst");

    assert!(matches!(run(&args_for(&input, None)), Err(CliError::Io(_))));
}

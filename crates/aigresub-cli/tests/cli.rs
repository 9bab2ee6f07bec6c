use std::fs;
use std::process::Command;

fn aag_fixture() -> &'static str {
    // aag M I L O A, two PIs, one output, one AND gate: out = pi1 & pi2
    "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n"
}

#[test]
fn writes_default_output_path_next_to_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("circuit.aag");
    fs::write(&input, aag_fixture())?;

    let status = Command::new(env!("CARGO_BIN_EXE_aigresub"))
        .arg(&input)
        .status()?;
    assert!(status.success());

    let expected = dir.path().join("circuit.resub.aig");
    assert!(expected.exists());
    Ok(())
}

#[test]
fn stats_flag_prints_a_summary_line() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("circuit.aag");
    fs::write(&input, aag_fixture())?;
    let output = dir.path().join("out.aig");

    let result = Command::new(env!("CARGO_BIN_EXE_aigresub"))
        .arg(&input)
        .arg(&output)
        .arg("-s")
        .output()?;
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("gate"));
    Ok(())
}

#[test]
fn malformed_input_exits_nonzero_with_error_message() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("bad.aag");
    fs::write(&input, b"not an aiger file\n")?;

    let result = Command::new(env!("CARGO_BIN_EXE_aigresub")).arg(&input).output()?;
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error"));
    Ok(())
}

use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_motion_synth"));
    // keep the optional asset config out of the way
    command.current_dir(std::env::temp_dir());
    command
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("motion_synth_cli_{}_{name}", std::process::id()))
}

#[test]
fn render_writes_wav_and_report() {
    let wav = temp_file("render.wav");
    let output = cli()
        .args(["render", "--gesture", "arm-raise", "--duration", "1.5", "--output"])
        .arg(&wav)
        .output()
        .expect("failed to run motion_synth render");
    assert!(
        output.status.success(),
        "CLI exited with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let report: Value = serde_json::from_str(stdout.trim()).expect("render report JSON payload");
    assert_eq!(report["strategy"], "left-wrist");
    assert_eq!(report["frames"], 45);
    assert!(report["peak"].as_f64().unwrap_or_default() > 0.0);

    let (samples, sample_rate) = motion_synth::fixtures::read_wav(&wav).expect("rendered WAV");
    let _ = std::fs::remove_file(&wav);
    assert_eq!(sample_rate, 44_100);
    assert!(!samples.is_empty());
}

#[test]
fn map_streams_json_lines() {
    let output = cli()
        .args(["--strategy", "chord", "map", "--gesture", "idle", "--duration", "0.5"])
        .output()
        .expect("failed to run motion_synth map");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0]["params"].as_array().map(Vec::len), Some(3));
    assert!(lines[0]["timestamp_ms"].is_number());
}

#[test]
fn map_reads_recordings() {
    let recording = temp_file("poses.jsonl");
    let mut world = vec![serde_json::json!({"x": 0.0, "y": -1.0, "z": 0.0}); 33];
    world[15] = serde_json::json!({"x": 0.2, "y": -2.0, "z": 0.0});
    let line = serde_json::json!({"timestamp": 0.0, "worldLandmarks": [world]});
    std::fs::write(&recording, format!("{line}\n{}\n", serde_json::json!({"timestamp": 33.0})))
        .unwrap();

    let output = cli()
        .args(["map", "--input"])
        .arg(&recording)
        .output()
        .expect("failed to run motion_synth map");
    let _ = std::fs::remove_file(&recording);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    // the empty second pose is skipped
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("880"), "expected top of range, got {stdout}");
}

#[test]
fn strategies_lists_every_kind() {
    let output = cli()
        .arg("strategies")
        .output()
        .expect("failed to run motion_synth strategies");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    for name in ["left-wrist", "wrists-harmonics", "chord", "dual-chord", "chord-field"] {
        assert!(stdout.contains(&format!("\"{name}\"")), "missing {name}");
    }
}

#[test]
fn unknown_strategy_is_rejected() {
    let output = cli()
        .args(["--strategy", "theremin", "strategies"])
        .output()
        .expect("failed to run motion_synth");
    assert!(!output.status.success());
}

#[test]
fn missing_config_file_is_an_error() {
    let missing = temp_file("absent.json");
    let output = cli()
        .arg("--config")
        .arg(&missing)
        .arg("strategies")
        .output()
        .expect("failed to run motion_synth");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reading config"), "stderr: {stderr}");
}

#[test]
fn malformed_config_file_is_an_error() {
    let path = temp_file("malformed.json");
    std::fs::write(&path, "{\"synth\": {\"sample_rate\": ").unwrap();
    let output = cli()
        .arg("--config")
        .arg(&path)
        .args(["map", "--gesture", "idle", "--duration", "0.5"])
        .output()
        .expect("failed to run motion_synth");
    let _ = std::fs::remove_file(&path);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsing config"), "stderr: {stderr}");
}

#[test]
fn invalid_config_values_fail_every_command() {
    let path = temp_file("invalid.json");
    std::fs::write(&path, "{\"synth\": {\"buffer_size\": 0}}").unwrap();
    let output = cli()
        .arg("--config")
        .arg(&path)
        .arg("strategies")
        .output()
        .expect("failed to run motion_synth");
    let _ = std::fs::remove_file(&path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validating configuration"), "stderr: {stderr}");
    assert!(stderr.contains("synth.buffer_size"), "stderr: {stderr}");
}

#[test]
fn explicit_partial_config_uses_defaults_for_the_rest() {
    let path = temp_file("partial.json");
    std::fs::write(&path, "{\"mapping\": {\"strategy\": \"chord\"}}").unwrap();
    let output = cli()
        .arg("--config")
        .arg(&path)
        .args(["map", "--gesture", "idle", "--duration", "0.5"])
        .output()
        .expect("failed to run motion_synth");
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let first: Value = serde_json::from_str(stdout.lines().next().unwrap_or_default()).expect("JSON line");
    assert_eq!(first["params"].as_array().map(Vec::len), Some(3));
}

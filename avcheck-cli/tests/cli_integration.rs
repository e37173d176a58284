// End-to-end runs of the avcheck binary against stub ffmpeg/ffprobe scripts.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

const HLS_LINE: &str = " D  hls             Apple HTTP Live Streaming";
const HLSV2_LINE: &str = " D  hlsv2           Prefixed name";

const PROBE_JSON: &str = r#"{"streams":[{"index":0,"codec_type":"video","codec_name":"h264"},{"index":1,"codec_type":"audio","codec_name":"aac"}],"format":{"duration":"12.5"}}"#;

fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn ffmpeg_script(demuxer_line: &str) -> String {
    format!(
        r#"case "$*" in
  *-version*) echo "ffmpeg version 6.1.1-stub Copyright (c) 2000-2023 the FFmpeg developers" ;;
  *-codecs*) printf 'Codecs:\n D..... = Decoding supported\n -------\n DEV.LS h264  H.264\n DEV.L. hevc  H.265\n DEA.L. aac   AAC\n' ;;
  *-formats*) printf 'File formats:\n D. = Demuxing supported\n --\n DE mov,mp4,m4a QuickTime / MOV\n D  hls  Apple HTTP Live Streaming\n' ;;
  *-demuxers*) printf 'File formats:\n D. = Demuxing supported\n --\n{}\n' ;;
  *) echo "unexpected arguments: $*" >&2; exit 1 ;;
esac"#,
        demuxer_line
    )
}

fn ffprobe_script(open_body: &str) -> String {
    format!(
        r#"case "$*" in
  *-version*) echo "ffprobe version 6.1.1-stub" ;;
  *) {} ;;
esac"#,
        open_body
    )
}

fn ok_open_body() -> String {
    format!("printf '%s\\n' '{}'", PROBE_JSON)
}

/// Stub toolchain in a temporary directory.
struct Stubs {
    dir: TempDir,
}

impl Stubs {
    fn new(demuxer_line: &str, open_body: &str) -> Result<Self, Box<dyn Error>> {
        let dir = tempdir()?;
        write_script(dir.path(), "ffmpeg", &ffmpeg_script(demuxer_line))?;
        write_script(dir.path(), "ffprobe", &ffprobe_script(open_body))?;
        Ok(Self { dir })
    }

    fn working() -> Result<Self, Box<dyn Error>> {
        Self::new(HLS_LINE, &ok_open_body())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("avcheck").expect("Failed to find avcheck binary");
        for var in [
            "AVCHECK_URL",
            "AVCHECK_DEMUXER",
            "AVCHECK_TIMEOUT",
            "AVCHECK_EXEC_TIMEOUT",
            "AVCHECK_FFMPEG",
            "AVCHECK_FFPROBE",
            "AVCHECK_FORMAT",
        ] {
            cmd.env_remove(var);
        }
        cmd.arg("--ffmpeg")
            .arg(self.dir.path().join("ffmpeg"))
            .arg("--url")
            .arg("https://example.com/live/index.m3u8");
        cmd
    }
}

#[test]
fn test_full_run_passes() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::working()?;

    stubs
        .command()
        .assert()
        .success()
        .stdout(contains("✓ load: FFmpeg runtime at"))
        .stdout(contains("✓ version: binding"))
        .stdout(contains("engine 6.1.1-stub"))
        .stdout(contains("✓ codecs: 3 codecs available; common: h264, h265, aac"))
        .stdout(contains("✓ formats: 4 formats available"))
        .stdout(contains("✓ demuxer: hls demuxer is present"))
        .stdout(contains("✓ remote-open: opened https://example.com/live/index.m3u8 with 2 stream(s)"))
        .stdout(contains("All checks passed!"));

    Ok(())
}

#[test]
fn test_prefixed_demuxer_halts_at_demuxer_check() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::new(HLSV2_LINE, &ok_open_body())?;

    stubs
        .command()
        .assert()
        .code(1)
        .stdout(contains("✗ demuxer: hls demuxer is not present"))
        .stdout(contains("remote-open").not())
        .stdout(contains("All checks passed").not());

    Ok(())
}

#[test]
fn test_missing_ffmpeg_fails_load() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    let output = Command::cargo_bin("avcheck")?
        .env_remove("AVCHECK_FORMAT")
        .arg("--ffmpeg")
        .arg(dir.path().join("ffmpeg"))
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("✗ load:"));
    assert!(stdout.contains("was not found"));

    Ok(())
}

#[test]
fn test_key_value_report() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::working()?;

    let output = stubs.command().arg("--format").arg("kv").assert().success().get_output().clone();
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("check=load outcome=pass fatal=true detail=\""));
    assert!(lines[4].starts_with("check=demuxer outcome=pass"));
    assert_eq!(lines[6], "summary=pass state=completed checks=6 exit_code=0");

    Ok(())
}

#[test]
fn test_json_report() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::new(HLSV2_LINE, &ok_open_body())?;

    let output = stubs.command().arg("--format").arg("json").assert().code(1).get_output().clone();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    assert_eq!(report["status"], "fatal");
    assert_eq!(report["state"], "halted");
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[4]["name"], "demuxer");
    assert_eq!(results[4]["fatal"], true);

    Ok(())
}

#[test]
fn test_offline_skips_remote_open() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::new(HLS_LINE, "exit 1")?;

    stubs
        .command()
        .arg("--offline")
        .assert()
        .success()
        .stdout(contains("- remote-open: no stream URL configured (offline)"));

    Ok(())
}

#[test]
fn test_remote_open_timeout_is_bounded() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::new(HLS_LINE, "exec sleep 10")?;

    let started = Instant::now();
    stubs
        .command()
        .arg("--timeout")
        .arg("1")
        .assert()
        .code(1)
        .stdout(contains("✗ remote-open: ffprobe open timed out after 1s"));
    assert!(started.elapsed() < Duration::from_secs(8));

    Ok(())
}

#[test]
fn test_missing_secure_transport() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::new(
        HLS_LINE,
        "echo 'https: Protocol not found' >&2; exit 1",
    )?;

    stubs
        .command()
        .assert()
        .code(1)
        .stdout(contains("✗ remote-open: network error"))
        .stdout(contains("https is not compiled into the backend"));

    Ok(())
}

#[test]
fn test_invalid_timeout_rejected() {
    Command::cargo_bin("avcheck")
        .expect("Failed to find avcheck binary")
        .arg("--timeout")
        .arg("0")
        .assert()
        .failure();
}

#[test]
fn test_log_file_written() -> Result<(), Box<dyn Error>> {
    let stubs = Stubs::working()?;
    let log_path = stubs.dir.path().join("logs").join("avcheck.log");

    stubs.command().arg("--log-file").arg(&log_path).assert().success();

    let log = fs::read_to_string(&log_path)?;
    assert!(log.contains("Running: "));
    assert!(log.contains("Check 'demuxer'"));

    Ok(())
}

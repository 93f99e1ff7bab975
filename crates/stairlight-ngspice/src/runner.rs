//! Batch-mode ngspice invocation.
//!
//! Each run gets its own scratch directory holding the deck, the rawfile,
//! the ngspice log and captured stderr. The directory is removed when the
//! run returns, whatever the outcome.

use std::borrow::Cow;
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::rawfile::parse_rawfile;
use crate::types::RawfileData;

/// Lines of the ngspice log quoted in error messages.
const LOG_TAIL_LINES: usize = 20;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Where to find ngspice and how long to let it run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgspiceConfig {
    /// Executable path, or a bare name looked up on `PATH`.
    pub executable: String,
    /// Wall-clock limit for one run.
    pub timeout_secs: u64,
}

impl Default for NgspiceConfig {
    fn default() -> Self {
        Self {
            executable: "ngspice".to_string(),
            timeout_secs: 60,
        }
    }
}

impl NgspiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn unavailable(&self, reason: impl ToString) -> Error {
        Error::EngineUnavailable {
            executable: self.executable.clone(),
            reason: reason.to_string(),
        }
    }
}

/// First line of the `--version` banner, without the `*` framing.
pub fn ngspice_version(config: &NgspiceConfig) -> Result<String> {
    let output = config
        .command()
        .arg("--version")
        .stderr(Stdio::null())
        .output()
        .map_err(|e| config.unavailable(e))?;
    if !output.status.success() {
        return Err(config.unavailable(format!("--version exited with {}", output.status)));
    }

    let banner = String::from_utf8_lossy(&output.stdout);
    let version = banner
        .lines()
        .map(|l| l.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        .find(|l| !l.is_empty())
        .unwrap_or("unknown");
    Ok(version.to_string())
}

pub fn is_ngspice_available(config: &NgspiceConfig) -> bool {
    ngspice_version(config).is_ok()
}

/// Scratch files of one run.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    const DECK: &'static str = "deck.cir";
    const RAW: &'static str = "out.raw";
    const LOG: &'static str = "ngspice.log";
    const STDERR: &'static str = "stderr.txt";

    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("stairlight-").tempdir()?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// File contents, or an empty string if ngspice never wrote it.
    fn read_text(&self, name: &str) -> String {
        fs::read(self.path(name))
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

/// Append `.end` unless the deck already finishes with it.
fn terminated(netlist: &str) -> Cow<'_, str> {
    let last = netlist.lines().map(str::trim).filter(|l| !l.is_empty()).last();
    if last.is_some_and(|l| l.eq_ignore_ascii_case(".end")) {
        Cow::Borrowed(netlist)
    } else {
        Cow::Owned(format!("{}\n.end\n", netlist.trim_end()))
    }
}

/// Last non-blank lines of the engine log.
fn log_tail(log: &str) -> String {
    let lines: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(LOG_TAIL_LINES)..].join("\n")
}

/// `"\n<label>:\n<text>"`, or nothing for blank text.
fn section(label: &str, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!("\n{}:\n{}", label, text)
    }
}

/// Run `netlist` through `ngspice -b -r <raw> -o <log>` and parse the rawfile.
///
/// A non-zero exit, a missing or empty rawfile and an expired timeout are
/// all errors; failures quote stderr and the tail of the ngspice log.
pub fn run_ngspice(netlist: &str, config: &NgspiceConfig) -> Result<RawfileData> {
    let work = Workspace::new()?;
    fs::write(work.path(Workspace::DECK), terminated(netlist).as_bytes())?;
    let stderr = File::create(work.path(Workspace::STDERR))?;

    let mut cmd = config.command();
    cmd.arg("-b")
        .arg("-r")
        .arg(work.path(Workspace::RAW))
        .arg("-o")
        .arg(work.path(Workspace::LOG))
        .arg(work.path(Workspace::DECK))
        .stdout(Stdio::null())
        .stderr(stderr);
    log::debug!("running {:?}", cmd);

    let started = Instant::now();
    let child = cmd.spawn().map_err(|e| config.unavailable(e))?;
    let status = wait_with_deadline(child, config.timeout())?;
    log::info!("ngspice finished in {:.2?} ({})", started.elapsed(), status);

    let log_text = work.read_text(Workspace::LOG);
    if !status.success() {
        return Err(Error::SimulationFailed(format!(
            "ngspice exited with {}{}{}",
            status,
            section("stderr", &work.read_text(Workspace::STDERR)),
            section("log", &log_tail(&log_text))
        )));
    }

    let raw = fs::read(work.path(Workspace::RAW)).unwrap_or_default();
    if raw.is_empty() {
        return Err(Error::SimulationFailed(format!(
            "ngspice wrote no results{}",
            section("log", &log_tail(&log_text))
        )));
    }
    parse_rawfile(&raw)
}

/// Wait for `child`, killing it once `timeout` has passed.
fn wait_with_deadline(mut child: Child, timeout: Duration) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            log::warn!("killed ngspice after {:?}", timeout);
            return Err(Error::Timeout(timeout.as_secs()));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_json() {
        let config: NgspiceConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.executable, "ngspice");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(NgspiceConfig::default().timeout_secs, 60);
    }

    #[test]
    fn test_missing_executable() {
        let config = NgspiceConfig {
            executable: "/nonexistent/ngspice-binary".to_string(),
            timeout_secs: 1,
        };
        assert!(!is_ngspice_available(&config));
        let err = run_ngspice("t\nR1 1 0 1k\n.op\n", &config).unwrap_err();
        match err {
            Error::EngineUnavailable { executable, .. } => {
                assert_eq!(executable, "/nonexistent/ngspice-binary")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_terminated() {
        assert!(matches!(terminated("t\nR1 1 0 1k\n.END\n\n"), Cow::Borrowed(_)));
        assert_eq!(terminated("t\nR1 1 0 1k\n"), "t\nR1 1 0 1k\n.end\n");
        // `.end` inside another card does not count
        assert_eq!(terminated("t\n.endc\n"), "t\n.endc\n.end\n");
    }

    #[test]
    fn test_log_tail() {
        let log: String = (0..30).map(|i| format!("line {}\n\n", i)).collect();
        let tail = log_tail(&log);
        assert_eq!(tail.lines().count(), LOG_TAIL_LINES);
        assert!(tail.starts_with("line 10"));
        assert!(tail.ends_with("line 29"));
    }

    #[test]
    fn test_section() {
        assert_eq!(section("log", "  \n"), "");
        assert_eq!(section("stderr", "bad model\n"), "\nstderr:\nbad model");
    }

    #[test]
    #[ignore = "requires ngspice"]
    fn test_rc_transient() {
        let config = NgspiceConfig::default();
        if !is_ngspice_available(&config) {
            return;
        }
        let netlist = "RC\nV1 in 0 SIN(0 1 1k)\nR1 in out 1k\nC1 out 0 1u\n.tran 10u 2m\n";
        let data = run_ngspice(netlist, &config).unwrap();
        assert!(data.len() > 10);
        assert!(data.variable("v(out)").is_some());
    }
}

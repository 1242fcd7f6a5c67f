use camino::Utf8PathBuf;
use clap::ValueEnum;
use std::io::{self, Write};
use tracing::{debug, info};
use wsconform_core::config::Config;
use wsconform_core::error::Result;
use wsconform_core::registry::KnownFailures;
use wsconform_core::report::Report;
use wsconform_core::verdict::{Mode, Verdict, evaluate};

const RED: &str = "\x1b[0;31m";
const GREEN: &str = "\x1b[0;32m";
const NC: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Everything one invocation needs, resolved from CLI and config
#[derive(Debug, Clone)]
pub struct Run {
    pub mode: Mode,
    pub report_path: Utf8PathBuf,
    pub agent: String,
    pub known: KnownFailures,
}

/// Command-line values that win over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<Mode>,
    pub report_path: Option<Utf8PathBuf>,
    pub agent: Option<String>,
}

impl Run {
    pub fn resolve(config: Config, overrides: Overrides) -> Self {
        let mode = overrides.mode.unwrap_or(config.report.mode);
        Self {
            mode,
            report_path: overrides
                .report_path
                .unwrap_or_else(|| config.report.path_for(mode).to_owned()),
            agent: overrides.agent.unwrap_or(config.report.agent),
            known: config.known_failures.registry(),
        }
    }
}

/// Check the report and print the verdict.
///
/// Returns whether the run passed. Config and loader failures and unexpected
/// test failures go to `err`; the progress and verdict lines go to `out`.
/// Exactly one verdict line is written whatever happens.
pub fn run<O: Write, E: Write>(
    run: Result<Run>,
    out: &mut O,
    err: &mut E,
    color: bool,
) -> io::Result<bool> {
    writeln!(out, "[+] Checking output...")?;
    write!(out, "Autobahn|Testsuite tests... ")?;
    out.flush()?;

    let passed = match check(run) {
        Ok(verdict) => {
            for id in &verdict.unexpected {
                writeln!(err, "Test {} was not expected to fail!", id)?;
            }
            log_summary(&verdict);
            verdict.passed()
        }
        Err(e) => {
            debug!("Report check aborted: {}", e);
            writeln!(err, "{}", e)?;
            false
        }
    };
    err.flush()?;

    writeln!(out, "[{}]", verdict_label(passed, color))?;
    out.flush()?;
    Ok(passed)
}

fn check(run: Result<Run>) -> Result<Verdict> {
    let run = run?;
    debug!("Mode: {}", run.mode);
    debug!("Report: {}", run.report_path);
    debug!("Agent: {}", run.agent);

    let report = Report::load(&run.report_path, &run.agent)?;
    Ok(evaluate(&report, run.mode, &run.known))
}

fn log_summary(verdict: &Verdict) {
    info!(
        "Checked {} test cases in {} mode: {} tolerated, {} unexpected",
        verdict.examined,
        verdict.mode,
        verdict.tolerated.len(),
        verdict.unexpected.len()
    );
    if !verdict.tolerated.is_empty() {
        debug!("Tolerated failures: {}", verdict.tolerated.join(", "));
    }
}

fn verdict_label(passed: bool, color: bool) -> String {
    let (text, paint) = if passed {
        ("PASSED", GREEN)
    } else {
        ("NOT PASSED", RED)
    };

    if color {
        format!("{}{}{}", paint, text, NC)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wsconform_core::test_utils::report_json;

    struct Output {
        passed: bool,
        stdout: String,
        stderr: String,
    }

    fn run_with(mode: Mode, report_path: Utf8PathBuf, color: bool) -> Output {
        let run_cfg = Run {
            mode,
            report_path,
            agent: "wsServer".to_string(),
            known: KnownFailures::builtin(),
        };
        run_resolved(Ok(run_cfg), color)
    }

    fn run_resolved(run_cfg: Result<Run>, color: bool) -> Output {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let passed = run(run_cfg, &mut out, &mut err, color).unwrap();

        Output {
            passed,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
        }
    }

    fn write_report(dir: &TempDir, body: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("index.json")).unwrap();
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_pass_with_known_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_report(
            &dir,
            &report_json("wsServer", &[("6.3.1", "FAILED"), ("1.1.1", "OK")]),
        );

        let output = run_with(Mode::Partial, path, false);
        assert!(output.passed);
        assert_eq!(
            output.stdout,
            "[+] Checking output...\nAutobahn|Testsuite tests... [PASSED]\n"
        );
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_unexpected_failure_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_report(
            &dir,
            &report_json("wsServer", &[("9.9.9", "FAILED"), ("2.2", "FAILED")]),
        );

        let output = run_with(Mode::Partial, path, false);
        assert!(!output.passed);
        assert!(output.stdout.ends_with("[NOT PASSED]\n"));
        assert_eq!(
            output.stderr,
            "Test 2.2 was not expected to fail!\nTest 9.9.9 was not expected to fail!\n"
        );
    }

    #[test]
    fn test_strict_rejects_known_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_report(&dir, &report_json("wsServer", &[("6.3.1", "FAILED")]));

        let output = run_with(Mode::Strict, path, false);
        assert!(!output.passed);
        assert_eq!(output.stderr, "Test 6.3.1 was not expected to fail!\n");
    }

    #[test]
    fn test_missing_report() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("index.json")).unwrap();

        let output = run_with(Mode::Partial, path.clone(), false);
        assert!(!output.passed);
        assert!(!output.stdout.contains("[PASSED]"));
        assert!(output.stdout.ends_with("[NOT PASSED]\n"));
        assert_eq!(output.stderr, format!("{} does not exist!\n", path));
    }

    #[test]
    fn test_unreadable_report() {
        let dir = TempDir::new().unwrap();
        let path = write_report(&dir, "{\"AutobahnPython\": {}}");

        let output = run_with(Mode::Partial, path.clone(), false);
        assert!(!output.passed);
        assert!(output.stdout.ends_with("[NOT PASSED]\n"));
        assert!(output.stderr.starts_with(&format!("Cannot read {}!", path)));
    }

    #[test]
    fn test_verdict_colors() {
        let dir = TempDir::new().unwrap();
        let path = write_report(&dir, &report_json("wsServer", &[("1.1.1", "OK")]));

        let output = run_with(Mode::Strict, path, true);
        assert!(output.stdout.ends_with("[\x1b[0;32mPASSED\x1b[0m]\n"));

        assert_eq!(verdict_label(false, true), "\x1b[0;31mNOT PASSED\x1b[0m");
        assert_eq!(verdict_label(false, false), "NOT PASSED");
    }

    #[test]
    fn test_broken_config_still_prints_verdict() {
        let dir = TempDir::new().unwrap();
        let path = write_report(&dir, &report_json("wsServer", &[("1.1.1", "OK")]));

        let resolved = Config::from_toml_str("[report]\nmode = \"lenient\"\n").map(|config| {
            Run::resolve(
                config,
                Overrides {
                    report_path: Some(path),
                    ..Overrides::default()
                },
            )
        });

        let output = run_resolved(resolved, false);
        assert!(!output.passed);
        assert_eq!(
            output.stdout,
            "[+] Checking output...\nAutobahn|Testsuite tests... [NOT PASSED]\n"
        );
        assert!(
            output.stderr.starts_with("Configuration error: Failed to parse config"),
            "{}",
            output.stderr
        );
    }

    #[test]
    fn test_resolve_uses_config_without_overrides() {
        let config = Config::from_toml_str(
            "[report]\nmode = \"strict\"\nagent = \"myserver\"\nstrict_path = \"out/index.json\"\n",
        )
        .unwrap();

        let resolved = Run::resolve(config, Overrides::default());
        assert_eq!(resolved.mode, Mode::Strict);
        assert_eq!(resolved.agent, "myserver");
        assert_eq!(resolved.report_path.as_str(), "out/index.json");
    }

    #[test]
    fn test_partial_override_beats_strict_config() {
        let config = Config::from_toml_str("[report]\nmode = \"strict\"\n").unwrap();

        let resolved = Run::resolve(
            config,
            Overrides {
                mode: Some(Mode::Partial),
                ..Overrides::default()
            },
        );
        assert_eq!(resolved.mode, Mode::Partial);
        assert_eq!(resolved.report_path.as_str(), "wsserver_autobahn/index.json");
    }

    #[test]
    fn test_cli_report_and_agent_override_config() {
        let resolved = Run::resolve(
            Config::default(),
            Overrides {
                mode: Some(Mode::Strict),
                report_path: Some(Utf8PathBuf::from("elsewhere.json")),
                agent: Some("other".to_string()),
            },
        );
        assert_eq!(resolved.mode, Mode::Strict);
        assert_eq!(resolved.report_path.as_str(), "elsewhere.json");
        assert_eq!(resolved.agent, "other");
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}

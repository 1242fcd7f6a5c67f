//! Verdict evaluation over a loaded report
//!
//! The evaluator is a pure function of (report, mode, registry). Every test
//! case is visited; a single unexpected failure does not stop the walk so
//! that one run reports all of them.
use crate::registry::KnownFailures;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which failures a run tolerates
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Failures listed in the known-failure registry are accepted
    #[default]
    Partial,
    /// Any failure fails the run
    Strict,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Partial => write!(f, "partial"),
            Mode::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub mode: Mode,
    /// Number of test cases visited
    pub examined: usize,
    /// Failed cases not covered by the registry, in id order
    pub unexpected: Vec<String>,
    /// Failed cases the registry accepted, in id order
    pub tolerated: Vec<String>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.unexpected.is_empty()
    }
}

/// Walk `report` and classify every `FAILED` case.
///
/// In strict mode `known` is never consulted.
pub fn evaluate(report: &Report, mode: Mode, known: &KnownFailures) -> Verdict {
    let mut verdict = Verdict {
        mode,
        examined: 0,
        unexpected: Vec::new(),
        tolerated: Vec::new(),
    };

    for (id, outcome) in report.iter() {
        verdict.examined += 1;

        if !outcome.behavior.is_failure() {
            continue;
        }

        let tolerated = match mode {
            Mode::Strict => false,
            Mode::Partial => known.contains(id),
        };

        if tolerated {
            verdict.tolerated.push(id.to_owned());
        } else {
            verdict.unexpected.push(id.to_owned());
        }
    }

    verdict
}

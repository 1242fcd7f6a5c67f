//! Autobahn|Testsuite report loading
//!
//! The fuzzing server writes an `index.json` keyed first by agent (the
//! implementation under test) and then by dotted test case id:
//!
//! ```json
//! { "wsServer": { "1.1.1": { "behavior": "OK", "duration": 2 }, ... } }
//! ```
//!
//! Only the configured agent's sub-object is parsed; everything else in the
//! file is ignored.
use crate::error::{ConformError, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use thiserror::Error;
use tracing::debug;

/// Agent name wsServer registers with the fuzzing client
pub const DEFAULT_AGENT: &str = "wsServer";

/// Outcome string of a single test case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Behavior {
    Ok,
    NonStrict,
    Informational,
    Unimplemented,
    Unclean,
    WrongCode,
    Failed,
    Other(String),
}

impl Behavior {
    /// Only `FAILED` counts against a run. Every other outcome, including
    /// `UNCLEAN` and `WRONG CODE`, is treated as passing.
    pub fn is_failure(&self) -> bool {
        matches!(self, Behavior::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Behavior::Ok => "OK",
            Behavior::NonStrict => "NON-STRICT",
            Behavior::Informational => "INFORMATIONAL",
            Behavior::Unimplemented => "UNIMPLEMENTED",
            Behavior::Unclean => "UNCLEAN",
            Behavior::WrongCode => "WRONG CODE",
            Behavior::Failed => "FAILED",
            Behavior::Other(s) => s,
        }
    }
}

impl From<String> for Behavior {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => Behavior::Ok,
            "NON-STRICT" => Behavior::NonStrict,
            "INFORMATIONAL" => Behavior::Informational,
            "UNIMPLEMENTED" => Behavior::Unimplemented,
            "UNCLEAN" => Behavior::Unclean,
            "WRONG CODE" => Behavior::WrongCode,
            "FAILED" => Behavior::Failed,
            _ => Behavior::Other(s),
        }
    }
}

impl From<&str> for Behavior {
    fn from(s: &str) -> Self {
        Behavior::from(s.to_owned())
    }
}

impl From<Behavior> for String {
    fn from(b: Behavior) -> Self {
        match b {
            Behavior::Other(s) => s,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-case record. Fields other than `behavior` (duration, reportfile,
/// behaviorClose, ...) are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub behavior: Behavior,
}

/// Why a report body could not be turned into a [`Report`]
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,

    #[error("agent \"{0}\" not present in report")]
    MissingAgent(String),

    #[error("malformed test records for agent \"{agent}\": {source}")]
    Records {
        agent: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcomes of one agent, keyed by test case id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    agent: String,
    cases: BTreeMap<String, Outcome>,
}

impl Report {
    pub fn from_cases<I, K, B>(agent: impl Into<String>, cases: I) -> Self
    where
        I: IntoIterator<Item = (K, B)>,
        K: Into<String>,
        B: Into<Behavior>,
    {
        Self {
            agent: agent.into(),
            cases: cases
                .into_iter()
                .map(|(id, behavior)| {
                    (
                        id.into(),
                        Outcome {
                            behavior: behavior.into(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Read and parse the report at `path`.
    ///
    /// Anything that is not a regular file is reported as missing. The file
    /// is read in one go and the handle released before parsing starts.
    pub fn load<P: AsRef<Utf8Path>>(path: P, agent: &str) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            debug!("Report not found: {}", path);
            return Err(ConformError::ReportMissing(path.to_owned()));
        }

        let content =
            fs::read_to_string(path).map_err(|e| ConformError::unreadable(path, e))?;

        let report =
            Self::from_json_str(&content, agent).map_err(|e| ConformError::unreadable(path, e))?;

        debug!(
            "Loaded {} test cases for agent {} from {}",
            report.len(),
            agent,
            path
        );
        Ok(report)
    }

    /// Parse a report body, keeping only `agent`'s test cases
    pub fn from_json_str(text: &str, agent: &str) -> std::result::Result<Self, ShapeError> {
        let root: Value = serde_json::from_str(text).map_err(ShapeError::Syntax)?;

        let Value::Object(mut agents) = root else {
            return Err(ShapeError::NotAnObject);
        };

        let records = agents
            .remove(agent)
            .ok_or_else(|| ShapeError::MissingAgent(agent.to_owned()))?;

        let cases: BTreeMap<String, Outcome> =
            serde_json::from_value(records).map_err(|source| ShapeError::Records {
                agent: agent.to_owned(),
                source,
            })?;

        Ok(Self {
            agent: agent.to_owned(),
            cases,
        })
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn get(&self, id: &str) -> Option<&Outcome> {
        self.cases.get(id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Test cases in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.cases.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    /// Ids of every case whose behavior is `FAILED`
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, outcome)| outcome.behavior.is_failure())
            .map(|(id, _)| id)
    }
}

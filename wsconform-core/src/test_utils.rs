//! Shared test utilities for the wsconform workspace
//!
//! Builders for in-memory reports and report file bodies. Only available
//! when the "test-utils" feature is enabled.

use crate::report::{DEFAULT_AGENT, Report};
use serde_json::{Map, Value, json};

/// Build a report for the default agent from `(id, behavior)` pairs
///
/// # Examples
///
/// ```
/// # use wsconform_core::test_utils::create_test_report;
/// let report = create_test_report(&[("1.1.1", "OK"), ("6.3.1", "FAILED")]);
/// assert_eq!(report.len(), 2);
/// assert_eq!(report.failed().collect::<Vec<_>>(), vec!["6.3.1"]);
/// ```
pub fn create_test_report(cases: &[(&str, &str)]) -> Report {
    Report::from_cases(DEFAULT_AGENT, cases.iter().copied())
}

/// Serialize `(id, behavior)` pairs the way the fuzzing server lays out
/// `index.json`, including a few of the fields the loader ignores
///
/// # Examples
///
/// ```
/// # use wsconform_core::test_utils::report_json;
/// let body = report_json("wsServer", &[("1.1.1", "OK")]);
/// assert!(body.contains("\"wsServer\""));
/// assert!(body.contains("\"behavior\":\"OK\""));
/// ```
pub fn report_json(agent: &str, cases: &[(&str, &str)]) -> String {
    let mut records = Map::new();
    for (id, behavior) in cases {
        records.insert(
            (*id).to_string(),
            json!({
                "behavior": behavior,
                "behaviorClose": "OK",
                "duration": 1,
                "remoteCloseCode": 1000,
                "reportfile": format!("{}_case_{}.json", agent.to_lowercase(), id.replace('.', "_")),
            }),
        );
    }

    let mut root = Map::new();
    root.insert(agent.to_string(), Value::Object(records));
    Value::Object(root).to_string()
}

/// The known-failure ids plus one case from most other sections, all `OK`
pub fn all_ok_cases() -> Vec<(String, &'static str)> {
    crate::registry::WSSERVER_KNOWN_FAILURES
        .iter()
        .map(|id| ((*id).to_string(), "OK"))
        .chain(
            ["1.1.1", "1.2.8", "2.1", "3.7", "4.2.5", "5.20", "7.1.6", "9.8.6", "10.1.1"]
                .into_iter()
                .map(|id| (id.to_string(), "OK")),
        )
        .collect()
}

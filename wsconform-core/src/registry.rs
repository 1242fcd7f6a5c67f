//! Test cases that are allowed to fail in partial-conformance runs
//!
//! wsServer does not validate UTF-8 in text frames or close reasons, so every
//! Autobahn case that sends an invalid sequence and expects the connection to
//! be failed (sections 6.3 through 6.21 and 7.5.1) ends up `FAILED`. That is
//! 76 of the 298 cases; everything else is expected to pass.
use std::collections::BTreeSet;

/// Cases wsServer is known to fail because it skips UTF-8 validation
#[rustfmt::skip]
pub const WSSERVER_KNOWN_FAILURES: &[&str] = &[
    "6.3.1", "6.3.2",
    "6.4.1", "6.4.2", "6.4.3", "6.4.4",
    "6.6.1", "6.6.3", "6.6.4", "6.6.6", "6.6.8", "6.6.10",
    "6.8.1", "6.8.2",
    "6.10.1", "6.10.2", "6.10.3",
    "6.11.5",
    "6.12.1", "6.12.2", "6.12.3", "6.12.4", "6.12.5", "6.12.6", "6.12.7", "6.12.8",
    "6.13.1", "6.13.2", "6.13.3", "6.13.4", "6.13.5",
    "6.14.1", "6.14.2", "6.14.3", "6.14.4", "6.14.5",
    "6.14.6", "6.14.7", "6.14.8", "6.14.9", "6.14.10",
    "6.15.1",
    "6.16.1", "6.16.2", "6.16.3",
    "6.17.1", "6.17.2", "6.17.3", "6.17.4", "6.17.5",
    "6.18.1", "6.18.2", "6.18.3", "6.18.4", "6.18.5",
    "6.19.1", "6.19.2", "6.19.3", "6.19.4", "6.19.5",
    "6.20.1", "6.20.2", "6.20.3", "6.20.4", "6.20.5", "6.20.6", "6.20.7",
    "6.21.1", "6.21.2", "6.21.3", "6.21.4", "6.21.5", "6.21.6", "6.21.7", "6.21.8",
    "7.5.1",
];

/// Set of test case ids whose failure is accepted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownFailures {
    cases: BTreeSet<String>,
}

impl KnownFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in wsServer registry
    pub fn builtin() -> Self {
        WSSERVER_KNOWN_FAILURES.iter().copied().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cases.contains(id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KnownFailures {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for KnownFailures {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.cases.extend(iter.into_iter().map(Into::into));
    }
}

#![allow(clippy::cargo_common_metadata)]

pub mod config;
pub mod error;
pub mod registry;
pub mod report;
pub mod verdict;

#[cfg(feature = "test-utils")]
pub mod test_utils;

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConformError {
    #[error("{0} does not exist!")]
    ReportMissing(Utf8PathBuf),

    #[error("Cannot read {path}! ({reason})")]
    ReportUnreadable { path: Utf8PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConformError {
    pub(crate) fn unreadable(path: impl Into<Utf8PathBuf>, reason: impl ToString) -> Self {
        Self::ReportUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConformError>;

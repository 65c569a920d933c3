use std::path::PathBuf;

use thiserror::Error;

use crate::accounts::AccountType;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{context}, because: {source}")]
    Context {
        context: String,
        source: Box<LedgerError>,
    },

    #[error("no rules matched for account: {0}")]
    NoRulesMatched(String),

    #[error("invalid rule structure detected at: {0}")]
    InvalidRuleStructure(String),

    #[error("no parser implementation found for account type: {account_type}, for directory: {account}")]
    NoParser {
        account_type: AccountType,
        account: String,
    },

    #[error("invalid auto-enhance rule at index {index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    #[error("failed to parse amount input: {0}")]
    InvalidAmount(String),

    #[error("converted statement is empty: {}", .0.display())]
    EmptyConvertedStatement(PathBuf),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Annotates an error with the file, directory or step it came from.
pub trait ResultExt<T> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LedgerError>,
{
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| LedgerError::Context {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}

impl LedgerError {
    /// The innermost error once every layer of context is peeled off.
    pub fn root(&self) -> &LedgerError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chains_messages() {
        let inner: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = inner
            .with_context(|| "failed to read csv file: a.csv")
            .with_context(|| "failed to convert account: ICICI")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to convert account: ICICI, because: failed to read csv file: a.csv, because: IO error: gone"
        );
        assert!(matches!(err.root(), LedgerError::Io(_)));
    }
}

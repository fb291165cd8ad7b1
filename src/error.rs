//! Error types for testwright

use std::process::ExitCode;

use thiserror::Error;

/// Errors surfaced by the analysis core and the CLI
#[derive(Debug, Error)]
pub enum TestwrightError {
    /// Source text that tree-sitter could not parse cleanly
    #[error("malformed source: {message}")]
    MalformedSource {
        message: String,
        /// 1-based line of the first parse error, when one could be located
        line: Option<usize>,
    },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    SourceTooLarge {
        path: String,
        size: usize,
        limit: usize,
    },

    /// The Python grammar could not be loaded into the parser
    #[error("language setup failed: {message}")]
    LanguageSetup { message: String },

    #[error("serialization failed: {message}")]
    Serialization { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TestwrightError {
    /// Line number of a malformed-source error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedSource { line, .. } => *line,
            _ => None,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::MalformedSource { .. } => ExitCode::from(2),
            Self::FileNotFound { .. } | Self::SourceTooLarge { .. } => ExitCode::from(3),
            Self::LanguageSetup { .. } | Self::Serialization { .. } | Self::Io(_) => {
                ExitCode::from(1)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TestwrightError>;

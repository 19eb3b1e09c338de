use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("one or both image paths are missing")]
    InputMissing,

    #[error("failed to stage {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not in the upload history", .path.display())]
    NotInHistory { path: PathBuf },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("comparator exited with {}", describe_code(.code))]
    NonZeroExit { code: Option<i32>, output: String },

    #[error("comparator did not finish within {secs}s and was killed")]
    Timeout { secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Unknown(String),
}

/// Coarse classification of [`Error`] as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InputMissing,
    Staging,
    Invocation,
    Unknown,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InputMissing | Error::NotInHistory { .. } => ErrorCategory::InputMissing,
            Error::Staging { .. } => ErrorCategory::Staging,
            Error::Spawn { .. } | Error::NonZeroExit { .. } | Error::Timeout { .. } => {
                ErrorCategory::Invocation
            }
            Error::Io(_) | Error::Config(_) | Error::Unknown(_) => ErrorCategory::Unknown,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

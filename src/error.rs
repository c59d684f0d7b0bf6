use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error {0}")]
    IOError(#[from] io::Error),
    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("invalid max level {0}, expected 1..={limit}", limit = crate::MAX_LEVEL_LIMIT)]
    InvalidMaxLevel(usize),
    #[error("invalid level probability {0}, expected a value in (0, 1)")]
    InvalidProbability(f64),
}

impl Error {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }
}

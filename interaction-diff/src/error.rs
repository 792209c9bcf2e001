use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} doesn't contain any recorded interactions", path.display())]
    InvalidMarkdownFormat { path: PathBuf },
    #[error("The status code `{0}` is invalid")]
    InvalidStatusCode(String),
    #[error("Unknown abstraction set `{0}`")]
    UnknownAbstractions(String),
    #[error("Invalid abstraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Invalid abstraction rules file {}: {source}", path.display())]
    InvalidRulesFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Couldn't serialize the report: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Couldn't write the report: {0}")]
    OutputError(#[from] io::Error),
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::IoError { path, source }
    }
}

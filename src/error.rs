use std::path::PathBuf;

use thiserror::Error;

use crate::{driver::snippets::SnippetError, factorial::FactorialError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no lexer found for language {0:?}")]
    UnknownLanguage(String),
    #[error("cannot guess the language of {0:?}")]
    UndetectedLanguage(PathBuf),
    #[error("style {0:?} not found")]
    StyleNotFound(String),
    #[error("style {style:?} inherits from itself")]
    StyleCycle { style: String },
    #[error("invalid rule {rule:?} in style {style:?}: {reason}")]
    InvalidStyleRule {
        style: String,
        rule: String,
        reason: String,
    },
    #[error("unknown token type {0:?}")]
    UnknownTokenType(String),
    #[error("invalid value {value:?} for option {key:?}")]
    InvalidOption { key: String, value: String },
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),
    #[error("{path:?} is not valid {encoding}")]
    Decode { path: PathBuf, encoding: String },
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no command to wrap")]
    NothingToWrap,
    #[error(transparent)]
    Snippet(#[from] SnippetError),
    #[error(transparent)]
    Factorial(#[from] FactorialError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

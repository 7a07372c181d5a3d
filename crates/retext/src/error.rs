use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to back up {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid pattern in transformation `{name}`: {source}")]
    InvalidPattern { name: String, source: regex::Error },

    #[error("invalid recipe: {message}")]
    InvalidRecipe { message: String },

    #[error("failed to parse recipe: {0}")]
    RecipeParse(#[from] toml::de::Error),

    #[error("unknown recipe `{0}`")]
    UnknownRecipe(String),

    /// Only raised in strict mode; lenient runs record the miss in the report.
    #[error("transformation `{name}` found no match in {}", path.display())]
    NoMatch { path: PathBuf, name: String },
}

pub type Result<T> = std::result::Result<T, RewriteError>;

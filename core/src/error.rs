use std::path::PathBuf;

use thiserror::Error;

pub type TokenResult<T> = Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token directory not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to walk token directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed token file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("token file {} must contain a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },

    #[error("merged token tree is not a valid token document: {0}")]
    InvalidTree(#[source] serde_json::Error),

    /// A reference chain that revisits one of its own paths.
    #[error("cyclic reference: {chain}")]
    CyclicReference { chain: String },

    #[error("invalid color format '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColorFormat(String),

    #[error("token '{path}' has non-numeric dimension value '{value}'")]
    InvalidDimension { path: String, value: String },

    /// Two token paths land on the same spot of one set once the set's
    /// namespace prefix is dropped.
    #[error("tokens '{first}' and '{second}' both export as '{path}' in the {set} set")]
    DuplicatePath {
        set: &'static str,
        path: String,
        first: String,
        second: String,
    },
}

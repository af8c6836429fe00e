use crate::codec::SchemaError;
use crate::names::NameError;
use crate::shadow::ShadowError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The filesystem operation that failed, kept apart from the `io::Error` so a
/// report can say "could not remove" rather than just "permission denied".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
    Create,
    Remove,
    List,
    Copy,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Create => "create",
            IoOp::Remove => "remove",
            IoOp::List => "list",
            IoOp::Copy => "copy",
        };
        f.write_str(verb)
    }
}

#[derive(Error, Debug)]
pub enum NutrackError {
    #[error("Cannot {op} {}: {source}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shadow file error: {0}")]
    Shadow(#[from] ShadowError),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Corrupted file: {}", .0.display())]
    Corrupted(PathBuf),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: NameError },

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] SchemaError),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("User already registered: {0}")]
    UserExists(String),

    #[error("User not registered: {0}")]
    UserNotFound(String),

    #[error("Food already registered: {0}")]
    FoodExists(String),

    #[error("Food not registered: {0}")]
    FoodNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NutrackError {
    /// Adapter for `map_err` that tags an `io::Error` with the operation and path.
    pub fn io(op: IoOp, path: &Path) -> impl FnOnce(std::io::Error) -> NutrackError + '_ {
        move |source| NutrackError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NutrackError>;

// ⚠️ Error Taxonomy
// Validation failures are recoverable and shown to the user; everything else
// aborts the current operation and leaves persisted state untouched.

use std::path::{Path, PathBuf};

pub type CommitteeResult<T> = Result<T, CommitteeError>;

/// Stand-in path for I/O failures on a CSV reader or writer with no file name
pub const CSV_STREAM: &str = "<csv stream>";

/// The only validation the record builder performs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A form row has a position but no member name (row is 1-based)
    #[error("member name cannot be empty (row {row} has a position but no name)")]
    IncompleteMember { row: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum CommitteeError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("roster file {} is not valid: {source}", path.display())]
    RosterFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("csv error: {0}")]
    Csv(csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("render error: {0}")]
    Render(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CommitteeError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attribute csv stream failures to `path`; malformed data stays `Csv`
    pub fn csv_at(path: impl AsRef<Path>, err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Self::Csv(err);
        }
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(path, source),
            other => Self::Render(format!("csv: {:?}", other)),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for user-correctable input problems (as opposed to I/O or render failures)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<csv::Error> for CommitteeError {
    fn from(err: csv::Error) -> Self {
        Self::csv_at(CSV_STREAM, err)
    }
}

impl From<lopdf::Error> for CommitteeError {
    fn from(err: lopdf::Error) -> Self {
        Self::Render(err.to_string())
    }
}

use thiserror::Error;

/// Failure of a single tree round trip. Carries the collection path so callers
/// can log where it happened; the transport error stays attached as the source.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("failed to read `{path}`")]
    Fetch {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write `{path}`")]
    Write {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to decode `{path}`: {reason}")]
    Decode { path: String, reason: String },
    #[error("invalid key `{0}`")]
    InvalidKey(String),
}

impl DataAccessError {
    pub fn fetch(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Fetch { path, .. } | Self::Write { path, .. } | Self::Decode { path, .. } => {
                Some(path)
            }
            Self::InvalidKey(_) => None,
        }
    }
}

pub type DataAccessResult<T> = std::result::Result<T, DataAccessError>;

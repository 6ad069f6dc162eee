use thiserror::Error;

/// Failure of a remote capability (vote persistence or stats fetch).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("resident {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("resident {0} is not in the local resident set")]
    UnknownResident(String),
    #[error("a vote update for resident {0} is already in flight")]
    InFlight(String),
    #[error("failed to persist vote for resident {resident_id}: {source}")]
    Persist {
        resident_id: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

use thiserror::Error;

/// Invalid session setup. Raised before any timer state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Total time must be at least 1 minute.")]
    TotalTooShort,
    #[error("Study session must be at least 1 minute.")]
    StudyTooShort,
    #[error("Study session cannot exceed total time.")]
    StudyExceedsTotal,
    #[error("Topic is mandatory.")]
    MissingTopic,
    #[error("Study mode is mandatory.")]
    MissingMode,
    #[error("Topic '{0}' is not an active topic.")]
    InactiveTopic(String),
    #[error("Study mode '{0}' is not an active mode.")]
    InactiveMode(String),
}

/// Invalid analytics date range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("End date must be after start date.")]
    EndBeforeStart,
    #[error("Date range cannot exceed 31 days (got {days}).")]
    TooLong { days: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("a study session is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MasterError {
    #[error("Name cannot be empty.")]
    EmptyName,
    #[error("'{0}' already exists.")]
    Duplicate(String),
    #[error("No entry named '{0}'.")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare storage directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt {column} value '{value}'")]
    Corrupt { column: &'static str, value: String },
}

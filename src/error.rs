use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx response, message already extracted from the body
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body could not be decoded
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    #[error("another schedule action is still running")]
    Busy,

    #[error("response discarded, a newer request replaced it")]
    Superseded,

    #[error("nothing to save, generate a preview first")]
    NoPreview,

    #[error("reset needs explicit confirmation")]
    ConfirmationRequired,

    #[error("no month loaded")]
    NotLoaded,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

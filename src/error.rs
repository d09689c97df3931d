use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Terminal or log file I/O failed
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("logger setup failed: {0}")]
    Logger(String),

    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

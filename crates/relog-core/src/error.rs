use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open log source {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read log stream: {0}")]
    Read(std::io::Error),

    #[error("Failed to decode log line {line}: {source}")]
    Decode {
        /// 1-based index of the offending input line.
        line: usize,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

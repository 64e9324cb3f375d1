use thiserror::Error;

#[derive(Error, Debug)]
pub enum DedupError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot open '{path}'")]
    UnreadableFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{source_name} source has no '{role}' column")]
    MissingColumnError { source_name: String, role: String },
}

impl DedupError {
    pub fn unreadable(path: impl Into<String>, source: std::io::Error) -> Self {
        DedupError::UnreadableFile {
            path: path.into(),
            source,
        }
    }

    /// 是否為使用者可修正的設定問題
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DedupError::ConfigParseError { .. }
                | DedupError::InvalidConfigValueError { .. }
                | DedupError::MissingColumnError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DedupError>;

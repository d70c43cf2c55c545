use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        file: Option<PathBuf>,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid rule pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown mode `{0}` (expected `development` or `production`)")]
    InvalidMode(String),

    #[error("{0}")]
    Other(String),
}

impl BuildError {
    /// Create a configuration error pointing at the offending file
    pub fn config_in(message: impl Into<String>, file: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            file: Some(file),
        }
    }

    pub fn pattern(pattern: &str, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    /// Format error with the file it came from, when known
    pub fn format_detailed(&self) -> String {
        match self {
            BuildError::Config {
                message,
                file: Some(file),
            } => format!("❌ Configuration Error: {}\n📁 File: {}", message, file.display()),
            _ => format!("❌ {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_with_file() {
        let err = BuildError::config_in("bad json", PathBuf::from("/p/scrumpy.config.json"));
        let detailed = err.format_detailed();
        assert!(detailed.contains("bad json"));
        assert!(detailed.contains("/p/scrumpy.config.json"));
    }

    #[test]
    fn test_invalid_mode_message() {
        let err = BuildError::InvalidMode("staging".to_string());
        assert!(err.to_string().contains("staging"));
    }
}

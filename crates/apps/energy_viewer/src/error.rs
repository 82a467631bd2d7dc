use std::path::PathBuf;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Stdin(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "{err}"),
            AppError::Io { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            AppError::Stdin(err) => write!(f, "failed to read stdin: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Io { source, .. } => Some(source),
            AppError::Stdin(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::EnvironmentProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
    /// JSON when stdout is not a terminal
    Auto,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// `LOG_LEVEL` (filter directive), `LOG_FORMAT` (text|json|auto), `APP_LOG_FILE`
    pub fn load(env: &dyn EnvironmentProvider) -> Self {
        let format = match env.get_var("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("auto") => LogFormat::Auto,
            _ => LogFormat::Text,
        };
        Self {
            level: env.get_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
            file: env.get_var("APP_LOG_FILE").filter(|p| !p.is_empty()).map(PathBuf::from),
        }
    }

    fn json(&self) -> bool {
        match self.format {
            LogFormat::Json => true,
            LogFormat::Text => false,
            LogFormat::Auto => !std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid LOG_LEVEL '{level}': {reason}")]
    Level { level: String, reason: String },

    #[error("log file path '{0}' has no file name")]
    FilePath(PathBuf),

    #[error("could not create log directory: {0}")]
    Directory(#[from] std::io::Error),

    #[error("a global subscriber is already installed: {0}")]
    Install(String),
}

/// Install the console layer plus a daily-rolling file layer when configured
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = || {
        EnvFilter::try_new(&config.level).map_err(|e| LoggingError::Level {
            level: config.level.clone(),
            reason: e.to_string(),
        })
    };

    let console = if config.json() {
        fmt::layer().json().flatten_event(true).with_filter(filter()?).boxed()
    } else {
        fmt::layer().with_target(true).with_filter(filter()?).boxed()
    };

    let (file, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().ok_or_else(|| LoggingError::FilePath(path.clone()))?;
            std::fs::create_dir_all(directory)?;

            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter()?)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::load(&MockEnvironment::empty());
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Text);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_overrides() {
        let env = MockEnvironment::empty().with_vars(&[
            ("LOG_LEVEL", "aims_backend=debug"),
            ("LOG_FORMAT", "json"),
            ("APP_LOG_FILE", "logs/aims.log"),
        ]);
        let config = LoggingConfig::load(&env);
        assert_eq!(config.level, "aims_backend=debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("logs/aims.log")));
    }

    #[test]
    fn test_bad_level_is_reported() {
        let config = LoggingConfig {
            level: "=[".to_string(),
            format: LogFormat::Text,
            file: None,
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::Level { .. })));
    }
}

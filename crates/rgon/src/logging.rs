use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;

/// Diagnostics flags. Logs go to stderr; stdout carries nothing but replies.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Log output format (stderr).
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        env = "RGON_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    pub format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        env = "RGON_LOG_LEVEL",
        default_value = "warn",
        global = true
    )]
    pub level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl LogArgs {
    /// Install the global subscriber. With `--log-level off` none is
    /// installed and every event is discarded at the call site.
    pub fn install(&self) {
        if self.level == LogLevel::Off {
            return;
        }

        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(LevelFilter::from(self.level))
            .with_ansi(false)
            .with_target(false);

        // A second install (tests, embedding) keeps the first subscriber.
        let _ = match self.format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
    }
}

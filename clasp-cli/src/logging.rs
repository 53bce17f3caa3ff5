//! Structured logging for the clasp binary.
//!
//! Diagnostics always go to `stderr`; the main output stream stays reserved
//! for results so it can be piped into other tools.

use std::{env, io, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "CLASP_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Rendering used for diagnostics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Plain text lines.
    #[default]
    Human,
    /// One JSON object per event, including the span stack.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnsupportedFormat {
                provided: normalised,
            }),
        }
    }
}

impl LogFormat {
    /// Reads the format from [`LOG_FORMAT_ENV`], defaulting to [`LogFormat::Human`].
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the variable is not Unicode or names an
    /// unknown format.
    pub fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable held invalid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the variable.
        name: &'static str,
        /// Underlying failure.
        #[source]
        source: env::VarError,
    },
    /// The format variable named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// The normalised value.
        provided: String,
    },
    /// Another subscriber already owns the global slot.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber once per process.
///
/// `RUST_LOG` controls filtering and defaults to `info`. A subscriber set up
/// by someone else is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when [`LOG_FORMAT_ENV`] is invalid.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let format = LogFormat::from_env()?;
    match install(format) {
        Ok(()) | Err(LoggingError::InstallFailed { .. }) => {}
        Err(err) => return Err(err),
    }
    let _ = INSTALLED.set(());
    Ok(())
}

fn install(format: LogFormat) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // Best effort: a `log` logger may already be registered.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::human("human", LogFormat::Human)]
    #[case::alias("Text", LogFormat::Human)]
    #[case::padded(" JSON\n", LogFormat::Json)]
    fn formats_parse_case_insensitively(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>().expect("format is known"), expected);
    }

    #[rstest]
    fn unknown_formats_report_the_normalised_value() {
        let err = "  YAML ".parse::<LogFormat>().expect_err("yaml is unsupported");
        assert!(matches!(err, LoggingError::UnsupportedFormat { ref provided } if provided == "yaml"));
    }

    #[rstest]
    fn repeated_initialisation_succeeds() {
        init_logging().expect("first call installs");
        init_logging().expect("second call is a no-op");
    }
}

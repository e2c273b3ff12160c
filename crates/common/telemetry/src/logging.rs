// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{io::IsTerminal, sync::Once};

use bon::Builder;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, de};
use smart_default::SmartDefault;
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::Subscriber;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::{self, Targets},
    fmt::MakeWriter,
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
};

/// Prefix of every rolled log file; the error-only stream appends `-err`.
const LOG_FILE_PREFIX: &str = "castplay";

/// Used when neither `LoggingOptions::level` nor `RUST_LOG` is set.
const DEFAULT_LOG_TARGETS: &str = "info";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid log level {level:?}"))]
    InvalidLevel {
        level:  String,
        source: filter::ParseError,
    },

    #[snafu(display("Cannot write logs to {dir}"))]
    LogDir {
        dir:    String,
        source: tracing_appender::rolling::InitError,
    },

    #[snafu(display("A global logger is already installed"))]
    AlreadyInstalled { source: tracing::subscriber::SetGlobalDefaultError },

    #[snafu(display("Failed to bridge `log` records"))]
    LogBridge { source: tracing_log::log::SetLoggerError },

    #[snafu(display("Logging has not been initialized"))]
    NotInitialized,

    #[snafu(display("Failed to swap the log filter"))]
    Reload { source: reload::Error },
}

type ReloadHandle = reload::Handle<Targets, Registry>;

/// Set once by [`init_global_logging`]; used by [`reload_level`].
static RELOAD_HANDLE: OnceCell<ReloadHandle> = OnceCell::new();

/// Keeps unit-test worker guards alive for the whole test binary.
static UT_LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Deserializes a string, treating the empty string as `T::default()`.
///
/// Environment overrides cannot unset a key, so `CASTPLAY__LOGGING__LOG_FORMAT=`
/// means "use the default".
pub fn empty_string_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Ok(T::default());
    }
    T::deserialize(de::value::StrDeserializer::new(&s))
        .map_err(|e: de::value::Error| de::Error::custom(format!("invalid value {s:?}: {e}")))
}

/// The `[logging]` settings section.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, SmartDefault, Builder)]
#[serde(default)]
pub struct LoggingOptions {
    /// Directory for hourly rolled log files. Empty disables file output.
    #[default = ""]
    #[builder(default, into)]
    pub dir: String,

    /// Filter such as `"info"` or `"info,castplay_player=debug"`.
    /// Falls back to `RUST_LOG`, then `info`.
    #[builder(into)]
    pub level: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_default")]
    #[builder(default)]
    pub log_format: LogFormat,

    /// Rolled files kept per stream.
    #[default = 720]
    #[builder(default = 720)]
    pub max_log_files: usize,

    /// Also log to stdout. Off for the interactive console, which owns stdout.
    #[default = false]
    #[builder(default = false)]
    pub append_stdout: bool,
}

impl LoggingOptions {
    /// The filter these options resolve to, checked without installing it.
    pub fn targets(&self) -> Result<Targets> {
        match self.level.as_deref() {
            Some(level) => parse_targets(level),
            None => match std::env::var(EnvFilter::DEFAULT_ENV) {
                Ok(level) => parse_targets(&level),
                Err(_) => parse_targets(DEFAULT_LOG_TARGETS),
            },
        }
    }
}

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize, Default, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// `2024-01-01T12:00:00.123Z  INFO castplay_player::controller: selected playlist row`
    #[default]
    Text,
}

pub fn parse_targets(level: &str) -> Result<Targets> {
    level
        .parse::<Targets>()
        .context(InvalidLevelSnafu { level })
}

/// Logging for unit tests: debug level, files under `UNITTEST_LOG_DIR`
/// (default `/tmp/__unittest_logs`). Every call after the first is a no-op.
pub fn init_default_ut_logging() {
    static START: Once = Once::new();

    START.call_once(|| {
        let dir = std::env::var("UNITTEST_LOG_DIR")
            .unwrap_or_else(|_| "/tmp/__unittest_logs".to_string());
        let level = std::env::var("UNITTEST_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let opts = LoggingOptions::builder()
            .dir(dir)
            .level(level)
            .append_stdout(true)
            .build();
        if let Ok(guards) = init_global_logging("unittest", &opts) {
            UT_LOG_GUARDS.lock().extend(guards);
        }
    });
}

/// Installs the global subscriber: an optional stdout layer, and with a
/// non-empty `dir` a rolled file of every event plus one of errors only.
///
/// Only the first call installs anything; later calls return no guards.
/// The returned guards flush the background writers when dropped.
pub fn init_global_logging(app_name: &str, opts: &LoggingOptions) -> Result<Vec<WorkerGuard>> {
    static START: Once = Once::new();
    let mut installed = Ok(Vec::new());
    START.call_once(|| installed = install(app_name, opts));
    installed
}

/// Replaces the active filter, e.g. from a console `log debug` command.
pub fn reload_level(level: &str) -> Result<()> {
    let targets = parse_targets(level)?;
    RELOAD_HANDLE
        .get()
        .context(NotInitializedSnafu)?
        .reload(targets)
        .context(ReloadSnafu)?;
    tracing::info!(level, "log level reloaded");
    Ok(())
}

fn install(app_name: &str, opts: &LoggingOptions) -> Result<Vec<WorkerGuard>> {
    let (filter, handle) = reload::Layer::new(opts.targets()?);
    let mut guards = Vec::new();

    let stdout_layer = opts.append_stdout.then(|| {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        fmt_layer(opts.log_format, writer, std::io::stdout().is_terminal())
    });

    let (file_layer, err_file_layer) = if opts.dir.is_empty() {
        (None, None)
    } else {
        let (writer, guard) = tracing_appender::non_blocking(rolling_appender(opts, LOG_FILE_PREFIX)?);
        guards.push(guard);
        let all = fmt_layer(opts.log_format, writer, false);

        let prefix = format!("{LOG_FILE_PREFIX}-err");
        let (writer, guard) = tracing_appender::non_blocking(rolling_appender(opts, &prefix)?);
        guards.push(guard);
        let errors = fmt_layer(opts.log_format, writer, false)
            .with_filter(filter::LevelFilter::ERROR)
            .boxed();
        (Some(all), Some(errors))
    };

    LogTracer::init().context(LogBridgeSnafu)?;
    let subscriber = Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(err_file_layer);
    tracing::subscriber::set_global_default(subscriber).context(AlreadyInstalledSnafu)?;
    // Only reachable once, guarded by `START`.
    let _ = RELOAD_HANDLE.set(handle);

    tracing::debug!(app = app_name, format = %opts.log_format, dir = %opts.dir, "logging initialized");
    Ok(guards)
}

fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

fn rolling_appender(opts: &LoggingOptions, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(prefix)
        .max_log_files(opts.max_log_files)
        .build(&opts.dir)
        .context(LogDirSnafu { dir: opts.dir.as_str() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_log_text_to_files_only_when_configured() {
        let opts = LoggingOptions::default();
        assert!(opts.dir.is_empty());
        assert!(!opts.append_stdout);
        assert_eq!(opts.log_format, LogFormat::Text);
        assert_eq!(opts.max_log_files, 720);
        assert_eq!(LoggingOptions::builder().build(), opts);
    }

    #[test]
    fn empty_log_format_falls_back_to_text() {
        let opts: LoggingOptions =
            serde_json::from_str(r#"{"log_format": "", "dir": "/var/log/castplay"}"#).unwrap();
        assert_eq!(opts.log_format, LogFormat::Text);
        assert_eq!(opts.dir, "/var/log/castplay");

        let opts: LoggingOptions = serde_json::from_str(r#"{"log_format": "json"}"#).unwrap();
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(serde_json::from_str::<LoggingOptions>(r#"{"log_format": "xml"}"#).is_err());
    }

    #[test]
    fn level_strings_are_checked() {
        assert!(parse_targets("info,castplay_player=debug").is_ok());
        let err = parse_targets("info,castplay_player=loud").unwrap_err();
        assert!(matches!(err, Error::InvalidLevel { .. }));

        let opts = LoggingOptions::builder().level("warn").build();
        assert!(opts.targets().is_ok());
    }

    #[test]
    fn unwritable_dir_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let opts = LoggingOptions::builder()
            .dir(file.path().join("logs").display().to_string())
            .build();
        assert!(matches!(
            rolling_appender(&opts, LOG_FILE_PREFIX),
            Err(Error::LogDir { .. })
        ));
    }

    #[test]
    fn reload_swaps_the_filter() {
        init_default_ut_logging();
        reload_level("warn").unwrap();
        assert!(reload_level("castplay=loud").is_err());
        reload_level("debug").unwrap();
    }
}

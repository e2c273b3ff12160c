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

use std::{any::Any, path::PathBuf};

use castplay_error::{ErrorExt, StackError, StatusCode};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unsupported playback rate {value}"))]
    UnsupportedRate {
        value: f64,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("Volume must be a number between 0 and 1, got {value}"))]
    InvalidVolume {
        value: f64,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("Playlist row {index} does not exist (playlist has {len} rows)"))]
    RowOutOfRange {
        index: usize,
        len:   usize,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("Episode {title:?} has no audio source to load"))]
    MissingSource {
        title: String,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("Cannot parse command {input:?}: {reason}"))]
    ParseCommand {
        input:  String,
        reason: String,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Config file {} does not exist", path.display()))]
    ConfigNotFound {
        path: PathBuf,
        #[snafu(implicit)]
        loc:  snafu::Location,
    },

    #[snafu(display("Failed to load settings"))]
    LoadSettings {
        source: config::ConfigError,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Invalid logging settings"))]
    InvalidLogLevel {
        source: castplay_common_telemetry::logging::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

impl Error {
    fn location(&self) -> &snafu::Location {
        match self {
            Self::UnsupportedRate { loc, .. }
            | Self::InvalidVolume { loc, .. }
            | Self::RowOutOfRange { loc, .. }
            | Self::MissingSource { loc, .. }
            | Self::ParseCommand { loc, .. }
            | Self::ConfigNotFound { loc, .. }
            | Self::LoadSettings { loc, .. }
            | Self::InvalidLogLevel { loc, .. } => loc,
        }
    }
}

impl StackError for Error {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
        buf.push(format!("{layer}: {self}, at {}", self.location()));
    }

    fn next(&self) -> Option<&dyn StackError> { None }
}

impl ErrorExt for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedRate { .. } => StatusCode::Unsupported,
            Self::InvalidVolume { .. } | Self::ParseCommand { .. } => StatusCode::InvalidArgument,
            Self::RowOutOfRange { .. } | Self::MissingSource { .. } => StatusCode::NotFound,
            Self::ConfigNotFound { .. }
            | Self::LoadSettings { .. }
            | Self::InvalidLogLevel { .. } => StatusCode::Config,
        }
    }

    fn as_any(&self) -> &dyn Any { self }
}

#[cfg(test)]
mod tests {
    use snafu::IntoError;

    use super::*;

    #[test]
    fn input_errors_are_recoverable() {
        let err = RowOutOfRangeSnafu { index: 7_usize, len: 3_usize }.build();
        assert_eq!(err.status_code(), StatusCode::NotFound);
        assert!(err.status_code().is_recoverable());
        assert_eq!(
            err.output_msg(),
            "Playlist row 7 does not exist (playlist has 3 rows)"
        );
    }

    #[test]
    fn settings_errors_report_their_cause() {
        let err = LoadSettingsSnafu.into_error(config::ConfigError::Message("bad key".into()));
        assert_eq!(err.status_code(), StatusCode::Config);
        assert_eq!(err.output_msg(), "Failed to load settings: bad key");
    }

    #[test]
    fn debug_fmt_records_location() {
        let err = UnsupportedRateSnafu { value: 3.0 }.build();
        let mut buf = Vec::new();
        err.debug_fmt(0, &mut buf);
        assert_eq!(buf.len(), 1);
        assert!(buf[0].starts_with("0: Unsupported playback rate 3"));
        assert!(buf[0].contains("err.rs"));
    }
}

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

use std::any::Any;

use castplay_error::{ErrorExt, StackError, StatusCode};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Cannot start castplay"))]
    Settings {
        source: castplay_player::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Invalid script"))]
    Script {
        source: castplay_player::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Cannot initialize logging"))]
    Logging {
        source: castplay_common_telemetry::logging::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Failed to read commands from stdin"))]
    ReadStdin {
        source: std::io::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Failed to listen for Ctrl-C"))]
    Signal {
        source: std::io::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

impl Error {
    fn location(&self) -> &snafu::Location {
        match self {
            Self::Settings { loc, .. }
            | Self::Script { loc, .. }
            | Self::Logging { loc, .. }
            | Self::ReadStdin { loc, .. }
            | Self::Signal { loc, .. } => loc,
        }
    }
}

impl StackError for Error {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
        buf.push(format!("{layer}: {self}, at {}", self.location()));
        if let Some(next) = self.next() {
            next.debug_fmt(layer + 1, buf);
        }
    }

    fn next(&self) -> Option<&dyn StackError> {
        match self {
            Self::Settings { source, .. } | Self::Script { source, .. } => Some(source),
            Self::Logging { .. } | Self::ReadStdin { .. } | Self::Signal { .. } => None,
        }
    }
}

impl ErrorExt for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Settings { source, .. } | Self::Script { source, .. } => source.status_code(),
            Self::Logging { .. } => StatusCode::Config,
            Self::ReadStdin { .. } | Self::Signal { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn Any { self }
}

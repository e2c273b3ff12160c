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

//! Commands routed to the controller and the notifications it emits.

use std::{fmt, str::FromStr};

use crate::err::{Error, ParseCommandSnafu};

/// A user request for the playback controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TogglePlayback,
    /// Start playback; no-op while playing.
    Play,
    /// Pause playback; no-op while paused.
    Pause,
    /// Seek to a fraction of the duration (0.0 to 1.0).
    Seek(f64),
    SetVolume(f64),
    /// Raw multiplier; resolved through the configured `RatePolicy`.
    SetRate(f64),
    SelectRow(usize),
    ToggleFavorite(usize),
}

impl FromStr for Command {
    type Err = Error;

    /// Parses the textual form used by the interactive console:
    /// `toggle`, `play`, `pause`, `seek 0.5`, `volume 0.3`, `rate 1.25`,
    /// `select 2`, `fav 1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(verb) = parts.next() else {
            return ParseCommandSnafu {
                input:  s,
                reason: "empty command",
            }
            .fail();
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return ParseCommandSnafu {
                input:  s,
                reason: "too many arguments",
            }
            .fail();
        }

        match (verb.to_ascii_lowercase().as_str(), arg) {
            ("toggle", None) => Ok(Self::TogglePlayback),
            ("play", None) => Ok(Self::Play),
            ("pause", None) => Ok(Self::Pause),
            ("seek", Some(arg)) => parse_number(s, arg).map(Self::Seek),
            ("volume" | "vol", Some(arg)) => parse_number(s, arg).map(Self::SetVolume),
            ("rate" | "speed", Some(arg)) => parse_number(s, arg).map(Self::SetRate),
            ("select", Some(arg)) => parse_index(s, arg).map(Self::SelectRow),
            ("fav" | "favorite", Some(arg)) => parse_index(s, arg).map(Self::ToggleFavorite),
            (_, _) => ParseCommandSnafu {
                input:  s,
                reason: "unknown command or wrong number of arguments",
            }
            .fail(),
        }
    }
}

fn parse_number(input: &str, arg: &str) -> Result<f64, Error> {
    arg.parse::<f64>().map_err(|e| {
        ParseCommandSnafu {
            input,
            reason: e.to_string(),
        }
        .build()
    })
}

fn parse_index(input: &str, arg: &str) -> Result<usize, Error> {
    arg.parse::<usize>().map_err(|e| {
        ParseCommandSnafu {
            input,
            reason: e.to_string(),
        }
        .build()
    })
}

/// User-facing alert text raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    NowPlaying {
        title:     String,
        /// True when the audio was not actually swapped.
        simulated: bool,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NowPlaying {
                title,
                simulated: true,
            } => write!(
                f,
                "Now playing: {title}\nIn a real implementation, the audio file would be loaded \
                 here."
            ),
            Self::NowPlaying {
                title,
                simulated: false,
            } => write!(f, "Now playing: {title}"),
        }
    }
}

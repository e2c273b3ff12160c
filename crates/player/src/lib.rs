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

//! Playback controller for a podcast episode list.
//!
//! A [`PlaybackController`] drives one [`MediaResource`], keeps a
//! [`PlaybackView`] derived from it, and tracks which [`Playlist`] row is
//! highlighted. [`SimulatedMedia`] stands in for a real audio backend.

pub mod actions;
pub mod config;
pub mod controller;
pub mod err;
pub mod media;
pub mod playlist;
pub mod rate;
pub mod settings;
pub mod simulated;
pub mod util;
pub mod view;

pub use actions::{Command, Notification};
pub use config::{PlayerConfig, RowSelection};
pub use controller::PlaybackController;
pub use err::{Error, Result};
pub use media::{MediaEvent, MediaResource, MediaSnapshot};
pub use playlist::{Episode, NowPlayingInfo, Playlist};
pub use rate::{PlaybackRate, RatePolicy};
pub use settings::{Settings, SimulationSettings};
pub use simulated::SimulatedMedia;
pub use view::{Glyph, PlaybackView, format_clock};

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

//! The playable audio object the controller drives.
//!
//! Requests (`play`, `set_current_time`, ...) are fire-and-forget: the
//! resource reports what actually happened later through [`MediaEvent`]s.

use std::sync::Arc;

use parking_lot::RwLock;

/// Notifications a media resource raises while it loads and plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MediaEvent {
    /// Duration became known.
    LoadedMetadata,
    /// Elapsed time changed.
    TimeUpdate,
    Play,
    Pause,
    /// Playback reached the end of the stream.
    Ended,
    VolumeChange,
    RateChange,
}

/// Point-in-time copy of every attribute the view is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaSnapshot {
    /// Seconds.
    pub current_time:  f64,
    /// Seconds; NaN until metadata has loaded.
    pub duration:      f64,
    pub volume:        f64,
    pub playback_rate: f64,
    pub paused:        bool,
}

impl MediaSnapshot {
    /// The duration, if it is known and usable as a divisor.
    pub fn known_duration(&self) -> Option<f64> {
        (self.duration.is_finite() && self.duration > 0.0).then_some(self.duration)
    }
}

impl Default for MediaSnapshot {
    fn default() -> Self {
        Self {
            current_time:  0.0,
            duration:      f64::NAN,
            volume:        1.0,
            playback_rate: 1.0,
            paused:        true,
        }
    }
}

/// A playable audio stream owned by the host.
pub trait MediaResource {
    fn current_time(&self) -> f64;

    /// NaN while the metadata has not loaded.
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    fn playback_rate(&self) -> f64;

    fn is_paused(&self) -> bool;

    /// URI of the loaded stream, if any.
    fn source(&self) -> Option<String>;

    /// Request playback start; completion is reported by a later `Play`.
    fn play(&mut self);

    fn pause(&mut self);

    fn set_current_time(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f64);

    fn set_playback_rate(&mut self, rate: f64);

    /// Replace the stream. Playback stops and the duration becomes unknown
    /// until `LoadedMetadata`.
    fn load(&mut self, uri: &str);

    fn snapshot(&self) -> MediaSnapshot {
        MediaSnapshot {
            current_time:  self.current_time(),
            duration:      self.duration(),
            volume:        self.volume(),
            playback_rate: self.playback_rate(),
            paused:        self.is_paused(),
        }
    }
}

/// Shared handle: the host keeps driving the resource's clock while the
/// controller issues requests through its own clone.
impl<M: MediaResource> MediaResource for Arc<RwLock<M>> {
    fn current_time(&self) -> f64 { self.read().current_time() }

    fn duration(&self) -> f64 { self.read().duration() }

    fn volume(&self) -> f64 { self.read().volume() }

    fn playback_rate(&self) -> f64 { self.read().playback_rate() }

    fn is_paused(&self) -> bool { self.read().is_paused() }

    fn source(&self) -> Option<String> { self.read().source() }

    fn play(&mut self) { self.write().play(); }

    fn pause(&mut self) { self.write().pause(); }

    fn set_current_time(&mut self, seconds: f64) { self.write().set_current_time(seconds); }

    fn set_volume(&mut self, volume: f64) { self.write().set_volume(volume); }

    fn set_playback_rate(&mut self, rate: f64) { self.write().set_playback_rate(rate); }

    fn load(&mut self, uri: &str) { self.write().load(uri); }

    fn snapshot(&self) -> MediaSnapshot { self.read().snapshot() }
}

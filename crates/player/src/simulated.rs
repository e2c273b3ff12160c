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

use std::{collections::HashMap, mem, time::Duration};

use crate::media::{MediaEvent, MediaResource, MediaSnapshot};

/// In-memory media resource driven by an external clock.
///
/// Stream lengths come from `catalog`; a URI missing from the catalog never
/// finishes loading its metadata. Requests take effect immediately and their
/// events are delivered by the next [`SimulatedMedia::advance`].
#[derive(Debug, Clone, bon::Builder)]
pub struct SimulatedMedia {
    /// Stream length in seconds, keyed by URI.
    #[builder(default)]
    catalog:          HashMap<String, f64>,
    /// How long metadata takes to arrive after `load`.
    #[builder(default = Duration::ZERO)]
    metadata_delay:   Duration,
    #[builder(skip)]
    state:            MediaSnapshot,
    #[builder(skip)]
    source:           Option<String>,
    /// Length still to be revealed and the time left before it is.
    #[builder(skip)]
    metadata_pending: Option<(f64, Duration)>,
    #[builder(skip)]
    pending:          Vec<MediaEvent>,
}

impl Default for SimulatedMedia {
    fn default() -> Self { Self::builder().build() }
}

impl SimulatedMedia {
    /// Registers a stream length for `uri`.
    pub fn with_track(mut self, uri: impl Into<String>, seconds: f64) -> Self {
        self.catalog.insert(uri.into(), seconds);
        self
    }

    /// Moves the clock forward and returns every event raised since the last
    /// call, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MediaEvent> {
        let mut events = mem::take(&mut self.pending);

        if let Some((length, remaining)) = self.metadata_pending {
            if elapsed >= remaining {
                self.state.duration = length;
                self.metadata_pending = None;
                events.push(MediaEvent::LoadedMetadata);
            } else {
                self.metadata_pending = Some((length, remaining - elapsed));
            }
            return events;
        }

        let Some(duration) = self.state.known_duration() else {
            return events;
        };
        if self.state.paused || elapsed.is_zero() {
            return events;
        }

        let next = self.state.current_time + elapsed.as_secs_f64() * self.state.playback_rate;
        self.state.current_time = next.min(duration);
        events.push(MediaEvent::TimeUpdate);

        if self.state.current_time >= duration {
            self.state.paused = true;
            events.push(MediaEvent::Pause);
            events.push(MediaEvent::Ended);
        }
        events
    }
}

impl MediaResource for SimulatedMedia {
    fn current_time(&self) -> f64 { self.state.current_time }

    fn duration(&self) -> f64 { self.state.duration }

    fn volume(&self) -> f64 { self.state.volume }

    fn playback_rate(&self) -> f64 { self.state.playback_rate }

    fn is_paused(&self) -> bool { self.state.paused }

    fn source(&self) -> Option<String> { self.source.clone() }

    fn play(&mut self) {
        if !self.state.paused {
            return;
        }
        if let Some(duration) = self.state.known_duration() {
            if self.state.current_time >= duration {
                self.state.current_time = 0.0;
            }
        }
        self.state.paused = false;
        self.pending.push(MediaEvent::Play);
    }

    fn pause(&mut self) {
        if self.state.paused {
            return;
        }
        self.state.paused = true;
        self.pending.push(MediaEvent::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }
        let upper = self.state.known_duration().unwrap_or(f64::INFINITY);
        self.state.current_time = seconds.clamp(0.0, upper);
        self.pending.push(MediaEvent::TimeUpdate);
    }

    fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.state.volume = volume.clamp(0.0, 1.0);
        self.pending.push(MediaEvent::VolumeChange);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            return;
        }
        self.state.playback_rate = rate;
        self.pending.push(MediaEvent::RateChange);
    }

    fn load(&mut self, uri: &str) {
        self.pause();
        self.state.current_time = 0.0;
        self.state.duration = f64::NAN;
        self.source = Some(uri.to_string());
        self.metadata_pending = self
            .catalog
            .get(uri)
            .map(|length| (*length, self.metadata_delay));
        tracing::debug!(uri, known = self.metadata_pending.is_some(), "loading stream");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(length: f64) -> SimulatedMedia {
        let mut media = SimulatedMedia::default().with_track("ep.mp3", length);
        media.load("ep.mp3");
        assert_eq!(media.advance(Duration::ZERO), vec![MediaEvent::LoadedMetadata]);
        media
    }

    #[test]
    fn starts_paused_at_zero_with_unknown_duration() {
        let media = SimulatedMedia::default();
        let snapshot = media.snapshot();
        assert!(snapshot.paused);
        assert_eq!(snapshot.current_time, 0.0);
        assert!(snapshot.duration.is_nan());
        assert_eq!(snapshot.known_duration(), None);
        assert_eq!(media.source(), None);
    }

    #[test]
    fn metadata_arrives_after_delay() {
        let mut media = SimulatedMedia::builder()
            .metadata_delay(Duration::from_millis(300))
            .build()
            .with_track("a.mp3", 120.0);
        media.load("a.mp3");

        assert!(media.advance(Duration::from_millis(200)).is_empty());
        assert!(media.duration().is_nan());
        assert_eq!(
            media.advance(Duration::from_millis(100)),
            vec![MediaEvent::LoadedMetadata]
        );
        assert_eq!(media.duration(), 120.0);
    }

    #[test]
    fn unknown_uri_never_loads_metadata() {
        let mut media = SimulatedMedia::default();
        media.load("missing.mp3");
        media.play();
        assert_eq!(media.advance(Duration::from_secs(60)), vec![MediaEvent::Play]);
        assert!(media.duration().is_nan());
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn playback_advances_with_rate() {
        let mut media = loaded(100.0);
        media.set_playback_rate(1.5);
        media.play();
        let events = media.advance(Duration::from_secs(2));
        assert_eq!(
            events,
            vec![MediaEvent::RateChange, MediaEvent::Play, MediaEvent::TimeUpdate]
        );
        assert!((media.current_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut media = loaded(100.0);
        assert!(media.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn reaching_the_end_pauses() {
        let mut media = loaded(10.0);
        media.play();
        let events = media.advance(Duration::from_secs(30));
        assert_eq!(
            events,
            vec![
                MediaEvent::Play,
                MediaEvent::TimeUpdate,
                MediaEvent::Pause,
                MediaEvent::Ended
            ]
        );
        assert_eq!(media.current_time(), 10.0);
        assert!(media.is_paused());

        media.play();
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn seek_and_volume_are_clamped() {
        let mut media = loaded(50.0);
        media.set_current_time(80.0);
        assert_eq!(media.current_time(), 50.0);
        media.set_current_time(-4.0);
        assert_eq!(media.current_time(), 0.0);
        media.set_current_time(f64::NAN);
        assert_eq!(media.current_time(), 0.0);

        media.set_volume(1.7);
        assert_eq!(media.volume(), 1.0);
        media.set_volume(f64::NAN);
        assert_eq!(media.volume(), 1.0);

        media.set_playback_rate(0.0);
        assert_eq!(media.playback_rate(), 1.0);
    }

    #[test]
    fn load_resets_position_and_stops() {
        let mut media = loaded(50.0).with_track("b.mp3", 70.0);
        media.set_volume(0.4);
        media.play();
        media.advance(Duration::from_secs(10));

        media.load("b.mp3");
        assert!(media.is_paused());
        assert_eq!(media.current_time(), 0.0);
        assert!(media.duration().is_nan());
        assert_eq!(media.volume(), 0.4);
        assert_eq!(media.source().as_deref(), Some("b.mp3"));
        assert_eq!(
            media.advance(Duration::ZERO),
            vec![MediaEvent::Pause, MediaEvent::LoadedMetadata]
        );
        assert_eq!(media.duration(), 70.0);
    }
}

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

//! Transport controls over a single media resource.
//!
//! The controller is the only writer of the view: every request to the
//! resource is followed by re-deriving [`PlaybackView`] from a fresh
//! snapshot. Requests are not awaited; when the resource later reports
//! progress the host calls [`PlaybackController::on_time_advance`] or
//! [`PlaybackController::on_media_event`].

use snafu::{OptionExt, ensure};
use tracing::{debug, info, warn};

use crate::{
    actions::{Command, Notification},
    config::{PlayerConfig, RowSelection},
    err::{InvalidVolumeSnafu, MissingSourceSnafu, Result},
    media::{MediaEvent, MediaResource},
    playlist::{NowPlayingInfo, Playlist},
    rate::PlaybackRate,
    view::PlaybackView,
};

pub struct PlaybackController<M> {
    media:       M,
    playlist:    Playlist,
    now_playing: Option<NowPlayingInfo>,
    view:        PlaybackView,
    config:      PlayerConfig,
}

impl<M: MediaResource> PlaybackController<M> {
    /// Wraps `media`, applying the configured initial volume and rate.
    pub fn new(mut media: M, playlist: Playlist, config: PlayerConfig) -> Self {
        let volume = if config.initial_volume.is_nan() {
            1.0
        } else {
            config.initial_volume.clamp(0.0, 1.0)
        };
        media.set_volume(volume);
        media.set_playback_rate(config.initial_rate.value());
        let view = PlaybackView::derive(&media.snapshot());

        Self {
            media,
            playlist,
            now_playing: None,
            view,
            config,
        }
    }

    pub const fn view(&self) -> &PlaybackView { &self.view }

    pub const fn playlist(&self) -> &Playlist { &self.playlist }

    pub const fn now_playing(&self) -> Option<&NowPlayingInfo> { self.now_playing.as_ref() }

    pub const fn config(&self) -> &PlayerConfig { &self.config }

    pub const fn media(&self) -> &M { &self.media }

    /// Speed shown by the rate selector.
    pub fn rate(&self) -> PlaybackRate { PlaybackRate::nearest(self.media.playback_rate()) }

    pub fn volume(&self) -> f64 { self.media.volume() }

    /// Routes a command to the matching operation.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<Notification>> {
        debug!(?command, "dispatch");
        match command {
            Command::TogglePlayback => self.toggle_playback(),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Seek(fraction) => self.seek(fraction),
            Command::SetVolume(volume) => self.set_volume(volume)?,
            Command::SetRate(value) => {
                self.set_playback_rate_value(value)?;
            }
            Command::SelectRow(index) => return self.select_playlist_row(index).map(Some),
            Command::ToggleFavorite(index) => {
                self.toggle_favorite(index)?;
            }
        }
        Ok(None)
    }

    /// Starts playback when paused, pauses otherwise.
    ///
    /// The glyph flips as soon as the request is issued, before the resource
    /// confirms that audio is actually running.
    pub fn toggle_playback(&mut self) {
        if self.media.is_paused() {
            debug!("requesting playback start");
            self.media.play();
        } else {
            debug!("requesting pause");
            self.media.pause();
        }
        self.refresh();
    }

    pub fn play(&mut self) {
        if self.media.is_paused() {
            self.media.play();
        }
        self.refresh();
    }

    pub fn pause(&mut self) {
        if !self.media.is_paused() {
            self.media.pause();
        }
        self.refresh();
    }

    /// Called whenever the resource reports elapsed-time change.
    pub fn on_time_advance(&mut self) { self.refresh(); }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate => self.on_time_advance(),
            MediaEvent::Ended => {
                info!("playback ended");
                self.refresh();
            }
            _ => self.refresh(),
        }
    }

    /// Seeks to `fraction` of the duration.
    ///
    /// The fraction is clamped to `[0, 1]`. Without a known duration there is
    /// nowhere to seek to and the request is dropped.
    pub fn seek(&mut self, fraction: f64) {
        let clamped = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        if clamped != fraction {
            warn!(fraction, clamped, "seek fraction out of range");
        }

        match self.media.snapshot().known_duration() {
            Some(duration) => {
                let target = clamped * duration;
                debug!(target, "seeking");
                self.media.set_current_time(target);
            }
            None => debug!("duration unknown, seek ignored"),
        }
        self.refresh();
    }

    /// Forwards `volume` to the resource, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        ensure!(!volume.is_nan(), InvalidVolumeSnafu { value: volume });
        self.media.set_volume(volume.clamp(0.0, 1.0));
        self.refresh();
        Ok(())
    }

    pub fn set_playback_rate(&mut self, rate: PlaybackRate) {
        debug!(%rate, "setting playback rate");
        self.media.set_playback_rate(rate.value());
        self.refresh();
    }

    /// Applies a raw multiplier through the configured `RatePolicy` and
    /// returns the speed actually forwarded.
    pub fn set_playback_rate_value(&mut self, value: f64) -> Result<PlaybackRate> {
        let rate = self.config.rate_policy.resolve(value)?;
        if rate.value() != value {
            warn!(value, %rate, "playback rate snapped to nearest offered speed");
        }
        self.set_playback_rate(rate);
        Ok(rate)
    }

    /// Highlights playlist row `index` and shows its metadata.
    ///
    /// With `RowSelection::Simulate` the current audio keeps playing and the
    /// returned notification says so. With `RowSelection::LoadSource` the
    /// row's source is loaded; a row without a source is rejected before
    /// anything changes.
    pub fn select_playlist_row(&mut self, index: usize) -> Result<Notification> {
        let episode = self.playlist.get(index)?.clone();

        let simulated = match self.config.row_selection {
            RowSelection::Simulate => true,
            RowSelection::LoadSource => {
                let source = episode.source.as_deref().context(MissingSourceSnafu {
                    title: episode.title.as_str(),
                })?;
                self.media.load(source);
                false
            }
        };

        self.playlist.select(index)?;
        self.now_playing = Some(NowPlayingInfo::from_episode(&episode));
        self.refresh();

        info!(index, title = %episode.title, simulated, "selected playlist row");
        Ok(Notification::NowPlaying {
            title: episode.title,
            simulated,
        })
    }

    pub fn toggle_favorite(&mut self, index: usize) -> Result<bool> {
        let favorite = self.playlist.toggle_favorite(index)?;
        debug!(index, favorite, "toggled favorite");
        Ok(favorite)
    }

    fn refresh(&mut self) { self.view = PlaybackView::derive(&self.media.snapshot()); }
}

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

//! Display state for the player bar.
//!
//! Everything here is recomputed from a [`MediaSnapshot`]; nothing is
//! mutated in place.
//!
//! ```text
//! ▶  ━━━━━━━━━━━━●━━━━━━━━━━━━━━  1:15 / 4:00
//! ```

use std::fmt;

use crate::media::MediaSnapshot;

const UNKNOWN_TIME: &str = "0:00";

/// The play/pause button face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Glyph {
    /// Shown while paused: pressing starts playback.
    #[default]
    #[strum(to_string = "▶")]
    Play,
    /// Shown while playing.
    #[strum(to_string = "⏸")]
    Pause,
}

/// Derived, non-authoritative display state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackView {
    /// Progress bar fill, in `[0, 100]`.
    pub fill_percent:   f64,
    pub current_label:  String,
    pub duration_label: String,
    pub glyph:          Glyph,
}

impl Default for PlaybackView {
    fn default() -> Self {
        Self {
            fill_percent:   0.0,
            current_label:  UNKNOWN_TIME.to_string(),
            duration_label: UNKNOWN_TIME.to_string(),
            glyph:          Glyph::Play,
        }
    }
}

impl PlaybackView {
    pub fn derive(snapshot: &MediaSnapshot) -> Self {
        let glyph = if snapshot.paused {
            Glyph::Play
        } else {
            Glyph::Pause
        };

        let Some(duration) = snapshot.known_duration() else {
            return Self {
                glyph,
                ..Self::default()
            };
        };

        // Label and fill both use the position clamped into the stream.
        let current = if snapshot.current_time.is_nan() {
            0.0
        } else {
            snapshot.current_time.clamp(0.0, duration)
        };

        Self {
            fill_percent: current / duration * 100.0,
            current_label: format_clock(current),
            duration_label: format_clock(duration),
            glyph,
        }
    }

    /// `"current / duration"`, as shown next to the progress bar.
    pub fn time_label(&self) -> String {
        format!("{} / {}", self.current_label, self.duration_label)
    }
}

impl fmt::Display for PlaybackView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5.1}% {}",
            self.glyph,
            self.fill_percent,
            self.time_label()
        )
    }
}

/// Formats seconds as `M:SS`, truncating toward zero. Minutes are not
/// wrapped into hours.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return UNKNOWN_TIME.to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current_time: f64, duration: f64, paused: bool) -> MediaSnapshot {
        MediaSnapshot {
            current_time,
            duration,
            paused,
            ..MediaSnapshot::default()
        }
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(75.0), "1:15");
        assert_eq!(format_clock(5.0), "0:05");
        assert_eq!(format_clock(600.0), "10:00");
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(3725.0), "62:05");
    }

    #[test]
    fn format_truncates_instead_of_rounding() {
        assert_eq!(format_clock(59.999), "0:59");
        assert_eq!(format_clock(75.9), "1:15");
    }

    #[test]
    fn format_handles_garbage() {
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(f64::INFINITY), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn derives_fill_and_labels() {
        let view = PlaybackView::derive(&snapshot(75.0, 300.0, false));
        assert_eq!(view.fill_percent, 25.0);
        assert_eq!(view.time_label(), "1:15 / 5:00");
        assert_eq!(view.glyph, Glyph::Pause);
    }

    #[test]
    fn unknown_duration_is_safe_default() {
        for duration in [f64::NAN, 0.0, f64::INFINITY, -1.0] {
            let view = PlaybackView::derive(&snapshot(42.0, duration, true));
            assert_eq!(view.fill_percent, 0.0);
            assert_eq!(view.time_label(), "0:00 / 0:00");
            assert_eq!(view.glyph, Glyph::Play);
        }
    }

    #[test]
    fn unknown_duration_keeps_glyph() {
        let view = PlaybackView::derive(&snapshot(0.0, f64::NAN, false));
        assert_eq!(view.glyph, Glyph::Pause);
        assert_eq!(view.fill_percent, 0.0);
    }

    #[test]
    fn fill_is_monotonic_and_floor_consistent() {
        let duration = 317.0;
        let mut previous = 0.0;
        for step in 0..=3170 {
            let current = f64::from(step) / 10.0;
            let view = PlaybackView::derive(&snapshot(current, duration, false));
            assert!(view.fill_percent.is_finite());
            assert!(view.fill_percent >= previous);
            assert_eq!(
                view.fill_percent.floor(),
                (current / duration * 100.0).floor()
            );
            previous = view.fill_percent;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn fill_is_clamped_past_the_end() {
        let view = PlaybackView::derive(&snapshot(400.0, 300.0, true));
        assert_eq!(view.fill_percent, 100.0);
        assert_eq!(view.time_label(), "5:00 / 5:00");

        let view = PlaybackView::derive(&snapshot(-3.0, 300.0, true));
        assert_eq!(view.fill_percent, 0.0);
        assert_eq!(view.time_label(), "0:00 / 5:00");

        let view = PlaybackView::derive(&snapshot(f64::NAN, 300.0, true));
        assert_eq!(view.fill_percent, 0.0);
        assert_eq!(view.time_label(), "0:00 / 5:00");
    }

    #[test]
    fn glyphs_render_as_symbols() {
        assert_eq!(Glyph::Play.to_string(), "▶");
        assert_eq!(Glyph::Pause.to_string(), "⏸");
        assert_eq!(PlaybackView::default().to_string(), "▶   0.0% 0:00 / 0:00");
    }
}

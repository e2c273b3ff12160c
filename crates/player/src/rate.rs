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

//! Playback speeds offered by the rate selector.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::err::{Error, UnsupportedRateSnafu};

const RATE_TOLERANCE: f64 = 1e-9;

/// One of the fixed speeds the rate selector offers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[serde(try_from = "f64", into = "f64")]
pub enum PlaybackRate {
    #[strum(to_string = "0.5x")]
    Half,
    #[strum(to_string = "0.75x")]
    ThreeQuarters,
    #[default]
    #[strum(to_string = "1x")]
    Normal,
    #[strum(to_string = "1.25x")]
    OneAndQuarter,
    #[strum(to_string = "1.5x")]
    OneAndHalf,
    #[strum(to_string = "2x")]
    Double,
}

impl PlaybackRate {
    /// The multiplier forwarded to the media resource.
    pub const fn value(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
            Self::Normal => 1.0,
            Self::OneAndQuarter => 1.25,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }

    /// Clamps an arbitrary multiplier to the closest offered speed.
    ///
    /// Ties resolve to the slower speed; NaN resolves to `Normal`.
    pub fn nearest(value: f64) -> Self {
        if value.is_nan() {
            return Self::Normal;
        }
        let value = value.clamp(Self::Half.value(), Self::Double.value());
        let mut best = Self::Half;
        for rate in Self::iter() {
            if (rate.value() - value).abs() < (best.value() - value).abs() {
                best = rate;
            }
        }
        best
    }
}

impl TryFrom<f64> for PlaybackRate {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::iter()
            .find(|rate| (rate.value() - value).abs() <= RATE_TOLERANCE)
            .ok_or_else(|| UnsupportedRateSnafu { value }.build())
    }
}

impl From<PlaybackRate> for f64 {
    fn from(rate: PlaybackRate) -> Self { rate.value() }
}

/// What a raw numeric rate request does when it is not one of the offered
/// speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// Refuse the request with `UnsupportedRate`.
    Reject,
    /// Snap to the nearest offered speed.
    #[default]
    Nearest,
}

impl RatePolicy {
    pub fn resolve(self, value: f64) -> crate::err::Result<PlaybackRate> {
        match self {
            Self::Reject => PlaybackRate::try_from(value),
            Self::Nearest => Ok(PlaybackRate::nearest(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_six_speeds_in_order() {
        let values: Vec<f64> = PlaybackRate::iter().map(PlaybackRate::value).collect();
        assert_eq!(values, vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]);
        assert_eq!(PlaybackRate::default(), PlaybackRate::Normal);
    }

    #[test]
    fn labels_match_selector_options() {
        assert_eq!(PlaybackRate::Half.to_string(), "0.5x");
        assert_eq!(PlaybackRate::OneAndQuarter.to_string(), "1.25x");
        assert_eq!(PlaybackRate::Double.to_string(), "2x");
    }

    #[test]
    fn exact_values_convert() {
        assert_eq!(PlaybackRate::try_from(1.5).unwrap(), PlaybackRate::OneAndHalf);
        assert_eq!(PlaybackRate::try_from(0.75).unwrap(), PlaybackRate::ThreeQuarters);
        assert!(PlaybackRate::try_from(1.1).is_err());
        assert!(PlaybackRate::try_from(f64::NAN).is_err());
        assert!(PlaybackRate::try_from(-1.0).is_err());
    }

    #[test]
    fn nearest_clamps_out_of_range_values() {
        assert_eq!(PlaybackRate::nearest(0.1), PlaybackRate::Half);
        assert_eq!(PlaybackRate::nearest(-3.0), PlaybackRate::Half);
        assert_eq!(PlaybackRate::nearest(7.0), PlaybackRate::Double);
        assert_eq!(PlaybackRate::nearest(f64::INFINITY), PlaybackRate::Double);
        assert_eq!(PlaybackRate::nearest(1.1), PlaybackRate::Normal);
        assert_eq!(PlaybackRate::nearest(1.2), PlaybackRate::OneAndQuarter);
        assert_eq!(PlaybackRate::nearest(f64::NAN), PlaybackRate::Normal);
    }

    #[test]
    fn nearest_prefers_slower_speed_on_ties() {
        assert_eq!(PlaybackRate::nearest(1.75), PlaybackRate::OneAndHalf);
        assert_eq!(PlaybackRate::nearest(0.625), PlaybackRate::Half);
    }

    #[test]
    fn policy_decides_between_reject_and_clamp() {
        assert!(RatePolicy::Reject.resolve(3.0).is_err());
        assert_eq!(RatePolicy::Nearest.resolve(3.0).unwrap(), PlaybackRate::Double);
        assert_eq!(RatePolicy::Reject.resolve(2.0).unwrap(), PlaybackRate::Double);
    }
}

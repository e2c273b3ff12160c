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

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::rate::{PlaybackRate, RatePolicy};

/// What happens to the audio when a playlist row is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSelection {
    /// Only the metadata changes; the user is told the swap is simulated.
    #[default]
    Simulate,
    /// The row's `source` is loaded into the media resource.
    LoadSource,
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, SmartDefault, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied on construction (0.0 to 1.0)
    #[default = 1.0]
    #[builder(default = 1.0)]
    pub initial_volume: f64,

    /// Rate applied on construction
    #[builder(default)]
    pub initial_rate: PlaybackRate,

    /// Handling of numeric rates outside the offered speeds
    #[builder(default)]
    pub rate_policy: RatePolicy,

    /// Behavior of playlist row selection
    #[builder(default)]
    pub row_selection: RowSelection,
}

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

use std::{collections::HashMap, path::Path, time::Duration};

use castplay_common_telemetry::{LoggingOptions, parse_targets};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use snafu::{ResultExt, ensure};

use crate::{
    config::PlayerConfig,
    err::{ConfigNotFoundSnafu, InvalidLogLevelSnafu, LoadSettingsSnafu, Result},
    media::MediaResource,
    playlist::{Episode, Playlist},
    simulated::SimulatedMedia,
};

/// Compiled-in defaults, merged first.
const BASE_CONFIG: &str = r#"
[player]
initial_volume = 1.0
initial_rate = 1.0
rate_policy = "nearest"
row_selection = "simulate"

[simulation]
tick_ms = 250
speedup = 1.0
metadata_delay_ms = 300

[logging]
append_stdout = false
"#;

/// Optional project-local file, merged after the defaults.
const LOCAL_CONFIG: &str = "config/castplay";

/// Prefix of environment overrides, e.g. `CASTPLAY__PLAYER__INITIAL_VOLUME`.
pub const ENV_PREFIX: &str = "CASTPLAY";

/// Parameters of the simulated media clock used by the binary.
#[derive(Debug, Clone, PartialEq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Interval between time-advance notifications.
    #[default = 250]
    pub tick_ms: u64,
    /// Media seconds elapsed per wall-clock second.
    #[default = 1.0]
    pub speedup: f64,
    #[default = 300]
    pub metadata_delay_ms: u64,
    /// Stream loaded before any row is selected.
    pub initial_source: Option<String>,
    /// Stream lengths in seconds, keyed by URI.
    pub catalog: HashMap<String, f64>,
}

impl SimulationSettings {
    pub fn tick(&self) -> Duration { Duration::from_millis(self.tick_ms.max(1)) }

    /// Media time covered by one tick.
    pub fn media_step(&self) -> Duration {
        let speedup = if self.speedup.is_finite() && self.speedup > 0.0 {
            self.speedup
        } else {
            1.0
        };
        self.tick().mul_f64(speedup)
    }

    /// Builds the simulated resource and loads `initial_source`, if any.
    pub fn build_media(&self) -> SimulatedMedia {
        let mut media = SimulatedMedia::builder()
            .catalog(self.catalog.clone())
            .metadata_delay(Duration::from_millis(self.metadata_delay_ms))
            .build();
        if let Some(source) = &self.initial_source {
            media.load(source);
        }
        media
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player:     PlayerConfig,
    pub simulation: SimulationSettings,
    pub logging:    LoggingOptions,
    pub episodes:   Vec<Episode>,
}

impl Settings {
    /// Loads defaults, then `config/castplay.*` if present, then `path`,
    /// then `CASTPLAY__*` environment variables.
    ///
    /// An explicit `path` that does not exist is an error, as is a
    /// `logging.level` that is not a valid filter.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Like [`Settings::load`], with the environment source supplied by the
    /// caller.
    pub fn load_from(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::from_str(BASE_CONFIG, FileFormat::Toml))
            .add_source(File::with_name(LOCAL_CONFIG).required(false));

        if let Some(path) = path {
            ensure!(path.exists(), ConfigNotFoundSnafu { path });
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .context(LoadSettingsSnafu)?;
        if let Some(level) = &settings.logging.level {
            parse_targets(level).context(InvalidLogLevelSnafu)?;
        }
        Ok(settings)
    }

    pub fn playlist(&self) -> Playlist { Playlist::new(self.episodes.clone()) }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{
        config::RowSelection,
        rate::{PlaybackRate, RatePolicy},
    };

    fn no_env() -> Environment { Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new())) }

    #[test]
    fn defaults_without_files() {
        let settings = Settings::load_from(None, no_env()).unwrap();
        assert_eq!(settings.player, PlayerConfig::default());
        assert_eq!(settings.simulation.tick_ms, 250);
        assert_eq!(settings.simulation.metadata_delay_ms, 300);
        assert!(settings.episodes.is_empty());
        assert!(!settings.logging.append_stdout);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[player]
initial_volume = 0.5
initial_rate = 2
rate_policy = "reject"
row_selection = "load_source"

[simulation]
speedup = 4.0
initial_source = "a.mp3"

[simulation.catalog]
"a.mp3" = 120.0

[[episodes]]
title = "Pilot"
date = "2024-01-05"
duration = "2:00"
source = "a.mp3"

[[episodes]]
title = "Second"
date = "2024-01-12"
duration = "3:00"
favorite = true
"#
        )
        .unwrap();

        let settings = Settings::load_from(Some(file.path()), no_env()).unwrap();
        assert_eq!(settings.player.initial_volume, 0.5);
        assert_eq!(settings.player.initial_rate, PlaybackRate::Double);
        assert_eq!(settings.player.rate_policy, RatePolicy::Reject);
        assert_eq!(settings.player.row_selection, RowSelection::LoadSource);
        assert_eq!(settings.simulation.tick_ms, 250);
        assert_eq!(settings.simulation.media_step(), Duration::from_secs(1));
        assert_eq!(settings.simulation.catalog.get("a.mp3"), Some(&120.0));

        let playlist = settings.playlist();
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.episodes()[0].source.as_deref(), Some("a.mp3"));
        assert!(playlist.episodes()[1].favorite);
    }

    #[test]
    fn environment_overrides_file() {
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(Some(HashMap::from([(
                "CASTPLAY__PLAYER__INITIAL_VOLUME".to_string(),
                "0.25".to_string(),
            )])));
        let settings = Settings::load_from(None, env).unwrap();
        assert_eq!(settings.player.initial_volume, 0.25);
    }

    #[test]
    fn unsupported_rate_in_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[player]\ninitial_rate = 3.0\n").unwrap();
        assert!(Settings::load_from(Some(file.path()), no_env()).is_err());
    }

    #[test]
    fn bad_log_level_is_a_config_error() {
        use castplay_error::{ErrorExt, StatusCode};

        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(HashMap::from([(
                "CASTPLAY__LOGGING__LEVEL".to_string(),
                "info,castplay_player=loud".to_string(),
            )])));
        let err = Settings::load_from(None, env).unwrap_err();
        assert!(matches!(err, crate::err::Error::InvalidLogLevel { .. }));
        assert_eq!(err.status_code(), StatusCode::Config);
        assert_eq!(err.status_code().exit_code(), 78);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::load_from(Some(Path::new("/nonexistent/castplay.toml")), no_env())
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn builds_media_with_initial_source() {
        let settings = SimulationSettings {
            initial_source: Some("a.mp3".to_string()),
            catalog: HashMap::from([("a.mp3".to_string(), 90.0)]),
            metadata_delay_ms: 0,
            ..SimulationSettings::default()
        };
        let mut media = settings.build_media();
        assert_eq!(media.source().as_deref(), Some("a.mp3"));
        media.advance(Duration::ZERO);
        assert_eq!(media.duration(), 90.0);
    }
}

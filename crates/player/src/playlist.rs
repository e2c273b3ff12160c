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

//! Episode list and the single highlighted row.
//!
//! Rows are fixed once the playlist is built; only the selection and the
//! per-row favorite star change.

use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::err::{Result, RowOutOfRangeSnafu};

/// One row of the episode table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub title:    String,
    /// Publication date, displayed as written.
    pub date:     String,
    /// Duration label as listed, e.g. `"45:30"`. Not parsed.
    pub duration: String,
    /// Audio URI, used when row selection loads real content.
    #[serde(default)]
    pub source:   Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl Episode {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title:    title.into(),
            date:     date.into(),
            duration: duration.into(),
            source:   None,
            favorite: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// ★ for favorites, ☆ otherwise.
    pub const fn star(&self) -> &'static str { if self.favorite { "★" } else { "☆" } }
}

/// Metadata shown above the player.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{title} | {date} | {duration}")]
pub struct NowPlayingInfo {
    pub title:    String,
    pub date:     String,
    pub duration: String,
}

impl NowPlayingInfo {
    pub fn from_episode(episode: &Episode) -> Self {
        Self {
            title:    episode.title.clone(),
            date:     episode.date.clone(),
            duration: episode.duration.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    episodes: Vec<Episode>,
    selected: Option<usize>,
}

impl Playlist {
    pub const fn new(episodes: Vec<Episode>) -> Self {
        Self {
            episodes,
            selected: None,
        }
    }

    pub fn episodes(&self) -> &[Episode] { &self.episodes }

    pub fn len(&self) -> usize { self.episodes.len() }

    pub fn is_empty(&self) -> bool { self.episodes.is_empty() }

    pub const fn selected_index(&self) -> Option<usize> { self.selected }

    pub fn selected(&self) -> Option<&Episode> { self.selected.and_then(|i| self.episodes.get(i)) }

    pub fn is_selected(&self, index: usize) -> bool { self.selected == Some(index) }

    /// Highlights `index`, clearing any previous highlight.
    ///
    /// An out-of-range index leaves the selection untouched.
    pub fn select(&mut self, index: usize) -> Result<&Episode> {
        self.check(index)?;
        self.selected = Some(index);
        Ok(&self.episodes[index])
    }

    pub fn get(&self, index: usize) -> Result<&Episode> {
        self.check(index)?;
        Ok(&self.episodes[index])
    }

    /// Flips the row's star and returns the new state. The selection is not
    /// affected.
    pub fn toggle_favorite(&mut self, index: usize) -> Result<bool> {
        self.check(index)?;
        let episode = &mut self.episodes[index];
        episode.favorite = !episode.favorite;
        Ok(episode.favorite)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(|e| e.favorite)
    }

    fn check(&self, index: usize) -> Result<()> {
        ensure!(
            index < self.episodes.len(),
            RowOutOfRangeSnafu {
                index,
                len: self.episodes.len(),
            }
        );
        Ok(())
    }
}

impl From<Vec<Episode>> for Playlist {
    fn from(episodes: Vec<Episode>) -> Self { Self::new(episodes) }
}

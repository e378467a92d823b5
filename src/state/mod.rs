// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The single mutable application state and its persistence.

pub mod manager;
pub mod persist;
pub mod storage;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::router::RouteKind;
use crate::router::RoutePayload;
use crate::router::Tab;
use crate::state::persist::SCHEMA_VERSION;
use crate::types::card_state::SrsCardState;
use crate::types::level::Level;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,
    pub profile: Profile,
    pub ui: UiState,
    pub progress: Progress,
    /// Review state keyed by vocabulary id. Entries are created on first
    /// review and never removed.
    pub srs: BTreeMap<String, SrsCardState>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            profile: Profile::default(),
            ui: UiState::default(),
            progress: Progress::default(),
            srs: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    Slow,
    #[default]
    Normal,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLang {
    #[default]
    De,
    En,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub level: Level,
    pub audio_mode: AudioMode,
    pub ui_lang: UiLang,
    /// Exam preparation mode.
    pub exam: bool,
    /// When false, nothing is kept in local storage.
    pub allow_offline: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            level: Level::A1,
            audio_mode: AudioMode::Normal,
            ui_lang: UiLang::De,
            exam: true,
            allow_offline: true,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub tab: Tab,
    pub route: RouteKind,
    /// The level currently being browsed.
    pub level: Level,
    pub payload: Option<RoutePayload>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    /// A set of lesson ids. Presence means completed; values are always true.
    pub completed_lessons: BTreeMap<String, bool>,
}

impl Progress {
    pub fn is_complete(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains_key(lesson_id)
    }

    /// Returns true if the lesson was not already complete.
    pub fn mark_complete(&mut self, lesson_id: &str) -> bool {
        self.completed_lessons
            .insert(lesson_id.to_string(), true)
            .is_none()
    }

    #[cfg(test)]
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }
}

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

use crate::router::Route;
use crate::router::Tab;
use crate::srs::schedule;
use crate::state::AppState;
use crate::state::AudioMode;
use crate::state::UiLang;
use crate::state::persist;
use crate::state::storage::Storage;
use crate::types::card_state::SrsCardState;
use crate::types::level::Level;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// Owns the application state. Every mutation is persisted before the
/// method returns.
pub struct StateManager {
    state: AppState,
    storage: Box<dyn Storage>,
}

impl StateManager {
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let state = persist::load(storage.as_ref());
        Self { state, storage }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Persist the current state. Failures are logged and otherwise
    /// ignored: the in-memory state stays authoritative.
    pub fn save(&mut self) {
        match persist::save(self.storage.as_mut(), &self.state) {
            Ok(()) => log::debug!("State saved."),
            Err(e) => log::warn!("Failed to save state: {e}"),
        }
    }

    fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut AppState),
    {
        f(&mut self.state);
        self.save();
    }

    pub fn navigate(&mut self, route: &Route) {
        log::debug!("Navigating to {}.", route.kind().as_str());
        self.update(|state| {
            state.ui.route = route.kind();
            state.ui.payload = route.payload();
        });
    }

    /// Set the active tab. The route is left alone.
    pub fn set_tab(&mut self, tab: Tab) {
        self.update(|state| state.ui.tab = tab);
    }

    pub fn browse_level(&mut self, level: Level) {
        log::debug!("Browsing level {level}.");
        self.update(|state| state.ui.level = level);
    }

    /// Set the learner's level, and browse it.
    pub fn set_level(&mut self, level: Level) {
        log::debug!("Level set to {level}.");
        self.update(|state| {
            state.profile.level = level;
            state.ui.level = level;
        });
    }

    pub fn set_audio_mode(&mut self, audio_mode: AudioMode) {
        self.update(|state| state.profile.audio_mode = audio_mode);
    }

    pub fn set_ui_lang(&mut self, ui_lang: UiLang) {
        self.update(|state| state.profile.ui_lang = ui_lang);
    }

    pub fn set_exam(&mut self, exam: bool) {
        self.update(|state| state.profile.exam = exam);
    }

    pub fn set_allow_offline(&mut self, allow: bool) {
        self.update(|state| state.profile.allow_offline = allow);
    }

    /// Returns true if the lesson was not already complete.
    pub fn mark_lesson_complete(&mut self, lesson_id: &str) -> bool {
        let added = self.state.progress.mark_complete(lesson_id);
        if added {
            log::debug!("Lesson {lesson_id} completed.");
            self.save();
        }
        added
    }

    pub fn grade_card(&mut self, card_id: &str, quality: Quality, now: Timestamp) -> SrsCardState {
        let next = schedule(self.state.srs.get(card_id), quality, now);
        log::debug!(
            "{card_id} {} ease={:.2} lapses={} due={}",
            quality.as_str(),
            next.ease,
            next.lapses,
            next.due
        );
        self.update(|state| {
            state.srs.insert(card_id.to_string(), next);
        });
        next
    }

    /// Discard all progress and settings.
    pub fn reset(&mut self) {
        log::debug!("Resetting state.");
        self.update(|state| *state = AppState::default());
    }

    #[cfg(test)]
    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }
}

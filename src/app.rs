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

//! Glue between the curriculum, the state manager, and review sessions.
//!
//! [`App::screen`] is the render contract: it resolves the active route
//! into a [`Screen`] that a renderer turns into markup.

use crate::curriculum::Curriculum;
use crate::curriculum::Lesson;
use crate::curriculum::Unit;
use crate::curriculum::VocabItem;
use crate::curriculum::lookup::GrammarTopic;
use crate::curriculum::lookup::collect_grammar_topics;
use crate::curriculum::lookup::find_lesson_by_id;
use crate::curriculum::lookup::next_lesson;
use crate::curriculum::lookup::search_topics;
use crate::router::Route;
use crate::router::RouteError;
use crate::router::Tab;
use crate::srs::session::ReviewMode;
use crate::srs::session::ReviewSession;
use crate::srs::session::select_candidates;
use crate::state::AppState;
use crate::state::AudioMode;
use crate::state::Profile;
use crate::state::Progress;
use crate::state::UiLang;
use crate::state::manager::StateManager;
use crate::state::storage::Storage;
use crate::types::card_state::SrsCardState;
use crate::types::level::Level;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// A one-shot message shown on the next render of the vocab screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Notice {
    NothingToReview(ReviewMode),
    SessionEnded { reviewed: usize },
}

pub struct App {
    curriculum: Curriculum,
    manager: StateManager,
    session: Option<ReviewSession>,
    notice: Option<Notice>,
}

pub enum Screen<'a> {
    Home {
        level: Level,
        next_lesson: Option<&'a Lesson>,
        completed: usize,
        total: usize,
        due_cards: usize,
    },
    Lessons {
        level: Level,
        units: &'a [Unit],
        progress: &'a Progress,
    },
    Lesson {
        lesson: &'a Lesson,
        completed: bool,
    },
    /// The lesson route pointed at an unknown lesson, or had no id.
    LessonNotFound { id: Option<String> },
    Vocab {
        level: Level,
        cards: Vec<VocabCard<'a>>,
        notice: Option<Notice>,
    },
    Review {
        item: &'a VocabItem,
        revealed: bool,
        position: usize,
        card_count: usize,
        reviewed: usize,
        mode: ReviewMode,
    },
    Grammar {
        query: String,
        topics: Vec<GrammarTopic<'a>>,
    },
    Settings {
        profile: &'a Profile,
    },
}

pub struct VocabCard<'a> {
    pub item: &'a VocabItem,
    pub state: Option<&'a SrsCardState>,
}

impl App {
    pub fn new(curriculum: Curriculum, storage: Box<dyn Storage>) -> Self {
        let manager = StateManager::load(storage);
        Self {
            curriculum,
            manager,
            session: None,
            notice: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.manager.state()
    }

    #[cfg(test)]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// The persisted route. A lesson route without an id is an error.
    pub fn route(&self) -> Result<Route, RouteError> {
        Route::from_ui(&self.state().ui)
    }

    /// Navigating anywhere but the vocab screen ends the review session.
    pub fn navigate(&mut self, route: Route) {
        if route != Route::Vocab {
            self.session = None;
        }
        self.notice = None;
        self.manager.navigate(&route);
    }

    /// Activate a tab and show its default route.
    pub fn select_tab(&mut self, tab: Tab) {
        self.manager.set_tab(tab);
        self.navigate(tab.default_route());
    }

    pub fn browse_level(&mut self, level: Level) {
        self.session = None;
        self.notice = None;
        self.manager.browse_level(level);
    }

    pub fn set_level(&mut self, level: Level) {
        self.session = None;
        self.notice = None;
        self.manager.set_level(level);
    }

    pub fn open_lesson(&mut self, id: &str) {
        self.navigate(Route::Lesson { id: id.to_string() });
    }

    /// Mark a lesson as done. Unknown ids are ignored.
    pub fn complete_lesson(&mut self, id: &str) -> bool {
        if find_lesson_by_id(&self.curriculum, id).is_none() {
            log::warn!("Ignoring completion of unknown lesson {id}.");
            return false;
        }
        self.manager.mark_lesson_complete(id)
    }

    pub fn next_lesson(&self) -> Option<&Lesson> {
        next_lesson(&self.curriculum, self.state())
    }

    /// Open the next unfinished lesson of the browsed level, or the lesson
    /// list if every lesson is done.
    pub fn continue_learning(&mut self) {
        let route = match self.next_lesson() {
            Some(lesson) => Route::Lesson {
                id: lesson.id.clone(),
            },
            None => Route::Lessons,
        };
        self.manager.set_tab(Tab::Lessons);
        self.navigate(route);
    }

    /// Start a review session over the browsed level's vocabulary. Returns
    /// false if there is nothing to review.
    pub fn start_review(&mut self, mode: ReviewMode, now: Timestamp) -> bool {
        let level = self.state().ui.level;
        let ids = self.curriculum.vocabulary(level).map(|item| item.id.as_str());
        self.session = ReviewSession::start(mode, ids, &self.manager.state().srs, now);
        match &self.session {
            Some(session) => {
                log::debug!(
                    "Review session started: mode={} cards={}",
                    mode.as_str(),
                    session.card_count()
                );
                self.notice = None;
                true
            }
            None => {
                self.notice = Some(Notice::NothingToReview(mode));
                false
            }
        }
    }

    pub fn reveal(&mut self) {
        if let Some(session) = &mut self.session {
            session.reveal();
        }
    }

    /// Grade the current card. Only a revealed card can be graded.
    pub fn grade(&mut self, quality: Quality, now: Timestamp) -> Option<SrsCardState> {
        let session = self.session.as_mut()?;
        if !session.is_revealed() {
            log::error!("Grading a card that is not revealed.");
            return None;
        }
        let next = self.manager.grade_card(session.current(), quality, now);
        session.advance();
        Some(next)
    }

    pub fn end_review(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Review session ended after {} reviews.", session.reviewed());
            self.notice = Some(Notice::SessionEnded {
                reviewed: session.reviewed(),
            });
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    pub fn set_audio_mode(&mut self, audio_mode: AudioMode) {
        self.manager.set_audio_mode(audio_mode);
    }

    pub fn set_ui_lang(&mut self, ui_lang: UiLang) {
        self.manager.set_ui_lang(ui_lang);
    }

    pub fn set_exam(&mut self, exam: bool) {
        self.manager.set_exam(exam);
    }

    pub fn set_allow_offline(&mut self, allow: bool) {
        self.manager.set_allow_offline(allow);
    }

    pub fn reset(&mut self) {
        self.session = None;
        self.notice = None;
        self.manager.reset();
    }

    /// Resolve the active route into what should be shown.
    pub fn screen(&self, query: Option<&str>, now: Timestamp) -> Screen<'_> {
        let state = self.state();
        let level = state.ui.level;
        let route = match self.route() {
            Ok(route) => route,
            Err(e) => {
                log::warn!("Unusable route: {e}");
                return Screen::LessonNotFound { id: None };
            }
        };
        match route {
            Route::Home => {
                let ids = self.curriculum.vocabulary(level).map(|item| item.id.as_str());
                Screen::Home {
                    level,
                    next_lesson: self.next_lesson(),
                    completed: self
                        .curriculum
                        .lessons(level)
                        .filter(|lesson| state.progress.is_complete(&lesson.id))
                        .count(),
                    total: self.curriculum.lessons(level).count(),
                    due_cards: select_candidates(ids, &state.srs, ReviewMode::Due, now).len(),
                }
            }
            Route::Lessons => Screen::Lessons {
                level,
                units: self.curriculum.units(level),
                progress: &state.progress,
            },
            Route::Lesson { id } => match find_lesson_by_id(&self.curriculum, &id) {
                Some(lesson) => Screen::Lesson {
                    lesson,
                    completed: state.progress.is_complete(&lesson.id),
                },
                None => Screen::LessonNotFound { id: Some(id) },
            },
            Route::Vocab => {
                let review = self.session.as_ref().and_then(|session| {
                    self.curriculum
                        .find_vocab(session.current())
                        .map(|item| (session, item))
                });
                match review {
                    Some((session, item)) => Screen::Review {
                        item,
                        revealed: session.is_revealed(),
                        position: session.position(),
                        card_count: session.card_count(),
                        reviewed: session.reviewed(),
                        mode: session.mode(),
                    },
                    None => Screen::Vocab {
                        level,
                        cards: self
                            .curriculum
                            .vocabulary(level)
                            .map(|item| VocabCard {
                                item,
                                state: state.srs.get(&item.id),
                            })
                            .collect(),
                        notice: self.notice,
                    },
                }
            }
            Route::Grammar => {
                let query = query.unwrap_or_default().to_string();
                let topics = search_topics(collect_grammar_topics(&self.curriculum), &query);
                Screen::Grammar { query, topics }
            }
            Route::Settings => Screen::Settings {
                profile: &state.profile,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::router::RouteKind;
    use crate::router::RoutePayload;
    use crate::state::storage::MemoryStorage;

    fn app() -> Fallible<App> {
        Ok(App::new(
            Curriculum::bundled()?,
            Box::new(MemoryStorage::new()),
        ))
    }

    #[test]
    fn test_initial_screen_is_home() -> Fallible<()> {
        let app = app()?;
        match app.screen(None, Timestamp::now()) {
            Screen::Home {
                level,
                next_lesson,
                completed,
                total,
                due_cards,
            } => {
                assert_eq!(level, Level::A1);
                assert_eq!(next_lesson.map(|l| l.id.as_str()), Some("a1-u1-l1"));
                assert_eq!(completed, 0);
                assert_eq!(total, 3);
                // New cards count as due.
                assert_eq!(due_cards, app.curriculum().vocabulary(Level::A1).count());
            }
            _ => panic!("expected the home screen"),
        }
        Ok(())
    }

    #[test]
    fn test_select_tab_navigates() -> Fallible<()> {
        let mut app = app()?;
        app.select_tab(Tab::Grammar);
        assert_eq!(app.state().ui.tab, Tab::Grammar);
        assert_eq!(app.state().ui.route, RouteKind::Grammar);
        Ok(())
    }

    #[test]
    fn test_open_unknown_lesson() -> Fallible<()> {
        let mut app = app()?;
        app.open_lesson("nope");
        match app.screen(None, Timestamp::now()) {
            Screen::LessonNotFound { id } => assert_eq!(id.as_deref(), Some("nope")),
            _ => panic!("expected not found"),
        }
        Ok(())
    }

    #[test]
    fn test_lesson_route_without_id() -> Fallible<()> {
        let raw = r#"{"version": 1, "ui": {"route": "lesson", "payload": {}}}"#;
        let storage = MemoryStorage::with_entry(crate::state::persist::STORAGE_KEY, raw);
        let app = App::new(Curriculum::bundled()?, Box::new(storage));
        assert_eq!(app.state().ui.payload, Some(RoutePayload { id: None }));
        match app.screen(None, Timestamp::now()) {
            Screen::LessonNotFound { id } => assert_eq!(id, None),
            _ => panic!("expected not found"),
        }
        Ok(())
    }

    #[test]
    fn test_continue_learning() -> Fallible<()> {
        let mut app = app()?;
        app.continue_learning();
        assert_eq!(app.state().ui.tab, Tab::Lessons);
        assert_eq!(
            app.route(),
            Ok(Route::Lesson {
                id: "a1-u1-l1".to_string()
            })
        );
        assert!(app.complete_lesson("a1-u1-l1"));
        assert!(app.complete_lesson("a1-u1-l2"));
        assert!(app.complete_lesson("a1-u2-l1"));
        assert!(app.next_lesson().is_none());
        app.continue_learning();
        assert_eq!(app.route(), Ok(Route::Lessons));
        Ok(())
    }

    #[test]
    fn test_complete_unknown_lesson() -> Fallible<()> {
        let mut app = app()?;
        assert!(!app.complete_lesson("nope"));
        assert_eq!(app.state().progress.completed_count(), 0);
        Ok(())
    }

    #[test]
    fn test_review_flow() -> Fallible<()> {
        let mut app = app()?;
        let now = Timestamp::from_millis(1_700_000_000_000);
        app.browse_level(Level::A2);
        app.select_tab(Tab::Vocab);
        assert!(app.start_review(ReviewMode::New, now));
        let count = app.curriculum().vocabulary(Level::A2).count();
        assert_eq!(app.session().map(|s| s.card_count()), Some(count));

        // Grading an unrevealed card does nothing.
        assert!(app.grade(Quality::Easy, now).is_none());

        let first = app.session().map(|s| s.current().to_string()).unwrap();
        app.reveal();
        let graded = app.grade(Quality::Again, now).unwrap();
        assert_eq!(graded.lapses, 1);
        assert_eq!(app.state().srs.get(&first), Some(&graded));

        match app.screen(None, now) {
            Screen::Review {
                revealed, reviewed, ..
            } => {
                assert!(!revealed);
                assert_eq!(reviewed, 1);
            }
            _ => panic!("expected the review screen"),
        }

        app.end_review();
        match app.screen(None, now) {
            Screen::Vocab { notice, .. } => {
                assert_eq!(notice, Some(Notice::SessionEnded { reviewed: 1 }));
            }
            _ => panic!("expected the vocab screen"),
        }
        Ok(())
    }

    #[test]
    fn test_nothing_to_review() -> Fallible<()> {
        let mut app = app()?;
        app.browse_level(Level::C1);
        app.select_tab(Tab::Vocab);
        assert!(!app.start_review(ReviewMode::All, Timestamp::now()));
        match app.screen(None, Timestamp::now()) {
            Screen::Vocab { notice, cards, .. } => {
                assert!(cards.is_empty());
                assert_eq!(notice, Some(Notice::NothingToReview(ReviewMode::All)));
            }
            _ => panic!("expected the vocab screen"),
        }

        // The notice belongs to the level it was raised on.
        app.browse_level(Level::A1);
        match app.screen(None, Timestamp::now()) {
            Screen::Vocab { notice, cards, .. } => {
                assert!(!cards.is_empty());
                assert_eq!(notice, None);
            }
            _ => panic!("expected the vocab screen"),
        }

        app.set_level(Level::C1);
        assert!(!app.start_review(ReviewMode::All, Timestamp::now()));
        app.set_level(Level::B2);
        match app.screen(None, Timestamp::now()) {
            Screen::Vocab { notice, .. } => assert_eq!(notice, None),
            _ => panic!("expected the vocab screen"),
        }
        Ok(())
    }

    #[test]
    fn test_navigating_away_ends_session() -> Fallible<()> {
        let mut app = app()?;
        app.select_tab(Tab::Vocab);
        assert!(app.start_review(ReviewMode::All, Timestamp::now()));
        app.select_tab(Tab::Home);
        assert!(app.session().is_none());
        Ok(())
    }

    #[test]
    fn test_grammar_search() -> Fallible<()> {
        let mut app = app()?;
        app.select_tab(Tab::Grammar);
        match app.screen(Some("präteritum"), Timestamp::now()) {
            Screen::Grammar { query, topics } => {
                assert_eq!(query, "präteritum");
                assert_eq!(topics.len(), 1);
                assert_eq!(topics[0].lesson_id, "a2-u1-l1");
            }
            _ => panic!("expected the grammar screen"),
        }
        Ok(())
    }
}

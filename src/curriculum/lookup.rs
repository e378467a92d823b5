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

use crate::curriculum::Curriculum;
use crate::curriculum::Example;
use crate::curriculum::Lesson;
use crate::state::AppState;

/// A lesson's entry in the grammar overview.
#[derive(Clone, Debug, PartialEq)]
pub struct GrammarTopic<'a> {
    pub title: &'a str,
    pub first_example: Option<&'a Example>,
    pub lesson_id: &'a str,
}

/// Find a lesson by id, across all levels and units.
pub fn find_lesson_by_id<'a>(curriculum: &'a Curriculum, id: &str) -> Option<&'a Lesson> {
    curriculum.all_lessons().find(|lesson| lesson.id == id)
}

/// One topic per lesson, in curriculum order.
pub fn collect_grammar_topics(curriculum: &Curriculum) -> Vec<GrammarTopic<'_>> {
    curriculum
        .all_lessons()
        .map(|lesson| GrammarTopic {
            title: &lesson.title,
            first_example: lesson.examples.first(),
            lesson_id: &lesson.id,
        })
        .collect()
}

/// Case-insensitive substring search on topic titles. A blank query
/// matches everything.
pub fn search_topics<'a>(topics: Vec<GrammarTopic<'a>>, query: &str) -> Vec<GrammarTopic<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return topics;
    }
    topics
        .into_iter()
        .filter(|topic| topic.title.to_lowercase().contains(&query))
        .collect()
}

/// The first lesson of the browsed level that is not yet complete.
pub fn next_lesson<'a>(curriculum: &'a Curriculum, state: &AppState) -> Option<&'a Lesson> {
    curriculum
        .lessons(state.ui.level)
        .find(|lesson| !state.progress.is_complete(&lesson.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::level::Level;

    #[test]
    fn test_find_every_lesson() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        for level in curriculum.levels() {
            for unit in &level.units {
                for lesson in &unit.lessons {
                    let found = find_lesson_by_id(&curriculum, &lesson.id);
                    assert_eq!(found.map(|l| l.title.as_str()), Some(lesson.title.as_str()));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_find_missing_lesson() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        assert!(find_lesson_by_id(&curriculum, "z9-u1-l1").is_none());
        assert!(find_lesson_by_id(&curriculum, "").is_none());
        // Unit ids are not lesson ids.
        assert!(find_lesson_by_id(&curriculum, "a1-u1").is_none());
        Ok(())
    }

    #[test]
    fn test_collect_grammar_topics() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let topics = collect_grammar_topics(&curriculum);
        assert_eq!(topics.len(), curriculum.all_lessons().count());
        let first = &topics[0];
        assert_eq!(first.lesson_id, "a1-u1-l1");
        assert_eq!(
            first.first_example.map(|e| e.hu.as_str()),
            Some("Szia! Jó napot!")
        );
        Ok(())
    }

    #[test]
    fn test_search_topics() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let topics = collect_grammar_topics(&curriculum);
        let found = search_topics(topics.clone(), "VOKALHARMONIE");
        let ids: Vec<&str> = found.iter().map(|t| t.lesson_id).collect();
        assert_eq!(ids, vec!["a1-u2-l1", "b2-u1-l1"]);
        assert_eq!(search_topics(topics.clone(), "  ").len(), topics.len());
        assert!(search_topics(topics, "xyzzy").is_empty());
        Ok(())
    }

    #[test]
    fn test_search_matches_title_only() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let topics = collect_grammar_topics(&curriculum);
        // Appears in an example sentence, not in any title.
        assert!(search_topics(topics, "Szia").is_empty());
        Ok(())
    }

    #[test]
    fn test_next_lesson_exhausts_level() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let mut state = AppState::default();
        state.ui.level = Level::A1;
        let total = curriculum.lessons(Level::A1).count();
        let mut completions = 0;
        while let Some(lesson) = next_lesson(&curriculum, &state) {
            let expected = curriculum
                .lessons(Level::A1)
                .find(|l| !state.progress.is_complete(&l.id))
                .map(|l| l.id.clone());
            assert_eq!(Some(lesson.id.clone()), expected);
            let id = lesson.id.clone();
            state.progress.mark_complete(&id);
            completions += 1;
        }
        assert_eq!(completions, total);
        Ok(())
    }

    #[test]
    fn test_next_lesson_skips_completed() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let mut state = AppState::default();
        state.progress.mark_complete("a1-u1-l1");
        let next = next_lesson(&curriculum, &state).map(|l| l.id.as_str());
        assert_eq!(next, Some("a1-u1-l2"));
        // Completions in other levels do not matter.
        state.ui.level = Level::B2;
        let next = next_lesson(&curriculum, &state).map(|l| l.id.as_str());
        assert_eq!(next, Some("b2-u1-l1"));
        Ok(())
    }

    #[test]
    fn test_next_lesson_on_empty_level() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let mut state = AppState::default();
        state.ui.level = Level::C2;
        assert!(next_lesson(&curriculum, &state).is_none());
        Ok(())
    }
}

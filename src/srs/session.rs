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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::types::card_state::SrsCardState;
use crate::types::timestamp::Timestamp;

/// Which cards a review session draws from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Cards whose due time has passed.
    Due,
    /// Cards that have never been reviewed.
    New,
    /// Every known card.
    All,
}

impl ReviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewMode::Due => "due",
            ReviewMode::New => "new",
            ReviewMode::All => "all",
        }
    }

    fn accepts(self, state: Option<&SrsCardState>, now: Timestamp) -> bool {
        let due = state.map(|s| s.due).unwrap_or(Timestamp::NEVER);
        match self {
            ReviewMode::Due => due <= now,
            ReviewMode::New => due.is_never(),
            ReviewMode::All => true,
        }
    }
}

/// Filter `ids` down to the cards eligible under `mode`, keeping their order.
///
/// Cards with no entry in `srs` are treated as new. A new card has a due time
/// of zero, so it is also eligible under [`ReviewMode::Due`].
pub fn select_candidates<'a, I>(
    ids: I,
    srs: &BTreeMap<String, SrsCardState>,
    mode: ReviewMode,
    now: Timestamp,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter(|id| mode.accepts(srs.get(*id), now))
        .map(|id| id.to_string())
        .collect()
}

/// An in-progress review session. Cards are presented cyclically in the
/// order they were selected; the session only ends when the user ends it.
#[derive(Clone, Debug)]
pub struct ReviewSession {
    mode: ReviewMode,
    cards: Vec<String>,
    position: usize,
    reveal: bool,
    reviewed: usize,
}

impl ReviewSession {
    /// Start a session, or return `None` if there is nothing to review.
    pub fn start<'a, I>(
        mode: ReviewMode,
        ids: I,
        srs: &BTreeMap<String, SrsCardState>,
        now: Timestamp,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cards = select_candidates(ids, srs, mode, now);
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            mode,
            cards,
            position: 0,
            reveal: false,
            reviewed: 0,
        })
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn current(&self) -> &str {
        &self.cards[self.position]
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal
    }

    pub fn reveal(&mut self) {
        self.reveal = true;
    }

    /// The number of gradings made in this session.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// One-based position of the current card within the cycle.
    pub fn position(&self) -> usize {
        self.position + 1
    }

    /// Move past the current card after it was graded, wrapping around at
    /// the end of the cycle.
    pub fn advance(&mut self) {
        self.position = (self.position + 1) % self.cards.len();
        self.reveal = false;
        self.reviewed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn state(due: i64) -> SrsCardState {
        SrsCardState {
            due: Timestamp::from_millis(due),
            ..SrsCardState::default()
        }
    }

    /// Two overdue cards, two never-reviewed cards (one with explicit zero
    /// state, one without any state), and two cards due in the future.
    fn fixture() -> (Vec<&'static str>, BTreeMap<String, SrsCardState>) {
        let ids = vec!["past1", "new1", "future1", "past2", "new2", "future2"];
        let mut srs = BTreeMap::new();
        srs.insert("past1".to_string(), state(NOW - 1));
        srs.insert("past2".to_string(), state(NOW));
        srs.insert("new1".to_string(), state(0));
        srs.insert("future1".to_string(), state(NOW + 1));
        srs.insert("future2".to_string(), state(NOW + 86_400_000));
        (ids, srs)
    }

    #[test]
    fn test_select_due() {
        let (ids, srs) = fixture();
        let now = Timestamp::from_millis(NOW);
        let selected = select_candidates(ids, &srs, ReviewMode::Due, now);
        assert_eq!(selected, vec!["past1", "new1", "past2", "new2"]);
    }

    #[test]
    fn test_select_new() {
        let (ids, srs) = fixture();
        let now = Timestamp::from_millis(NOW);
        let selected = select_candidates(ids, &srs, ReviewMode::New, now);
        assert_eq!(selected, vec!["new1", "new2"]);
    }

    #[test]
    fn test_select_all() {
        let (ids, srs) = fixture();
        let now = Timestamp::from_millis(NOW);
        let selected = select_candidates(ids.clone(), &srs, ReviewMode::All, now);
        assert_eq!(selected, ids);
    }

    #[test]
    fn test_nothing_to_review() {
        let mut srs = BTreeMap::new();
        srs.insert("a".to_string(), state(NOW + 1));
        let now = Timestamp::from_millis(NOW);
        assert!(ReviewSession::start(ReviewMode::Due, ["a"], &srs, now).is_none());
        assert!(ReviewSession::start(ReviewMode::New, ["a"], &srs, now).is_none());
        assert!(ReviewSession::start(ReviewMode::All, Vec::<&str>::new(), &srs, now).is_none());
    }

    #[test]
    fn test_session_cycles() {
        let srs = BTreeMap::new();
        let now = Timestamp::from_millis(NOW);
        let mut session = ReviewSession::start(ReviewMode::New, ["a", "b", "c"], &srs, now).unwrap();
        assert_eq!(session.current(), "a");
        session.reveal();
        assert!(session.is_revealed());
        session.advance();
        assert!(!session.is_revealed());
        assert_eq!(session.current(), "b");
        session.advance();
        assert_eq!(session.current(), "c");
        session.advance();
        assert_eq!(session.current(), "a");
        assert_eq!(session.position(), 1);
        assert_eq!(session.reviewed(), 3);
        assert_eq!(session.card_count(), 3);
    }
}

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

pub mod session;

use chrono::Duration;

use crate::types::card_state::MAX_EASE;
use crate::types::card_state::MIN_EASE;
use crate::types::card_state::SrsCardState;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// Compute a card's next review state.
///
/// Cards without prior state start from [`SrsCardState::default`]. The ease
/// factor is tracked and clamped, but the intervals are currently fixed per
/// quality.
pub fn schedule(current: Option<&SrsCardState>, quality: Quality, now: Timestamp) -> SrsCardState {
    let current = current.copied().unwrap_or_default();
    let ease = (current.ease + ease_delta(quality)).clamp(MIN_EASE, MAX_EASE);
    let lapses = match quality {
        Quality::Again => current.lapses + 1,
        Quality::Hard | Quality::Easy => current.lapses,
    };
    SrsCardState {
        ease,
        due: now + interval(quality),
        lapses,
    }
}

fn ease_delta(quality: Quality) -> f64 {
    match quality {
        Quality::Again => -0.2,
        Quality::Hard => -0.05,
        Quality::Easy => 0.1,
    }
}

fn interval(quality: Quality) -> Duration {
    match quality {
        Quality::Again => Duration::minutes(10),
        Quality::Hard => Duration::hours(24),
        Quality::Easy => Duration::hours(72),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn card(ease: f64) -> SrsCardState {
        SrsCardState {
            ease,
            due: Timestamp::NEVER,
            lapses: 0,
        }
    }

    #[test]
    fn test_again_from_initial() {
        let now = Timestamp::from_millis(1_700_000_000_000);
        let next = schedule(Some(&card(2.0)), Quality::Again, now);
        assert!((next.ease - 1.8).abs() < EPSILON);
        assert_eq!(next.due.as_millis(), now.as_millis() + 600_000);
        assert_eq!(next.lapses, 1);
    }

    #[test]
    fn test_hard_and_easy_offsets() {
        let now = Timestamp::from_millis(1_000);
        let hard = schedule(None, Quality::Hard, now);
        assert!((hard.ease - 1.95).abs() < EPSILON);
        assert_eq!(hard.due.as_millis(), 1_000 + 24 * 3_600_000);
        assert_eq!(hard.lapses, 0);
        let easy = schedule(None, Quality::Easy, now);
        assert!((easy.ease - 2.1).abs() < EPSILON);
        assert_eq!(easy.due.as_millis(), 1_000 + 72 * 3_600_000);
        assert_eq!(easy.lapses, 0);
    }

    #[test]
    fn test_lower_clamp() {
        let next = schedule(Some(&card(1.3)), Quality::Again, Timestamp::now());
        assert_eq!(next.ease, MIN_EASE);
    }

    #[test]
    fn test_upper_clamp() {
        let next = schedule(Some(&card(2.7)), Quality::Easy, Timestamp::now());
        assert_eq!(next.ease, MAX_EASE);
    }

    #[test]
    fn test_ease_stays_in_bounds() {
        let now = Timestamp::now();
        for quality in [Quality::Again, Quality::Hard, Quality::Easy] {
            let mut ease = MIN_EASE;
            while ease <= MAX_EASE {
                let next = schedule(Some(&card(ease)), quality, now);
                assert!(next.ease >= MIN_EASE && next.ease <= MAX_EASE);
                ease += 0.05;
            }
        }
    }

    #[test]
    fn test_repeated_drift_is_bounded() {
        let now = Timestamp::now();
        let mut state = SrsCardState::default();
        for _ in 0..50 {
            state = schedule(Some(&state), Quality::Again, now);
        }
        assert_eq!(state.ease, MIN_EASE);
        assert_eq!(state.lapses, 50);
        for _ in 0..50 {
            state = schedule(Some(&state), Quality::Easy, now);
        }
        assert_eq!(state.ease, MAX_EASE);
        assert_eq!(state.lapses, 50);
    }
}

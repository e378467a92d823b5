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

use serde::Deserialize;
use serde::Serialize;

use crate::types::timestamp::Timestamp;

/// The lower bound of the ease factor.
pub const MIN_EASE: f64 = 1.3;

/// The upper bound of the ease factor.
pub const MAX_EASE: f64 = 2.7;

/// The ease factor of a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.0;

/// Review state of a single vocabulary card.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsCardState {
    /// Always within `[MIN_EASE, MAX_EASE]`.
    pub ease: f64,
    /// When the card is next due. `Timestamp::NEVER` means the card is new.
    pub due: Timestamp,
    /// How many times the card was graded `again`.
    pub lapses: u32,
}

impl SrsCardState {
    pub fn is_new(&self) -> bool {
        self.due.is_never()
    }
}

impl Default for SrsCardState {
    fn default() -> Self {
        Self {
            ease: INITIAL_EASE,
            due: Timestamp::NEVER,
            lapses: 0,
        }
    }
}

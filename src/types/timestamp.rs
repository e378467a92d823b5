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

use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Add;

use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Milliseconds since the Unix epoch. Zero is reserved for "never".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const NEVER: Timestamp = Timestamp(0);

    #[cfg(test)]
    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[cfg(test)]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    pub fn is_never(self) -> bool {
        self.0 == 0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0 + rhs.num_milliseconds())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(ts) => {
                let local = ts.with_timezone(&Local);
                write!(f, "{}", local.format("%Y-%m-%d %H:%M"))
            }
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_duration() {
        let ts = Timestamp::from_millis(1_000);
        assert_eq!((ts + Duration::minutes(10)).as_millis(), 601_000);
    }

    #[test]
    fn test_never() {
        assert!(Timestamp::NEVER.is_never());
        assert!(Timestamp::default().is_never());
        assert!(!Timestamp::now().is_never());
    }

    #[test]
    fn test_serialized_as_number() {
        let json = serde_json::to_string(&Timestamp::from_millis(42)).unwrap();
        assert_eq!(json, "42");
    }
}

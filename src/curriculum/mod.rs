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

//! The static course content: levels, units, lessons, and vocabulary.

pub mod lookup;

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::level::Level;

const BUNDLED: &str = include_str!("curriculum.toml");

#[derive(Clone, Debug, Deserialize)]
pub struct Curriculum {
    #[serde(default)]
    levels: Vec<LevelContent>,
    #[serde(default)]
    vocabulary: Vec<VocabItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LevelContent {
    pub level: Level,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lesson {
    /// Unique across the whole curriculum.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tag: String,
    /// Grammar point descriptions. May contain inline Markdown.
    #[serde(default)]
    pub grammar: Vec<String>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub objectives: Vec<String>,
}

/// A Hungarian sentence and its translation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Example {
    pub hu: String,
    pub de: String,
}

/// A vocabulary item. Its id doubles as the id of its review card.
#[derive(Clone, Debug, Deserialize)]
pub struct VocabItem {
    pub id: String,
    pub level: Level,
    pub hu: String,
    pub de: String,
}

impl Curriculum {
    /// The curriculum compiled into the binary.
    pub fn bundled() -> Fallible<Self> {
        Self::parse(BUNDLED)
    }

    pub fn from_file(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return fail("curriculum file does not exist.");
        }
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a curriculum.
    pub fn parse(content: &str) -> Fallible<Self> {
        let curriculum: Curriculum = toml::from_str(content)?;
        curriculum.validate()?;
        log::debug!(
            "Loaded curriculum with {} lessons and {} vocabulary items.",
            curriculum.all_lessons().count(),
            curriculum.vocabulary.len()
        );
        Ok(curriculum)
    }

    /// Reject duplicate lesson and vocabulary ids.
    fn validate(&self) -> Fallible<()> {
        let mut seen = HashSet::new();
        for lesson in self.all_lessons() {
            if !seen.insert(lesson.id.as_str()) {
                return fail(&format!("duplicate lesson id: {}", lesson.id));
            }
        }
        let mut seen = HashSet::new();
        for item in &self.vocabulary {
            if !seen.insert(item.id.as_str()) {
                return fail(&format!("duplicate vocabulary id: {}", item.id));
            }
        }
        Ok(())
    }

    pub fn levels(&self) -> &[LevelContent] {
        &self.levels
    }

    pub fn units(&self, level: Level) -> &[Unit] {
        self.levels
            .iter()
            .find(|content| content.level == level)
            .map(|content| content.units.as_slice())
            .unwrap_or_default()
    }

    /// The lessons of a level, in curriculum order.
    pub fn lessons(&self, level: Level) -> impl Iterator<Item = &Lesson> {
        self.units(level).iter().flat_map(|unit| unit.lessons.iter())
    }

    pub fn all_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.levels
            .iter()
            .flat_map(|content| content.units.iter())
            .flat_map(|unit| unit.lessons.iter())
    }

    pub fn vocabulary(&self, level: Level) -> impl Iterator<Item = &VocabItem> {
        self.vocabulary.iter().filter(move |item| item.level == level)
    }

    pub fn all_vocabulary(&self) -> &[VocabItem] {
        &self.vocabulary
    }

    pub fn find_vocab(&self, id: &str) -> Option<&VocabItem> {
        self.vocabulary.iter().find(|item| item.id == id)
    }
}

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

use std::env::current_dir;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::PathBuf;

use clap::ValueEnum;
use maud::html;
use serde::Serialize;

use crate::cmd::serve::server::DB_FILE;
use crate::curriculum::Curriculum;
use crate::error::Fallible;
use crate::error::fail;
use crate::srs::session::ReviewMode;
use crate::srs::session::select_candidates;
use crate::state::AppState;
use crate::state::persist::load;
use crate::state::storage::SqliteStorage;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// HTML output.
    Html,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Html => write!(f, "html"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(
    directory: Option<String>,
    curriculum: Option<PathBuf>,
    format: StatsFormat,
) -> Fallible<()> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let curriculum = match curriculum {
        Some(path) => Curriculum::from_file(&path)?,
        None => Curriculum::bundled()?,
    };
    let db_path = directory.join(DB_FILE);
    let state = if db_path.exists() {
        match SqliteStorage::open(&db_path) {
            Ok(storage) => load(&storage),
            Err(e) => {
                log::warn!("Cannot open {}, reporting defaults: {e}", db_path.display());
                AppState::default()
            }
        }
    } else {
        log::debug!("No storage database, reporting defaults.");
        AppState::default()
    };

    let stats = compute_stats(&curriculum, &state, Timestamp::now());
    match format {
        StatsFormat::Html => {
            let markup = html! {
                table {
                    tr { th { "Level" } th { "Lessons" } th { "Completed" } }
                    @for level in &stats.levels {
                        tr { td { (level.level.as_str()) } td { (level.lessons) } td { (level.completed) } }
                    }
                }
                p { "Cards reviewed: " (stats.cards_known) }
                p { "Cards due: " (stats.cards_due) }
                p { "New cards: " (stats.cards_new) }
                p { "Lapses: " (stats.total_lapses) }
            };
            println!("{}", markup.into_string());
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    levels: Vec<LevelStats>,
    cards_known: usize,
    cards_due: usize,
    cards_new: usize,
    total_lapses: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    level: Level,
    lessons: usize,
    completed: usize,
}

fn compute_stats(curriculum: &Curriculum, state: &AppState, now: Timestamp) -> Stats {
    let levels = curriculum
        .levels()
        .iter()
        .map(|content| LevelStats {
            level: content.level,
            lessons: curriculum.lessons(content.level).count(),
            completed: curriculum
                .lessons(content.level)
                .filter(|lesson| state.progress.is_complete(&lesson.id))
                .count(),
        })
        .collect();
    let ids = || curriculum.all_vocabulary().iter().map(|item| item.id.as_str());
    Stats {
        levels,
        cards_known: state.srs.len(),
        cards_due: select_candidates(ids(), &state.srs, ReviewMode::Due, now).len(),
        cards_new: select_candidates(ids(), &state.srs, ReviewMode::New, now).len(),
        total_lapses: state.srs.values().map(|card| card.lapses).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card_state::SrsCardState;

    #[test]
    fn test_compute_stats() -> Fallible<()> {
        let curriculum = Curriculum::bundled()?;
        let mut state = AppState::default();
        state.progress.mark_complete("a1-u1-l1");
        state.progress.mark_complete("b2-u1-l2");
        let now = Timestamp::from_millis(1_000_000);
        state.srs.insert(
            "a1-szia".to_string(),
            SrsCardState {
                due: Timestamp::from_millis(2_000_000),
                lapses: 2,
                ..SrsCardState::default()
            },
        );
        state.srs.insert(
            "a1-igen".to_string(),
            SrsCardState {
                due: Timestamp::from_millis(500_000),
                lapses: 1,
                ..SrsCardState::default()
            },
        );
        let stats = compute_stats(&curriculum, &state, now);
        let total = curriculum.all_vocabulary().len();
        assert_eq!(stats.cards_known, 2);
        assert_eq!(stats.cards_new, total - 2);
        assert_eq!(stats.cards_due, total - 1);
        assert_eq!(stats.total_lapses, 3);
        let a1 = &stats.levels[0];
        assert_eq!(a1.level, Level::A1);
        assert_eq!((a1.lessons, a1.completed), (3, 1));
        let b2 = &stats.levels[3];
        assert_eq!((b2.lessons, b2.completed), (2, 1));
        Ok(())
    }

    #[test]
    fn test_corrupt_database_reports_defaults() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join(DB_FILE);
        std::fs::write(&db_path, b"this is not a sqlite database")?;
        let directory = dir.path().display().to_string();
        print_stats(Some(directory), None, StatsFormat::Json)?;
        assert_eq!(std::fs::read(&db_path)?, b"this is not a sqlite database");
        Ok(())
    }

    #[test]
    fn test_custom_curriculum() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("custom.toml");
        let content = "[[levels]]\nlevel = \"A1\"\n\n[[levels.units]]\nid = \"u\"\ntitle = \"U\"\n\n[[levels.units.lessons]]\nid = \"custom-l1\"\ntitle = \"Custom\"\n";
        std::fs::write(&path, content)?;

        let mut state = AppState::default();
        state.progress.mark_complete("custom-l1");
        {
            let mut storage = SqliteStorage::open(&dir.path().join(DB_FILE))?;
            crate::state::persist::save(&mut storage, &state)?;
        }
        let curriculum = Curriculum::from_file(&path)?;
        let stats = compute_stats(&curriculum, &state, Timestamp::now());
        assert_eq!(stats.levels.len(), 1);
        assert_eq!((stats.levels[0].lessons, stats.levels[0].completed), (1, 1));

        let directory = dir.path().display().to_string();
        print_stats(Some(directory.clone()), Some(path), StatsFormat::Json)?;
        let missing = dir.path().join("nope.toml");
        assert!(print_stats(Some(directory), Some(missing), StatsFormat::Json).is_err());
        Ok(())
    }

    #[test]
    fn test_non_existent_directory() {
        assert!(print_stats(Some("./derpherp".to_string()), None, StatsFormat::Json).is_err());
    }

    #[test]
    fn test_empty_directory() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let directory = dir.path().display().to_string();
        print_stats(Some(directory.clone()), None, StatsFormat::Json)?;
        print_stats(Some(directory), None, StatsFormat::Html)?;
        assert!(!dir.path().join(DB_FILE).exists());
        Ok(())
    }
}

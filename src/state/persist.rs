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

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::error::Fallible;
use crate::error::fail;
use crate::state::AppState;
use crate::state::storage::Storage;

/// The key the serialized state is stored under.
pub const STORAGE_KEY: &str = "magyarlab-simple-v1";

/// The current version of the stored state's shape.
///
/// Version 0 is the original flat blob (`level`, `tab`, `allowOffline`,
/// `examPrep`), which carried no version field.
pub const SCHEMA_VERSION: u32 = 1;

/// Load the stored state. Never fails: if nothing is stored, or the blob
/// cannot be read, the default state is returned.
pub fn load(storage: &dyn Storage) -> AppState {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::debug!("No stored state, using defaults.");
            return AppState::default();
        }
        Err(e) => {
            log::warn!("Failed to read stored state, using defaults: {e}");
            return AppState::default();
        }
    };
    match decode(&raw) {
        Ok(state) => {
            log::debug!("Loaded stored state (version {}).", state.version);
            state
        }
        Err(e) => {
            log::warn!("Stored state is unreadable, using defaults: {e}");
            AppState::default()
        }
    }
}

/// Serialize and store the full state. If the profile disallows local
/// storage, any stored state is removed instead.
pub fn save(storage: &mut dyn Storage, state: &AppState) -> Fallible<()> {
    if !state.profile.allow_offline {
        return storage.remove(STORAGE_KEY);
    }
    let json = serde_json::to_string(state)?;
    storage.set(STORAGE_KEY, &json)
}

fn decode(raw: &str) -> Fallible<AppState> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(stored) = value else {
        return fail("stored state is not an object.");
    };
    Ok(merge(migrate(stored)))
}

/// Bring a stored blob up to [`SCHEMA_VERSION`]. Blobs from a newer version
/// are left as they are.
fn migrate(mut stored: Map<String, Value>) -> Map<String, Value> {
    let version = match stored.get("version").and_then(Value::as_u64) {
        Some(version) => version,
        None if stored.contains_key("profile") => 1,
        None => 0,
    };
    if version == 0 {
        log::debug!("Migrating stored state from version 0.");
        stored = migrate_flat(stored);
    }
    if version < SCHEMA_VERSION as u64 {
        stored.insert("version".to_string(), Value::from(SCHEMA_VERSION));
    }
    stored
}

fn migrate_flat(flat: Map<String, Value>) -> Map<String, Value> {
    let level = flat
        .get("level")
        .filter(|level| !level.is_null())
        .cloned()
        .unwrap_or_else(|| Value::from("A1"));

    let mut profile = Map::new();
    profile.insert("level".to_string(), level.clone());
    if let Some(exam) = flat.get("examPrep") {
        profile.insert("exam".to_string(), exam.clone());
    }
    if let Some(allow) = flat.get("allowOffline") {
        profile.insert("allowOffline".to_string(), allow.clone());
    }

    let mut ui = Map::new();
    ui.insert("level".to_string(), level);
    if let Some(tab) = flat.get("tab") {
        // The flat layout rendered whatever tab was active.
        ui.insert("tab".to_string(), tab.clone());
        ui.insert("route".to_string(), tab.clone());
    }

    let mut migrated = Map::new();
    migrated.insert("profile".to_string(), Value::Object(profile));
    migrated.insert("ui".to_string(), Value::Object(ui));
    migrated
}

/// Overlay the stored top-level fields on the defaults. Each field is
/// replaced wholesale; a field that fails to deserialize keeps its default.
fn merge(mut stored: Map<String, Value>) -> AppState {
    let defaults = AppState::default();
    AppState {
        version: field(&mut stored, "version", defaults.version),
        profile: field(&mut stored, "profile", defaults.profile),
        ui: field(&mut stored, "ui", defaults.ui),
        progress: field(&mut stored, "progress", defaults.progress),
        srs: field(&mut stored, "srs", defaults.srs),
    }
}

fn field<T: DeserializeOwned>(stored: &mut Map<String, Value>, key: &str, default: T) -> T {
    match stored.remove(key) {
        None => default,
        Some(value) => match serde_json::from_value(value) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring malformed stored field `{key}`: {e}");
                default
            }
        },
    }
}

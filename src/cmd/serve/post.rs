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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::app::App;
use crate::cmd::serve::state::ServerState;
use crate::error::Fallible;
use crate::error::fail;
use crate::router::Route;
use crate::router::Tab;
use crate::srs::session::ReviewMode;
use crate::state::AudioMode;
use crate::state::UiLang;
use crate::types::level::Level;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
enum Action {
    Tab,
    Level,
    SetLevel,
    Open,
    Back,
    Complete,
    Continue,
    Review,
    Reveal,
    Again,
    Hard,
    Easy,
    End,
    AudioMode,
    UiLang,
    Exam,
    Offline,
    Reset,
}

impl Action {
    pub fn quality(&self) -> Option<Quality> {
        match self {
            Action::Again => Some(Quality::Again),
            Action::Hard => Some(Quality::Hard),
            Action::Easy => Some(Quality::Easy),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    #[serde(default)]
    value: Option<String>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    let mut app = state.mutable.lock().unwrap();
    if let Err(e) = action_handler(&mut app, form) {
        log::error!("{e}");
    }
    Redirect::to("/")
}

fn action_handler(app: &mut App, form: FormData) -> Fallible<()> {
    let now = Timestamp::now();
    let FormData { action, value } = form;
    match action {
        Action::Tab => app.select_tab(parse::<Tab>(value)?),
        Action::Level => app.browse_level(parse::<Level>(value)?),
        Action::SetLevel => app.set_level(parse::<Level>(value)?),
        Action::Open => app.open_lesson(&required(value)?),
        Action::Back => app.navigate(Route::Lessons),
        Action::Complete => {
            let id = required(value)?;
            if !app.complete_lesson(&id) {
                log::debug!("Lesson {id} was already complete.");
            }
        }
        Action::Continue => app.continue_learning(),
        Action::Review => {
            let mode = parse::<ReviewMode>(value)?;
            // The review screen lives on the vocab tab.
            app.select_tab(Tab::Vocab);
            app.start_review(mode, now);
        }
        Action::Reveal => app.reveal(),
        Action::Again | Action::Hard | Action::Easy => {
            if let Some(quality) = action.quality() {
                if app.grade(quality, now).is_none() {
                    return fail("no revealed card to grade.");
                }
            }
        }
        Action::End => app.end_review(),
        Action::AudioMode => app.set_audio_mode(parse::<AudioMode>(value)?),
        Action::UiLang => app.set_ui_lang(parse::<UiLang>(value)?),
        Action::Exam => app.set_exam(parse_bool(value)?),
        Action::Offline => app.set_allow_offline(parse_bool(value)?),
        Action::Reset => app.reset(),
    }
    Ok(())
}

fn required(value: Option<String>) -> Fallible<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => fail("missing form value."),
    }
}

/// Parse a form value through its serialized name.
fn parse<T: DeserializeOwned>(value: Option<String>) -> Fallible<T> {
    let value = required(value)?;
    Ok(serde_json::from_value(Value::String(value))?)
}

fn parse_bool(value: Option<String>) -> Fallible<bool> {
    match required(value)?.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => fail(&format!("invalid flag: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_quality() {
        assert_eq!(Action::Again.quality(), Some(Quality::Again));
        assert_eq!(Action::Hard.quality(), Some(Quality::Hard));
        assert_eq!(Action::Easy.quality(), Some(Quality::Easy));
        assert_eq!(Action::Reveal.quality(), None);
    }

    #[test]
    fn test_parse_values() -> Fallible<()> {
        assert_eq!(parse::<Tab>(Some("vocab".to_string()))?, Tab::Vocab);
        assert_eq!(parse::<Level>(Some("B2".to_string()))?, Level::B2);
        assert_eq!(
            parse::<ReviewMode>(Some("new".to_string()))?,
            ReviewMode::New
        );
        assert!(parse::<Tab>(Some("dashboard".to_string())).is_err());
        assert!(parse::<Tab>(None).is_err());
        assert!(parse_bool(Some("true".to_string()))?);
        assert!(parse_bool(Some("yes".to_string())).is_err());
        Ok(())
    }
}

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

//! Routes and tabs.
//!
//! The active route is persisted as a [`RouteKind`] plus an optional
//! [`RoutePayload`]; [`Route`] is the validated form, where only
//! [`Route::Lesson`] carries data.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::state::UiLang;
use crate::state::UiState;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    #[default]
    Home,
    Lessons,
    Lesson,
    Vocab,
    Grammar,
    Settings,
}

impl RouteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Home => "home",
            RouteKind::Lessons => "lessons",
            RouteKind::Lesson => "lesson",
            RouteKind::Vocab => "vocab",
            RouteKind::Grammar => "grammar",
            RouteKind::Settings => "settings",
        }
    }
}

/// Route-specific data, as stored.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct RoutePayload {
    #[serde(default)]
    pub id: Option<String>,
}

impl RoutePayload {
    pub fn lesson(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Route {
    Home,
    Lessons,
    Lesson { id: String },
    Vocab,
    Grammar,
    Settings,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RouteError {
    /// A lesson route without a lesson id.
    MissingLessonId,
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            RouteError::MissingLessonId => write!(f, "lesson route without a lesson id"),
        }
    }
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Home => RouteKind::Home,
            Route::Lessons => RouteKind::Lessons,
            Route::Lesson { .. } => RouteKind::Lesson,
            Route::Vocab => RouteKind::Vocab,
            Route::Grammar => RouteKind::Grammar,
            Route::Settings => RouteKind::Settings,
        }
    }

    pub fn payload(&self) -> Option<RoutePayload> {
        match self {
            Route::Lesson { id } => Some(RoutePayload::lesson(id)),
            _ => None,
        }
    }

    pub fn from_parts(kind: RouteKind, payload: Option<&RoutePayload>) -> Result<Route, RouteError> {
        let route = match kind {
            RouteKind::Home => Route::Home,
            RouteKind::Lessons => Route::Lessons,
            RouteKind::Lesson => {
                let id = payload
                    .and_then(|payload| payload.id.as_deref())
                    .filter(|id| !id.is_empty())
                    .ok_or(RouteError::MissingLessonId)?;
                Route::Lesson { id: id.to_string() }
            }
            RouteKind::Vocab => Route::Vocab,
            RouteKind::Grammar => Route::Grammar,
            RouteKind::Settings => Route::Settings,
        };
        Ok(route)
    }

    /// The persisted route.
    pub fn from_ui(ui: &UiState) -> Result<Route, RouteError> {
        Self::from_parts(ui.route, ui.payload.as_ref())
    }
}

/// A top-level tab.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Home,
    Lessons,
    Vocab,
    Grammar,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Home, Tab::Lessons, Tab::Vocab, Tab::Grammar, Tab::Settings];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Lessons => "lessons",
            Tab::Vocab => "vocab",
            Tab::Grammar => "grammar",
            Tab::Settings => "settings",
        }
    }

    /// The route shown when the tab is selected.
    pub fn default_route(self) -> Route {
        match self {
            Tab::Home => Route::Home,
            Tab::Lessons => Route::Lessons,
            Tab::Vocab => Route::Vocab,
            Tab::Grammar => Route::Grammar,
            Tab::Settings => Route::Settings,
        }
    }

    pub fn label(self, lang: UiLang) -> &'static str {
        match (self, lang) {
            (Tab::Home, UiLang::De) => "Start",
            (Tab::Home, UiLang::En) => "Home",
            (Tab::Lessons, UiLang::De) => "Lektionen",
            (Tab::Lessons, UiLang::En) => "Lessons",
            (Tab::Vocab, UiLang::De) => "Vokabeln",
            (Tab::Vocab, UiLang::En) => "Vocabulary",
            (Tab::Grammar, UiLang::De) => "Grammatik",
            (Tab::Grammar, UiLang::En) => "Grammar",
            (Tab::Settings, UiLang::De) => "Einstellungen",
            (Tab::Settings, UiLang::En) => "Settings",
        }
    }
}

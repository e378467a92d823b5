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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

use crate::router::Tab;
use crate::state::AppState;
use crate::state::UiLang;

/// Pick the label for the active interface language.
pub fn t(lang: UiLang, de: &'static str, en: &'static str) -> &'static str {
    match lang {
        UiLang::De => de,
        UiLang::En => en,
    }
}

/// A one-button form posting `action` (and `value`, if any) to `/`.
pub fn action_button(action: &str, value: Option<&str>, label: &str, class: &str) -> Markup {
    html! {
        form.inline action="/" method="post" {
            @if let Some(value) = value {
                input type="hidden" name="value" value=(value);
            }
            button type="submit" class=(class) name="action" value=(action) {
                (label)
            }
        }
    }
}

pub fn page_template(state: &AppState, body: Markup) -> Markup {
    let lang = state.profile.ui_lang;
    let html_lang = match lang {
        UiLang::De => "de",
        UiLang::En => "en",
    };
    html! {
        (DOCTYPE)
        html lang=(html_lang) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "MagyarLab" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                nav #topbar {
                    span.brand { "MagyarLab" }
                    @for tab in Tab::ALL {
                        @let class = if tab == state.ui.tab { "tab active" } else { "tab" };
                        (action_button("Tab", Some(tab.as_str()), tab.label(lang), class))
                    }
                }
                main #mainContent {
                    (body)
                }
            }
        }
    }
}

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

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::app::Notice;
use crate::app::Screen;
use crate::app::VocabCard;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::action_button;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::template::t;
use crate::curriculum::Lesson;
use crate::curriculum::Unit;
use crate::curriculum::lookup::GrammarTopic;
use crate::markdown::markdown_to_html_inline;
use crate::srs::session::ReviewMode;
use crate::state::AudioMode;
use crate::state::Profile;
use crate::state::Progress;
use crate::state::UiLang;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn get_handler(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> (StatusCode, Html<String>) {
    let app = state.mutable.lock().unwrap();
    let lang = app.state().profile.ui_lang;
    let screen = app.screen(query.q.as_deref(), Timestamp::now());
    let body = render_screen(screen, lang);
    let html = page_template(app.state(), body);
    (StatusCode::OK, Html(html.into_string()))
}

fn render_screen(screen: Screen<'_>, lang: UiLang) -> Markup {
    match screen {
        Screen::Home {
            level,
            next_lesson,
            completed,
            total,
            due_cards,
        } => render_home(lang, level, next_lesson, completed, total, due_cards),
        Screen::Lessons {
            level,
            units,
            progress,
        } => render_lessons(lang, level, units, progress),
        Screen::Lesson { lesson, completed } => render_lesson(lang, lesson, completed),
        Screen::LessonNotFound { id } => html! {
            div.card.not-found {
                div.hd { (t(lang, "Lektion nicht gefunden", "Lesson not found")) }
                div.bd {
                    @if let Some(id) = id {
                        p { code { (id) } }
                    }
                }
                div.ft {
                    (action_button("Back", None, t(lang, "Zurück", "Back"), "btn"))
                }
            }
        },
        Screen::Vocab {
            level,
            cards,
            notice,
        } => render_vocab(lang, level, &cards, notice),
        Screen::Review {
            item,
            revealed,
            position,
            card_count,
            reviewed,
            mode,
        } => {
            let progress = format!("{position} / {card_count}");
            html! {
                div.card.review {
                    div.hd {
                        span { (t(lang, "Wiederholung", "Review")) " (" (mode.as_str()) ")" }
                        span.progress { (progress) }
                    }
                    div.bd {
                        p.prompt { (item.hu) }
                        @if revealed {
                            p.answer { (item.de) }
                        }
                    }
                    div.ft {
                        @if revealed {
                            (action_button("Again", None, t(lang, "Nochmal", "Again"), "btn again"))
                            (action_button("Hard", None, t(lang, "Schwer", "Hard"), "btn hard"))
                            (action_button("Easy", None, t(lang, "Leicht", "Easy"), "btn easy"))
                        } @else {
                            (action_button("Reveal", None, t(lang, "Aufdecken", "Reveal"), "btn primary"))
                        }
                        div.spacer {}
                        span.reviewed { (reviewed) " " (t(lang, "bewertet", "graded")) }
                        (action_button("End", None, t(lang, "Beenden", "End"), "btn"))
                    }
                }
            }
        }
        Screen::Grammar { query, topics } => render_grammar(lang, &query, &topics),
        Screen::Settings { profile } => render_settings(lang, profile),
    }
}

fn level_picker(lang: UiLang, current: Level) -> Markup {
    html! {
        div.level-grid {
            span { (t(lang, "Niveau:", "Level:")) }
            @for level in Level::ALL {
                @let class = if level == current { "level-btn active" } else { "level-btn" };
                (action_button("Level", Some(level.as_str()), level.as_str(), class))
            }
        }
    }
}

fn render_home(
    lang: UiLang,
    level: Level,
    next_lesson: Option<&Lesson>,
    completed: usize,
    total: usize,
    due_cards: usize,
) -> Markup {
    html! {
        (level_picker(lang, level))
        div.grid {
            div.card {
                div.hd { (t(lang, "Weiterlernen", "Continue")) }
                div.bd {
                    p { (format!("{completed} / {total}")) " " (t(lang, "Lektionen abgeschlossen", "lessons completed")) }
                    @match next_lesson {
                        Some(lesson) => {
                            p.next { (lesson.title) }
                        }
                        None => {
                            p.next { (t(lang, "Alle Lektionen dieses Niveaus sind abgeschlossen.", "Every lesson of this level is complete.")) }
                        }
                    }
                }
                div.ft {
                    (action_button("Continue", None, t(lang, "Weiter", "Continue"), "btn primary"))
                }
            }
            div.card {
                div.hd { (t(lang, "Vokabeln", "Vocabulary")) }
                div.bd {
                    p { (due_cards) " " (t(lang, "Karten fällig", "cards due")) }
                }
                div.ft {
                    (action_button("Review", Some(ReviewMode::Due.as_str()), t(lang, "Wiederholen", "Review"), "btn"))
                }
            }
        }
    }
}

fn render_lessons(lang: UiLang, level: Level, units: &[Unit], progress: &Progress) -> Markup {
    html! {
        (level_picker(lang, level))
        @if units.is_empty() {
            p.empty { (t(lang, "Für dieses Niveau gibt es noch keine Lektionen.", "There are no lessons for this level yet.")) }
        }
        @for unit in units {
            h2.unit id=(unit.id) { (unit.title) }
            div.grid {
                @for lesson in &unit.lessons {
                    @let done = progress.is_complete(&lesson.id);
                    div class=(if done { "card link-card done" } else { "card link-card" }) {
                        div.hd {
                            (lesson.title)
                            @if !lesson.tag.is_empty() {
                                span.tag { (lesson.tag) }
                            }
                            @if done {
                                span.check { "✓" }
                            }
                        }
                        div.bd {
                            h4 { (t(lang, "Grammatik:", "Grammar:")) }
                            (grammar_list(&lesson.grammar))
                        }
                        div.ft {
                            (action_button("Open", Some(lesson.id.as_str()), t(lang, "Öffnen", "Open"), "btn primary"))
                        }
                    }
                }
            }
        }
    }
}

fn grammar_list(points: &[String]) -> Markup {
    html! {
        ul {
            @for point in points {
                li { (PreEscaped(markdown_to_html_inline(point))) }
            }
        }
    }
}

fn render_lesson(lang: UiLang, lesson: &Lesson, completed: bool) -> Markup {
    html! {
        div.card.lesson {
            div.hd { (lesson.title) }
            div.bd {
                @if !lesson.objectives.is_empty() {
                    h4 { (t(lang, "Lernziele:", "Objectives:")) }
                    ul.objectives {
                        @for objective in &lesson.objectives {
                            li { (objective) }
                        }
                    }
                }
                h4 { (t(lang, "Grammatik:", "Grammar:")) }
                (grammar_list(&lesson.grammar))
                h4 { (t(lang, "Beispiele:", "Examples:")) }
                ul.examples {
                    @for example in &lesson.examples {
                        li {
                            span.hu { (example.hu) }
                            " - "
                            span.de { (example.de) }
                        }
                    }
                }
            }
            div.ft {
                (action_button("Back", None, t(lang, "Zurück", "Back"), "btn"))
                div.spacer {}
                @if completed {
                    span.completed { (t(lang, "Abgeschlossen", "Completed")) }
                } @else {
                    (action_button("Complete", Some(lesson.id.as_str()), t(lang, "Als erledigt markieren", "Mark as done"), "btn primary"))
                }
            }
        }
    }
}

fn render_vocab(lang: UiLang, level: Level, cards: &[VocabCard<'_>], notice: Option<Notice>) -> Markup {
    html! {
        (level_picker(lang, level))
        @match notice {
            Some(Notice::NothingToReview(mode)) => {
                p.notice { (t(lang, "Nichts zu wiederholen", "Nothing to review")) " (" (mode.as_str()) ")." }
            }
            Some(Notice::SessionEnded { reviewed }) => {
                p.notice { (t(lang, "Sitzung beendet", "Session ended")) ": " (reviewed) " " (t(lang, "bewertet", "graded")) "." }
            }
            None => {}
        }
        div.controls {
            (action_button("Review", Some(ReviewMode::Due.as_str()), t(lang, "Fällige", "Due"), "btn primary"))
            (action_button("Review", Some(ReviewMode::New.as_str()), t(lang, "Neue", "New"), "btn"))
            (action_button("Review", Some(ReviewMode::All.as_str()), t(lang, "Alle", "All"), "btn"))
        }
        table.vocab {
            thead {
                tr {
                    th { "Magyar" }
                    th { (t(lang, "Deutsch", "German")) }
                    th { (t(lang, "Fällig", "Due")) }
                    th { (t(lang, "Fehler", "Lapses")) }
                }
            }
            tbody {
                @for card in cards {
                    tr {
                        td { (card.item.hu) }
                        td { (card.item.de) }
                        @match card.state.filter(|state| !state.is_new()) {
                            Some(state) => {
                                td { (state.due.to_string()) }
                                td { (state.lapses) }
                            }
                            None => {
                                td { (t(lang, "neu", "new")) }
                                td { "0" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_grammar(lang: UiLang, query: &str, topics: &[GrammarTopic<'_>]) -> Markup {
    html! {
        form.search action="/" method="get" {
            input type="search" name="q" value=(query) placeholder=(t(lang, "Thema suchen…", "Search topics…"));
            button.btn type="submit" { (t(lang, "Suchen", "Search")) }
        }
        @if topics.is_empty() {
            p.empty { (t(lang, "Keine Treffer.", "No matches.")) }
        }
        div.grid {
            @for topic in topics {
                div.card.topic {
                    div.hd { (topic.title) }
                    @if let Some(example) = topic.first_example {
                        div.bd {
                            p { span.hu { (example.hu) } " - " span.de { (example.de) } }
                        }
                    }
                    div.ft {
                        (action_button("Open", Some(topic.lesson_id), t(lang, "Öffnen", "Open"), "btn"))
                    }
                }
            }
        }
    }
}

fn render_settings(lang: UiLang, profile: &Profile) -> Markup {
    html! {
        div.grid {
            div.card {
                div.hd { (t(lang, "Mein Niveau", "My level")) }
                div.bd {
                    div.level-grid {
                        @for level in Level::ALL {
                            @let class = if level == profile.level { "level-btn active" } else { "level-btn" };
                            (action_button("SetLevel", Some(level.as_str()), level.as_str(), class))
                        }
                    }
                }
            }
            div.card {
                div.hd { (t(lang, "Audio-Tempo", "Audio speed")) }
                div.bd {
                    @for (mode, value, label) in [(AudioMode::Slow, "slow", t(lang, "Langsam", "Slow")), (AudioMode::Normal, "normal", t(lang, "Normal", "Normal"))] {
                        @let class = if mode == profile.audio_mode { "btn active" } else { "btn" };
                        (action_button("AudioMode", Some(value), label, class))
                    }
                }
            }
            div.card {
                div.hd { (t(lang, "Sprache", "Language")) }
                div.bd {
                    @for (ui_lang, value, label) in [(UiLang::De, "de", "Deutsch"), (UiLang::En, "en", "English")] {
                        @let class = if ui_lang == lang { "btn active" } else { "btn" };
                        (action_button("UiLang", Some(value), label, class))
                    }
                }
            }
            (toggle(lang, "Exam", profile.exam, t(lang, "Prüfungsvorbereitung", "Exam preparation")))
            (toggle(lang, "Offline", profile.allow_offline, t(lang, "Lokales Speichern erlauben", "Allow local saving")))
            div.card {
                div.hd { (t(lang, "Fortschritt", "Progress")) }
                div.ft {
                    (action_button("Reset", None, t(lang, "Alles zurücksetzen", "Reset everything"), "btn danger"))
                }
            }
        }
    }
}

fn toggle(lang: UiLang, action: &str, enabled: bool, label: &str) -> Markup {
    let (value, state) = if enabled {
        ("false", t(lang, "An", "On"))
    } else {
        ("true", t(lang, "Aus", "Off"))
    };
    html! {
        div.card {
            div.hd { (label) }
            div.bd {
                (action_button(action, Some(value), state, if enabled { "btn active" } else { "btn" }))
            }
        }
    }
}

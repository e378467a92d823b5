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
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

use crate::app::App;
use crate::cmd::serve::get::get_handler;
use crate::cmd::serve::post::post_handler;
use crate::cmd::serve::state::ServerState;
use crate::curriculum::Curriculum;
use crate::error::Fallible;
use crate::error::fail;
use crate::state::storage::MemoryStorage;
use crate::state::storage::SqliteStorage;
use crate::state::storage::Storage;

/// The name of the storage database inside the data directory.
pub const DB_FILE: &str = "magyarlab.db";

pub struct ServeConfig {
    /// Where the storage database lives. Defaults to the current directory.
    pub directory: Option<String>,
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    /// A curriculum file to use instead of the bundled one.
    pub curriculum: Option<PathBuf>,
    /// Keep state in memory only.
    pub ephemeral: bool,
}

pub async fn start_server(config: ServeConfig) -> Fallible<()> {
    let directory: PathBuf = match config.directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }

    let curriculum = match &config.curriculum {
        Some(path) => Curriculum::from_file(path)?,
        None => Curriculum::bundled()?,
    };

    let storage: Box<dyn Storage> = if config.ephemeral {
        log::debug!("Using in-memory storage.");
        Box::new(MemoryStorage::new())
    } else {
        let db_path = directory.join(DB_FILE);
        log::debug!("Opening storage at {}", db_path.display());
        match SqliteStorage::open(&db_path) {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!(
                    "Cannot open {}, progress will not be saved: {e}",
                    db_path.display()
                );
                Box::new(MemoryStorage::new())
            }
        }
    };

    let state = ServerState {
        mutable: Arc::new(Mutex::new(App::new(curriculum, storage))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler).post(post_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    if config.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open browser: {e}");
            }
        });
    }

    log::debug!("Starting server on {bind}");
    println!("Serving on http://{bind}/");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
    log::debug!("Shutting down.");
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

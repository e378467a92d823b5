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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_curriculum;
use crate::cmd::serve::server::ServeConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Start the trainer in the browser.
    Serve {
        /// Directory holding the progress database. Defaults to the current directory.
        directory: Option<String>,
        /// The host address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Don't open the browser automatically.
        #[arg(long)]
        no_open: bool,
        /// Use this curriculum file instead of the bundled one.
        #[arg(long)]
        curriculum: Option<PathBuf>,
        /// Keep progress in memory only.
        #[arg(long)]
        ephemeral: bool,
    },
    /// Check that a curriculum file is valid.
    Check {
        /// Curriculum file to check. Defaults to the bundled curriculum.
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },
    /// Print progress statistics.
    Stats {
        /// Directory holding the progress database. Defaults to the current directory.
        directory: Option<String>,
        /// Curriculum file the progress refers to. Defaults to the bundled curriculum.
        #[arg(long)]
        curriculum: Option<PathBuf>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Json)]
        format: StatsFormat,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            directory,
            host,
            port,
            no_open,
            curriculum,
            ephemeral,
        } => {
            let config = ServeConfig {
                directory,
                host,
                port,
                open_browser: !no_open,
                curriculum,
                ephemeral,
            };
            start_server(config).await
        }
        Command::Check { curriculum } => check_curriculum(curriculum),
        Command::Stats {
            directory,
            curriculum,
            format,
        } => print_stats(directory, curriculum, format),
    }
}

// Copyright 2025 sftpsync contributors
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

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Synchronize a local directory tree with a remote SFTP tree, in the
/// direction the configuration file declares.
#[derive(Debug, Parser)]
#[command(name = "sftpsync", version, about)]
pub struct Cli {
    /// Path to the JSON transfer configuration
    /// (default: sftpsync.json in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory receiving the rotating transfer.log
    /// (default: the working directory)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The configuration file to use for this run.
    ///
    /// Resolution is deliberately simple: the `--config` flag wins,
    /// otherwise `sftpsync.json` relative to the working directory.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("sftpsync.json"))
    }
}

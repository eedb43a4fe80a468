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

//! Transfer configuration: the declarative record that drives one run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which way the tree is mirrored for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upload,
    Download,
}

/// One run's configuration. Immutable after loading.
///
/// At least one of `keyfile` or `password` must be usable; this is
/// enforced by the session establisher before any connection attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    #[serde(default)]
    pub keyfile: Option<PathBuf>,

    #[serde(default)]
    pub password: Option<String>,

    pub direction: Direction,

    /// Local root of the tree, source for uploads and destination for
    /// downloads.
    pub local: PathBuf,

    /// Remote root, forward-slash separated.
    pub remote: String,
}

fn default_port() -> u16 {
    22
}

impl TransferConfig {
    /// Load and normalize the configuration from a JSON file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;

        let mut config: TransferConfig = serde_json::from_str(&content).with_context(|| {
            format!(
                "failed to parse configuration file {} (direction must be \"upload\" or \"download\")",
                path.display()
            )
        })?;

        config.normalize();
        Ok(config)
    }

    /// Drop placeholder credentials so they never reach the server.
    ///
    /// The generated template ships `"password": ""`; an empty string
    /// must not count as a configured password. Tilde-prefixed keyfile
    /// paths are expanded here as well.
    fn normalize(&mut self) {
        if matches!(self.password.as_deref(), Some("")) {
            self.password = None;
        }
        if let Some(keyfile) = &self.keyfile {
            if keyfile.as_os_str().is_empty() {
                self.keyfile = None;
            } else {
                self.keyfile = Some(expand_tilde(keyfile));
            }
        }
    }

    /// Whether any credential is configured at all. The session
    /// establisher additionally requires the keyfile to exist on disk.
    pub fn has_credentials(&self) -> bool {
        self.keyfile.is_some() || self.password.is_some()
    }

    /// Write a starter configuration for the user to edit.
    pub async fn write_template(path: &Path) -> Result<()> {
        let template = TransferConfig {
            host: "sftp.example.com".to_string(),
            port: 22,
            username: "your_username".to_string(),
            keyfile: Some(PathBuf::from("id_rsa")),
            password: Some(String::new()),
            direction: Direction::Upload,
            local: PathBuf::from("./local_folder"),
            remote: "/remote/folder/path".to_string(),
        };

        let body = serde_json::to_string_pretty(&template)
            .context("failed to serialize configuration template")?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("failed to write template to {}", path.display()))?;
        Ok(())
    }
}

/// Expand a leading `~/` using the HOME environment variable.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}

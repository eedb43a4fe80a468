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

//! Tree walker, download direction.

use std::path::{Path, PathBuf};

use crate::sftp::{Result, Transport};
use crate::sync::event::{Level, Reporter};

/// Mirror the remote tree under `remote_root` into `local_root`.
///
/// `local_root` and its parents are created up front. Entries are
/// classified by transport metadata, never by name. The traversal uses
/// an explicit stack of (remote, local) directory pairs, depth-first in
/// whatever order the server lists entries. A single file's transfer
/// failure is logged and skipped; a listing failure is a run-level
/// error and propagates.
pub async fn download(
    transport: &dyn Transport,
    remote_root: &str,
    local_root: &Path,
    reporter: &dyn Reporter,
) -> Result<()> {
    tokio::fs::create_dir_all(local_root).await?;

    let mut pending: Vec<(String, PathBuf)> =
        vec![(remote_root.to_string(), local_root.to_path_buf())];

    while let Some((remote_dir, local_dir)) = pending.pop() {
        let entries = transport.read_dir(&remote_dir).await?;

        for entry in entries {
            let remote_path = format!("{}/{}", remote_dir.trim_end_matches('/'), entry.name);
            let local_path = local_dir.join(&entry.name);

            if entry.is_dir {
                tokio::fs::create_dir_all(&local_path).await?;
                reporter.log(Level::Info, &format!("mkdir: {}", local_path.display()));
                pending.push((remote_path, local_path));
            } else {
                match transport.get(&remote_path, &local_path).await {
                    Ok(()) => reporter.log(
                        Level::Info,
                        &format!("DOWNLOADED: {} -> {}", remote_path, local_path.display()),
                    ),
                    Err(e) => reporter.log(
                        Level::Error,
                        &format!("download failed: {remote_path} ({e})"),
                    ),
                }
            }
        }
    }

    Ok(())
}

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

//! Tree walker, upload direction.

use std::path::{Component, Path, PathBuf};

use crate::sftp::{Result, Transport};
use crate::sync::event::{Level, Reporter};
use crate::sync::remote_dirs::ensure_remote_dirs;

/// Mirror every regular file under `local_root` onto `remote_root`.
///
/// Relative paths are preserved with forward-slash separators whatever
/// the host convention. Each file is transferred unconditionally
/// (overwrite, no change detection), and one file's failure never stops
/// the walk: it is logged as an error and the next file is attempted.
pub async fn upload(
    transport: &dyn Transport,
    local_root: &Path,
    remote_root: &str,
    reporter: &dyn Reporter,
) -> Result<()> {
    let files = collect_local_files(local_root, reporter).await?;

    for file in files {
        let Some(relative) = relative_slash_path(&file, local_root) else {
            // Unreachable for paths produced by the walk; skip rather
            // than abort if the filesystem hands back something odd.
            reporter.log(
                Level::Error,
                &format!("upload failed: {} (not under {})", file.display(), local_root.display()),
            );
            continue;
        };
        let remote_path = join_remote(remote_root, &relative);

        ensure_remote_dirs(transport, &remote_path, reporter).await;

        match transport.put(&file, &remote_path).await {
            Ok(()) => reporter.log(
                Level::Info,
                &format!("UPLOADED: {} -> {}", file.display(), remote_path),
            ),
            Err(e) => reporter.log(
                Level::Error,
                &format!("upload failed: {} ({e})", file.display()),
            ),
        }
    }

    Ok(())
}

/// Every regular file under `root`, walked with an explicit stack so
/// pathological depth cannot overflow the call stack.
///
/// An unreadable root aborts the run; an unreadable subdirectory is
/// logged and skipped, and the walk continues elsewhere.
async fn collect_local_files(root: &Path, reporter: &dyn Reporter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut at_root = true;

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if at_root => return Err(e.into()),
            Err(e) => {
                reporter.log(
                    Level::Warning,
                    &format!("cannot list local directory {} ({e})", dir.display()),
                );
                continue;
            }
        };
        at_root = false;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    reporter.log(
                        Level::Warning,
                        &format!("cannot list local directory {} ({e})", dir.display()),
                    );
                    break;
                }
            };
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    reporter.log(
                        Level::Warning,
                        &format!("cannot stat {} ({e})", entry.path().display()),
                    );
                    continue;
                }
            };
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            } else if file_type.is_symlink() {
                // Links to files are transferred like the files they
                // point at. Links to directories are not traversed, so
                // a link cycle cannot loop the walk.
                match tokio::fs::metadata(entry.path()).await {
                    Ok(target) if target.is_file() => files.push(entry.path()),
                    Ok(_) => {
                        tracing::debug!(
                            "not traversing directory link {}",
                            entry.path().display()
                        );
                    }
                    Err(e) => {
                        // Dangling link.
                        reporter.log(
                            Level::Warning,
                            &format!("cannot stat {} ({e})", entry.path().display()),
                        );
                    }
                }
            }
            // Sockets and other special files are skipped.
        }
    }

    Ok(files)
}

/// Path of `file` relative to `root`, joined with `/` regardless of the
/// host separator. `None` if `file` is not under `root`.
pub fn relative_slash_path(file: &Path, root: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Concatenate a relative path onto a remote root without doubling
/// separators.
pub fn join_remote(remote_root: &str, relative: &str) -> String {
    let trimmed = remote_root.trim_end_matches('/');
    if trimmed.is_empty() {
        format!("/{relative}")
    } else {
        format!("{trimmed}/{relative}")
    }
}

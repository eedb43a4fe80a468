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

//! Remote directory materialization for uploads.

use crate::sftp::{Error, Transport};
use crate::sync::event::{Level, Reporter};

/// Parent directory prefixes of a remote file path, shallowest first.
///
/// The final segment (the filename) is dropped. A leading `/` is kept
/// for absolute paths.
///
/// `"/a/b/c.txt"` yields `["/a", "/a/b"]`; `"a/b/c.txt"` yields
/// `["a", "a/b"]`.
pub fn parent_prefixes(remote_file_path: &str) -> Vec<String> {
    let absolute = remote_file_path.starts_with('/');
    let segments: Vec<&str> = remote_file_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() < 2 {
        return Vec::new();
    }

    let mut prefixes = Vec::with_capacity(segments.len() - 1);
    let mut current = if absolute {
        String::new()
    } else {
        segments[0].to_string()
    };

    let parents = &segments[..segments.len() - 1];
    let mut iter = parents.iter();
    if !absolute {
        iter.next();
        prefixes.push(current.clone());
    }
    for segment in iter {
        current.push('/');
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}

/// Ensure every parent directory of `remote_file_path` exists.
///
/// Levels are created shallowest first. Nothing here fails the caller: a
/// level that cannot be created is logged as a warning and the deeper
/// levels — and eventually the file transfer itself — are still
/// attempted, since the transfer will surface any real blocking error.
pub async fn ensure_remote_dirs(
    transport: &dyn Transport,
    remote_file_path: &str,
    reporter: &dyn Reporter,
) {
    for dir in parent_prefixes(remote_file_path) {
        match transport.stat(&dir).await {
            Ok(_) => continue,
            Err(Error::NotFound(_)) => match transport.mkdir(&dir).await {
                Ok(()) => reporter.log(Level::Info, &format!("mkdir: {dir}")),
                Err(e) => reporter.log(Level::Warning, &format!("mkdir failed: {dir} ({e})")),
            },
            Err(e) => {
                reporter.log(Level::Warning, &format!("stat failed: {dir} ({e})"));
            }
        }
    }
}

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

//! In-memory transport double with per-path failure injection.

#![allow(dead_code)]

use async_trait::async_trait;
use sftpsync::sftp::{Error, FileStat, RemoteEntry, Result, Transport};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    fail_mkdir: HashSet<String>,
    fail_put: HashSet<String>,
    fail_get: HashSet<String>,
    fail_read_dir: HashSet<String>,
    calls: Vec<String>,
    closed: bool,
}

/// Fake remote filesystem behind the [`Transport`] surface.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<State>,
}

fn normalize(path: &str) -> String {
    if path == "/" {
        "/".to_string()
    } else {
        path.trim_end_matches('/').to_string()
    }
}

fn parent_of(path: &str) -> String {
    let path = normalize(path);
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn leaf_of(path: &str) -> String {
    let path = normalize(path);
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path,
    }
}

fn injected(what: &str, path: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("injected {what} failure for {path}"),
    ))
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a remote directory (parents included).
    pub fn add_remote_dir(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        let mut current = normalize(path);
        while current != "/" && !current.is_empty() {
            state.dirs.insert(current.clone());
            current = parent_of(&current);
        }
    }

    /// Seed a remote file, creating parent directories.
    pub fn add_remote_file(&self, path: &str, contents: &[u8]) {
        self.add_remote_dir(&parent_of(path));
        self.state
            .lock()
            .unwrap()
            .files
            .insert(normalize(path), contents.to_vec());
    }

    pub fn fail_mkdir(&self, path: &str) {
        self.state.lock().unwrap().fail_mkdir.insert(normalize(path));
    }

    pub fn fail_put(&self, path: &str) {
        self.state.lock().unwrap().fail_put.insert(normalize(path));
    }

    pub fn fail_get(&self, path: &str) {
        self.state.lock().unwrap().fail_get.insert(normalize(path));
    }

    pub fn fail_read_dir(&self, path: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_read_dir
            .insert(normalize(path));
    }

    pub fn remote_files(&self) -> BTreeMap<String, Vec<u8>> {
        self.state.lock().unwrap().files.clone()
    }

    pub fn remote_dirs(&self) -> BTreeSet<String> {
        self.state.lock().unwrap().dirs.clone()
    }

    /// Chronological operation trace, e.g. `"mkdir /a"` or `"put /a/b"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn call_position(&self, call: &str) -> Option<usize> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .position(|recorded| recorded == call)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        let path = normalize(path);
        self.record(format!("stat {path}"));
        let state = self.state.lock().unwrap();
        if state.dirs.contains(&path) {
            Ok(FileStat { is_dir: true })
        } else if state.files.contains_key(&path) {
            Ok(FileStat { is_dir: false })
        } else {
            Err(Error::NotFound(path))
        }
    }

    async fn mkdir(&self, path: &str) -> Result<()> {
        let path = normalize(path);
        self.record(format!("mkdir {path}"));
        let mut state = self.state.lock().unwrap();
        if state.fail_mkdir.contains(&path) {
            return Err(injected("mkdir", &path));
        }
        state.dirs.insert(path);
        Ok(())
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let path = normalize(path);
        self.record(format!("read_dir {path}"));
        let state = self.state.lock().unwrap();
        if state.fail_read_dir.contains(&path) {
            return Err(injected("read_dir", &path));
        }
        if path != "/" && !state.dirs.contains(&path) {
            return Err(Error::NotFound(path));
        }

        let mut entries = Vec::new();
        for dir in &state.dirs {
            if parent_of(dir) == path {
                entries.push(RemoteEntry {
                    name: leaf_of(dir),
                    is_dir: true,
                });
            }
        }
        for file in state.files.keys() {
            if parent_of(file) == path {
                entries.push(RemoteEntry {
                    name: leaf_of(file),
                    is_dir: false,
                });
            }
        }
        Ok(entries)
    }

    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<()> {
        let remote_path = normalize(remote_path);
        self.record(format!("get {remote_path}"));
        let contents = {
            let state = self.state.lock().unwrap();
            if state.fail_get.contains(&remote_path) {
                return Err(injected("get", &remote_path));
            }
            state
                .files
                .get(&remote_path)
                .cloned()
                .ok_or(Error::NotFound(remote_path))?
        };
        std::fs::write(local_path, contents).map_err(Error::Io)
    }

    async fn put(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let remote_path = normalize(remote_path);
        self.record(format!("put {remote_path}"));
        let contents = std::fs::read(local_path).map_err(Error::Io)?;
        let mut state = self.state.lock().unwrap();
        if state.fail_put.contains(&remote_path) {
            return Err(injected("put", &remote_path));
        }
        state.files.insert(remote_path, contents);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.record("close".to_string());
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

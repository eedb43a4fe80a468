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

//! The remote-side operations the synchronization engine depends on.
//!
//! [`Transport`] is the minimum surface the tree walkers need; the
//! production implementation speaks SFTP over one russh session, and
//! tests substitute an in-memory double with failure injection.

use async_trait::async_trait;
use russh::Disconnect;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::{OpenFlags, StatusCode};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::error::{Error, Result};
use super::session::ClientHandler;

/// Metadata for one remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
}

/// One remote directory entry, classified by transport metadata rather
/// than naming conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Remote file and directory operations over one authenticated session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Metadata for `path`, or [`Error::NotFound`] if it does not exist.
    async fn stat(&self, path: &str) -> Result<FileStat>;

    /// Create a single directory level.
    async fn mkdir(&self, path: &str) -> Result<()>;

    /// List a remote directory, in whatever order the server returns.
    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Copy a remote file's bytes to a local path, overwriting.
    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<()>;

    /// Copy a local file's bytes to a remote path, overwriting.
    async fn put(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    /// Close the session. Safe to call after per-file failures.
    async fn close(&self) -> Result<()>;
}

/// Production transport: one SFTP subsystem channel on one SSH session.
pub struct SftpTransport {
    handle: russh::client::Handle<ClientHandler>,
    sftp: SftpSession,
    host: String,
}

impl SftpTransport {
    /// Start the SFTP subsystem on an authenticated session handle.
    pub(crate) async fn open(
        handle: russh::client::Handle<ClientHandler>,
        host: String,
    ) -> Result<Self> {
        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| Error::Channel(format!("failed to open SSH channel: {e}")))?;
        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| Error::Channel(format!("failed to request SFTP subsystem: {e}")))?;

        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(Error::Sftp)?;

        tracing::debug!("SFTP subsystem ready on {}", host);

        Ok(Self { handle, sftp, host })
    }
}

impl std::fmt::Debug for SftpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpTransport")
            .field("host", &self.host)
            .finish()
    }
}

/// Distinguish "path does not exist" from every other SFTP failure, so
/// stat callers can react to a missing path without a server round trip
/// of their own.
fn map_stat_error(path: &str, e: russh_sftp::client::error::Error) -> Error {
    match e {
        russh_sftp::client::error::Error::Status(status)
            if status.status_code == StatusCode::NoSuchFile =>
        {
            Error::NotFound(path.to_string())
        }
        other => Error::Sftp(other),
    }
}

#[async_trait]
impl Transport for SftpTransport {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        match self.sftp.metadata(path).await {
            Ok(attrs) => Ok(FileStat {
                is_dir: attrs.is_dir(),
            }),
            Err(e) => Err(map_stat_error(path, e)),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<()> {
        self.sftp.create_dir(path).await.map_err(Error::Sftp)
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let entries = self.sftp.read_dir(path).await.map_err(Error::Sftp)?;

        let mut listing = Vec::new();
        for entry in entries {
            let name = entry.file_name();
            if name == "." || name == ".." {
                continue;
            }
            let is_dir = entry.metadata().is_dir();
            listing.push(RemoteEntry { name, is_dir });
        }
        Ok(listing)
    }

    async fn get(&self, remote_path: &str, local_path: &Path) -> Result<()> {
        let mut remote_file = self
            .sftp
            .open_with_flags(remote_path, OpenFlags::READ)
            .await
            .map_err(Error::Sftp)?;

        let mut contents = Vec::new();
        remote_file
            .read_to_end(&mut contents)
            .await
            .map_err(Error::Io)?;

        tokio::fs::write(local_path, contents)
            .await
            .map_err(Error::Io)
    }

    async fn put(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let contents = tokio::fs::read(local_path).await.map_err(Error::Io)?;

        let mut remote_file = self
            .sftp
            .open_with_flags(
                remote_path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await
            .map_err(Error::Sftp)?;

        remote_file.write_all(&contents).await.map_err(Error::Io)?;
        remote_file.flush().await.map_err(Error::Io)?;
        remote_file.shutdown().await.map_err(Error::Io)?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!("disconnecting from {}", self.host);
        self.handle
            .disconnect(Disconnect::ByApplication, "", "")
            .await
            .map_err(Error::Ssh)
    }
}

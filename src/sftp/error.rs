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

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for session establishment and transfer operations
#[derive(Debug)]
pub enum Error {
    /// IO error
    Io(io::Error),
    /// SSH error from russh
    Ssh(russh::Error),
    /// SFTP error from russh-sftp
    Sftp(russh_sftp::client::error::Error),
    /// Keyfile decodable by none of the supported formats
    UnrecognizedKeyFormat(PathBuf),
    /// Server rejected the offered public key
    KeyAuthRejected,
    /// Server rejected the password
    PasswordRejected,
    /// All authentication strategies exhausted; carries the first failure
    AuthenticationFailed(Box<Error>),
    /// Neither a usable keyfile nor a password is configured
    NoCredentials,
    /// Remote path does not exist
    NotFound(String),
    /// Channel or subsystem setup failed
    Channel(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Ssh(e) => write!(f, "SSH error: {e}"),
            Error::Sftp(e) => write!(f, "SFTP error: {e}"),
            Error::UnrecognizedKeyFormat(path) => {
                write!(f, "unrecognized private key format: {}", path.display())
            }
            Error::KeyAuthRejected => write!(f, "public key was rejected by the server"),
            Error::PasswordRejected => write!(f, "password was rejected by the server"),
            Error::AuthenticationFailed(e) => write!(f, "authentication failed: {e}"),
            Error::NoCredentials => write!(f, "no credentials supplied"),
            Error::NotFound(path) => write!(f, "not found: {path}"),
            Error::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Ssh(e) => Some(e),
            Error::Sftp(e) => Some(e),
            Error::AuthenticationFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// True for failures caused by the configuration itself, which abort
    /// the run before any connection attempt.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::NoCredentials)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<russh::Error> for Error {
    fn from(e: russh::Error) -> Self {
        Error::Ssh(e)
    }
}

impl From<russh_sftp::client::error::Error> for Error {
    fn from(e: russh_sftp::client::error::Error) -> Self {
        Error::Sftp(e)
    }
}

/// Result type for session and transfer operations
pub type Result<T> = std::result::Result<T, Error>;

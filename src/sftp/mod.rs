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

//! SFTP client layer based on russh and russh-sftp.
//!
//! Covers credential resolution (key-format probing with password
//! fallback), session establishment, and the [`Transport`] surface the
//! synchronization engine drives: stat, mkdir, listdir, get, put, close.

pub mod auth;
pub mod error;
pub mod session;
pub mod transport;

pub use auth::{resolve_key, DecodedKey, KeyFormat};
pub use error::{Error, Result};
pub use session::{connect, AuthPlan};
pub use transport::{FileStat, RemoteEntry, SftpTransport, Transport};

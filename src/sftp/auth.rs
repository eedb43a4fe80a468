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

//! Credential resolution.
//!
//! A keyfile is probed against the supported private key formats in a
//! fixed order; the first format that claims the decoded key wins. If no
//! format claims it, the file is reported as unrecognized with its path.

use russh_keys::{decode_secret_key, key};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::error::{Error, Result};

/// Supported private key formats, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    Rsa,
    Dsa,
    Ecdsa,
    Ed25519,
}

impl KeyFormat {
    /// Fixed probe order. Order only affects which format gets named in
    /// diagnostics; valid keys match exactly one format.
    pub const PROBE_ORDER: [KeyFormat; 4] = [
        KeyFormat::Rsa,
        KeyFormat::Dsa,
        KeyFormat::Ecdsa,
        KeyFormat::Ed25519,
    ];

    /// Whether a decoded key's SSH algorithm name belongs to this format.
    pub fn claims(self, algorithm: &str) -> bool {
        match self {
            KeyFormat::Rsa => algorithm == "ssh-rsa" || algorithm.starts_with("rsa-sha2-"),
            KeyFormat::Dsa => algorithm == "ssh-dss",
            KeyFormat::Ecdsa => algorithm.starts_with("ecdsa-sha2-"),
            KeyFormat::Ed25519 => algorithm == "ssh-ed25519",
        }
    }

    /// Classify an algorithm name, honoring the probe order.
    pub fn classify(algorithm: &str) -> Option<KeyFormat> {
        Self::PROBE_ORDER
            .into_iter()
            .find(|format| format.claims(algorithm))
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFormat::Rsa => write!(f, "RSA"),
            KeyFormat::Dsa => write!(f, "DSA"),
            KeyFormat::Ecdsa => write!(f, "ECDSA"),
            KeyFormat::Ed25519 => write!(f, "Ed25519"),
        }
    }
}

/// A private key decoded from a keyfile, tagged with the format that
/// claimed it. Discarded after authentication completes.
#[derive(Clone)]
pub struct DecodedKey {
    pub key: Arc<key::KeyPair>,
    pub format: KeyFormat,
}

impl fmt::Debug for DecodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedKey")
            .field("format", &self.format)
            .finish()
    }
}

/// Decode the private key at `path`, probing the supported formats.
///
/// Fails with [`Error::UnrecognizedKeyFormat`] carrying the path when the
/// file decodes under none of them.
pub fn resolve_key(path: &Path, passphrase: Option<&str>) -> Result<DecodedKey> {
    let data = std::fs::read_to_string(path).map_err(Error::Io)?;

    let key = decode_secret_key(&data, passphrase)
        .map_err(|e| {
            tracing::debug!("key decode failed for {:?}: {}", path, e);
            Error::UnrecognizedKeyFormat(path.to_path_buf())
        })?;

    let format = KeyFormat::classify(key.name())
        .ok_or_else(|| Error::UnrecognizedKeyFormat(path.to_path_buf()))?;

    tracing::debug!("keyfile {:?} decoded as {}", path, format);

    Ok(DecodedKey {
        key: Arc::new(key),
        format,
    })
}

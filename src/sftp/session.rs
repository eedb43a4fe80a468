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

//! Session establishment.
//!
//! Authentication strategy, in strict priority order:
//! 1. a configured keyfile that exists on disk is tried first;
//! 2. if the key attempt fails and a password is configured, password
//!    authentication is tried next — a fallback failure propagates the
//!    original key error, not the password error;
//! 3. with no usable keyfile, a configured password is tried directly;
//! 4. with neither, the run aborts before any connection is opened.

use async_trait::async_trait;
use russh_keys::key::PublicKey;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::TransferConfig;
use crate::sync::event::{Level, Reporter};

use super::auth::{resolve_key, KeyFormat};
use super::error::{Error, Result};
use super::transport::SftpTransport;

/// The credential strategy derived from the configuration, fixed before
/// any network traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPlan {
    /// Try the keyfile; fall back to the password if one is configured.
    Key {
        keyfile: PathBuf,
        fallback: Option<String>,
    },
    /// No usable keyfile; go straight to password authentication.
    Password(String),
}

impl AuthPlan {
    /// Derive the strategy from the configuration.
    ///
    /// A keyfile that does not exist on disk is skipped rather than
    /// reported, matching the priority order above. With no usable
    /// credential at all this fails with [`Error::NoCredentials`] and
    /// the caller must not open a connection.
    pub fn from_config(config: &TransferConfig) -> Result<Self> {
        if let Some(keyfile) = &config.keyfile {
            if keyfile.exists() {
                return Ok(AuthPlan::Key {
                    keyfile: keyfile.clone(),
                    fallback: config.password.clone(),
                });
            }
            tracing::debug!(
                "configured keyfile {:?} not found on disk, skipping key authentication",
                keyfile
            );
        }

        if let Some(password) = &config.password {
            return Ok(AuthPlan::Password(password.clone()));
        }

        Err(Error::NoCredentials)
    }
}

/// russh client handler.
///
/// Host keys are accepted without verification; the endpoint comes from
/// the operator's own configuration. The key is still logged so it can
/// be pinned manually.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    host: String,
    port: u16,
}

#[async_trait]
impl russh::client::Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        tracing::debug!(
            "accepting host key for {}:{} ({})",
            self.host,
            self.port,
            server_public_key.name()
        );
        Ok(true)
    }
}

/// Open a connection, authenticate per the configured strategy, and
/// start the SFTP subsystem.
///
/// The returned transport is the sole channel for the remainder of the
/// run; the caller closes it on every exit path.
pub async fn connect(config: &TransferConfig, reporter: &dyn Reporter) -> Result<SftpTransport> {
    // Resolve the strategy first: a credential-less configuration must
    // fail without opening a socket.
    let plan = AuthPlan::from_config(config)?;

    let ssh_config = russh::client::Config {
        inactivity_timeout: Some(Duration::from_secs(300)),
        ..Default::default()
    };
    let handler = ClientHandler {
        host: config.host.clone(),
        port: config.port,
    };

    tracing::debug!("connecting to {}:{}", config.host, config.port);

    let mut handle = russh::client::connect(
        Arc::new(ssh_config),
        (config.host.as_str(), config.port),
        handler,
    )
    .await?;

    let mut auth = SshAuth {
        handle: &mut handle,
    };
    authenticate(&mut auth, config, plan, reporter).await?;

    SftpTransport::open(handle, config.host.clone()).await
}

/// The two attempts the fallback logic can make, behind a seam so the
/// ordering and error propagation are testable without a live server.
#[async_trait]
trait AuthAttempts: Send {
    async fn key(&mut self, username: &str, keyfile: &Path) -> Result<KeyFormat>;
    async fn password(&mut self, username: &str, password: &str) -> Result<()>;
}

struct SshAuth<'a> {
    handle: &'a mut russh::client::Handle<ClientHandler>,
}

#[async_trait]
impl AuthAttempts for SshAuth<'_> {
    async fn key(&mut self, username: &str, keyfile: &Path) -> Result<KeyFormat> {
        let decoded = resolve_key(keyfile, None)?;

        let accepted = self
            .handle
            .authenticate_publickey(username, decoded.key)
            .await?;
        if accepted {
            Ok(decoded.format)
        } else {
            Err(Error::KeyAuthRejected)
        }
    }

    async fn password(&mut self, username: &str, password: &str) -> Result<()> {
        let accepted = self.handle.authenticate_password(username, password).await?;
        if accepted {
            Ok(())
        } else {
            Err(Error::PasswordRejected)
        }
    }
}

async fn authenticate(
    auth: &mut dyn AuthAttempts,
    config: &TransferConfig,
    plan: AuthPlan,
    reporter: &dyn Reporter,
) -> Result<()> {
    let who = format!("{}@{}", config.username, config.host);

    match plan {
        AuthPlan::Key { keyfile, fallback } => {
            match auth.key(&config.username, &keyfile).await {
                Ok(format) => {
                    reporter.log(
                        Level::Info,
                        &format!("key authentication succeeded ({format}): {who}"),
                    );
                    Ok(())
                }
                Err(key_err) => {
                    reporter.log(
                        Level::Error,
                        &format!(
                            "key authentication failed, switching to password: {key_err}"
                        ),
                    );
                    let Some(password) = fallback else {
                        return Err(Error::AuthenticationFailed(Box::new(key_err)));
                    };
                    match auth.password(&config.username, &password).await {
                        Ok(()) => {
                            reporter.log(
                                Level::Info,
                                &format!(
                                    "password authentication succeeded after key failure: {who}"
                                ),
                            );
                            Ok(())
                        }
                        Err(password_err) => {
                            tracing::debug!("password fallback also failed: {password_err}");
                            // The key error is the distinguishing one.
                            Err(Error::AuthenticationFailed(Box::new(key_err)))
                        }
                    }
                }
            }
        }
        AuthPlan::Password(password) => {
            match auth.password(&config.username, &password).await {
                Ok(()) => {
                    reporter.log(
                        Level::Info,
                        &format!("password authentication succeeded: {who}"),
                    );
                    Ok(())
                }
                Err(e) => Err(Error::AuthenticationFailed(Box::new(e))),
            }
        }
    }
}

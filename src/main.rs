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

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use sftpsync::{
    cli::Cli,
    config::TransferConfig,
    sftp::{self, Transport},
    sync::{
        self,
        event::{Level, Reporter, TracingReporter},
    },
    utils::init_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let _log_guard = init_logging(cli.verbose, &log_dir);

    let reporter = TracingReporter;

    match run(&cli, &reporter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Batch tool: the log is the record, not a synchronous human.
            reporter.log(Level::Critical, &format!("fatal error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, reporter: &dyn Reporter) -> Result<()> {
    let config_path = cli.config_path();

    if !config_path.exists() {
        TransferConfig::write_template(&config_path).await?;
        println!(
            "[INFO] no configuration found, template written to {}",
            config_path.display()
        );
        println!("[INFO] edit the template and run again.");
        std::process::exit(1);
    }

    let config = TransferConfig::load(&config_path).await?;
    tracing::info!("configuration loaded from {}", config_path.display());

    let transport = sftp::connect(&config, reporter)
        .await
        .with_context(|| format!("cannot establish session to {}:{}", config.host, config.port))?;

    // Per-file failures are swallowed inside the walkers; whatever comes
    // back here is run-level. The session is closed either way.
    let result = sync::run(&config, &transport, reporter).await;

    if let Err(e) = transport.close().await {
        tracing::warn!("session close failed: {e}");
    }
    reporter.log(Level::Info, "SFTP session closed");

    result.context("synchronization run failed")
}

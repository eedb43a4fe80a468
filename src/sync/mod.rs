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

//! Directory synchronization engine.
//!
//! One run walks a source tree (local filesystem or remote listing),
//! mirrors its directory structure on the destination, and transfers
//! every file unconditionally — no change detection. Per-file failures
//! are logged through the [`event::Reporter`] and never abort the walk;
//! only session establishment and configuration failures end the run.

pub mod download;
pub mod event;
pub mod remote_dirs;
pub mod upload;

use crate::config::{Direction, TransferConfig};
use crate::sftp::{Result, Transport};

pub use download::download;
pub use event::{Level, MemoryReporter, Reporter, TracingReporter, TransferEvent};
pub use remote_dirs::ensure_remote_dirs;
pub use upload::upload;

/// Run one synchronization pass in the configured direction.
///
/// The caller owns the session and closes it on every exit path after
/// the queued work has been attempted.
pub async fn run(
    config: &TransferConfig,
    transport: &dyn Transport,
    reporter: &dyn Reporter,
) -> Result<()> {
    match config.direction {
        Direction::Upload => upload(transport, &config.local, &config.remote, reporter).await,
        Direction::Download => download(transport, &config.remote, &config.local, reporter).await,
    }
}

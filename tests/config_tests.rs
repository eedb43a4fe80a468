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

//! Configuration loading, normalization and template generation.

use sftpsync::config::{Direction, TransferConfig};

#[tokio::test]
async fn template_round_trips_through_the_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sftpsync.json");

    TransferConfig::write_template(&path).await.unwrap();
    let config = TransferConfig::load(&path).await.unwrap();

    assert_eq!(config.host, "sftp.example.com");
    assert_eq!(config.port, 22);
    assert_eq!(config.direction, Direction::Upload);
    // The placeholder empty password must not count as a credential.
    assert_eq!(config.password, None);
    assert!(config.keyfile.is_some());
}

#[tokio::test]
async fn invalid_direction_is_reported_with_the_accepted_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    tokio::fs::write(
        &path,
        r#"{
            "host": "h",
            "username": "u",
            "password": "pw",
            "direction": "both",
            "local": "/a",
            "remote": "/b"
        }"#,
    )
    .await
    .unwrap();

    let err = TransferConfig::load(&path).await.unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("upload"));
    assert!(rendered.contains("download"));
}

#[tokio::test]
async fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");

    let err = TransferConfig::load(&path).await.unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
}

#[tokio::test]
async fn port_defaults_to_22_and_explicit_port_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("port.json");
    tokio::fs::write(
        &path,
        r#"{
            "host": "h",
            "port": 2222,
            "username": "u",
            "password": "pw",
            "direction": "download",
            "local": "/a",
            "remote": "/b"
        }"#,
    )
    .await
    .unwrap();

    let config = TransferConfig::load(&path).await.unwrap();
    assert_eq!(config.port, 2222);
    assert!(config.has_credentials());
}

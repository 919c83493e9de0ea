// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Well-known defaults and file-based configuration.
//!
//! The constants mirror the values compiled into `gst-switch-srv`. The
//! [`SwitchConfig`] family can be loaded from JSON; loaded values are plain
//! data and only become trusted once they pass through
//! [`crate::Endpoint::try_from`] and [`crate::Server::from_config`], which run
//! the same validators as programmatic input.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Address the server listens on for control connections.
pub const DEFAULT_ADDRESS: &str = "unix:abstract=gstswitch";

/// Object path of the server's controller object.
pub const DEFAULT_OBJECT_PATH: &str = "/info/duzy/gst/switch/SwitchController";

/// Interface implemented by the controller object.
pub const DEFAULT_INTERFACE: &str = "info.duzy.gst.switch.SwitchControllerInterface";

pub const DEFAULT_VIDEO_PORT: u16 = 3000;
pub const DEFAULT_AUDIO_PORT: u16 = 4000;
pub const DEFAULT_CONTROL_PORT: u16 = 5000;
pub const DEFAULT_PREVIEW_PORT: u16 = 3001;
pub const DEFAULT_RECORD_FILE: &str = "record.data";

/// Name of the server executable inside the configured path.
pub const SERVER_EXECUTABLE: &str = "gst-switch-srv";

/// File receiving the server's stdout and stderr.
pub const SERVER_LOG_FILE: &str = "server.log";

/// Time given to a freshly spawned server to open its ports and bus address.
pub const SLEEP_TIME: Duration = Duration::from_millis(500);

/// How long [`crate::Server::terminate`] waits for the server to exit after
/// SIGTERM before giving up on reaping it.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Program run to build coverage reports.
pub const MAKE_PROGRAM: &str = "make";

/// Flags used for every bus connection: authenticate as a client of a
/// peer-to-peer address.
pub const CONNECTION_FLAGS: gio::DBusConnectionFlags =
    gio::DBusConnectionFlags::AUTHENTICATION_CLIENT;

/// Timeout for remote calls, in milliseconds. `i32::MAX` is GIO's "no
/// timeout": a hung server blocks the caller indefinitely.
pub const CALL_TIMEOUT_MSEC: i32 = i32::MAX;

/// Returns the directory holding the server build tree (`../tools` relative
/// to the working directory), where `make coverage` is run.
pub fn default_tools_dir() -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| cwd.parent().map(|parent| parent.join("tools")))
        .unwrap_or_else(|| PathBuf::from("../tools"))
}

/// Identity of the remote controller object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub address: String,
    pub bus_name: Option<String>,
    pub object_path: String,
    pub default_interface: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_owned(),
            bus_name: None,
            object_path: DEFAULT_OBJECT_PATH.to_owned(),
            default_interface: DEFAULT_INTERFACE.to_owned(),
        }
    }
}

/// How to launch `gst-switch-srv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory containing the server executable.
    pub path: PathBuf,
    pub video_port: u16,
    pub audio_port: u16,
    pub control_port: u16,
    pub record_file: String,
    pub log_file: PathBuf,
    pub tools_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/usr/local/bin"),
            video_port: DEFAULT_VIDEO_PORT,
            audio_port: DEFAULT_AUDIO_PORT,
            control_port: DEFAULT_CONTROL_PORT,
            record_file: DEFAULT_RECORD_FILE.to_owned(),
            log_file: PathBuf::from(SERVER_LOG_FILE),
            tools_dir: default_tools_dir(),
        }
    }
}

/// Complete client-side configuration.
///
/// ```
/// use gstswitch::config::SwitchConfig;
///
/// let config = SwitchConfig::from_json_str(r#"{"server": {"video_port": 7000}}"#).unwrap();
/// assert_eq!(config.server.video_port, 7000);
/// assert_eq!(config.server.audio_port, 4000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    pub endpoint: EndpointConfig,
    pub server: ServerConfig,
}

impl SwitchConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

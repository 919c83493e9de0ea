// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for gst-switch operations.
//!
//! Every failure of the control client, the server process manager and the
//! media helpers is reported through the single flat [`Error`] enum. Raw
//! transport (`glib::Error`), OS (`std::io::Error`, `errno`) and
//! pipeline failures are translated into one of these variants before they
//! leave the crate.

use std::path::PathBuf;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when configuring or driving a gst-switch server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value was blank or violates a format rule
    /// (e.g. an address without a `:`).
    #[error("{field} '{value}' {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A configuration value could not be coerced to the required primitive.
    #[error("{field} must be {expected}, not '{value}'")]
    InvalidType {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A numeric configuration value lies outside its closed valid interval.
    #[error("{field} must be {bounds}, not {value}")]
    Range {
        field: &'static str,
        value: String,
        bounds: String,
    },

    /// An index into a collection of running test sources is not an
    /// integer or is out of range.
    #[error("{0}")]
    InvalidIndex(String),

    /// The server executable could not be found at the configured path.
    #[error("Cannot find {executable} at path: '{}'", path.display())]
    Path {
        executable: &'static str,
        path: PathBuf,
    },

    /// Any other server process lifecycle failure (spawn, signal, missing process).
    #[error("{0}")]
    ServerProcess(String),

    /// The bus connection could not be opened, or a remote call failed.
    #[error("{0}")]
    Connection(String),

    /// A reply could not be unwrapped into the expected shape.
    #[error("{0}")]
    ConnectionReturn(String),

    /// An operation needed a running pipeline but none exists.
    #[error("{0}")]
    NotRunning(String),

    /// GStreamer could not build a pipeline or change its state.
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Failed to read a configuration file.
    #[error("Reading configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Failed to parse a configuration document.
    #[error("Parsing configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn blank(field: &'static str, value: impl ToString) -> Self {
        Error::InvalidValue {
            field,
            value: value.to_string(),
            reason: "cannot be blank".to_string(),
        }
    }

    /// Builds the [`Error::Connection`] reported when a remote call fails.
    ///
    /// The message names the remote method and carries the transport's own
    /// diagnostic.
    pub(crate) fn remote_call(method: &str, source: &glib::Error) -> Self {
        Error::Connection(format!("{method}: {}", source.message()))
    }
}

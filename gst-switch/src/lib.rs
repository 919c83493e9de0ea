// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! # gst-switch client
//!
//! Control and test-harness library for the `gst-switch-srv` audio/video
//! mixing server.
//!
//! ## Overview
//!
//! The mixing itself (composition, encoding, port multiplexing) happens in
//! the external server process. This crate provides the client side:
//!
//! - **Validators** ([`validate`]): checks for ports, paths, bus addresses,
//!   object paths and interface names, shared by every component
//! - **Connection** ([`Connection`]): one method per remote operation,
//!   marshalling arguments into D-Bus tuples and returning raw replies
//! - **Controller** ([`Controller`]): unwraps replies into native values and
//!   owns the connection lifecycle
//! - **Server** ([`Server`]): spawns, terminates and kills `gst-switch-srv`
//!
//! Test video/audio sources and preview sinks live in the companion
//! `gst-switch-helpers` crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   spawns    ┌────────────────┐
//! │  Server  │ ──────────► │ gst-switch-srv │
//! └──────────┘             └───────▲────────┘
//!                                  │ D-Bus (unix:abstract=gstswitch)
//! ┌────────────┐   owns   ┌────────┴───┐
//! │ Controller │ ───────► │ Connection │
//! └────────────┘          └────────────┘
//! ```
//!
//! The server and controller only meet through the port numbers and bus
//! address the caller gives them.
//!
//! ## Example
//!
//! ```no_run
//! use gstswitch::{Controller, Server};
//!
//! # fn main() -> Result<(), gstswitch::Error> {
//! let mut server = Server::new("/usr/local/bin/")?;
//! server.set_video_port(3000)?;
//! server.run("")?;
//!
//! let mut controller = Controller::default();
//! controller.establish_connection()?;
//! println!("compose port: {}", controller.get_compose_port()?);
//! controller.set_composite_mode(1)?;
//!
//! server.terminate(false)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! Everything here is synchronous and meant for a single caller. Remote
//! calls block without timeout; [`Server::run`] blocks for
//! [`config::SLEEP_TIME`] after spawning.

mod endpoint;
mod error;

pub mod config;
pub mod connection;
pub mod controller;
pub mod dbus;
pub mod server;
pub mod validate;

pub use connection::{Connection, Face};
pub use controller::Controller;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use glib::Variant;
pub use server::Server;

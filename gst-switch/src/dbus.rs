// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! The bus transport behind [`crate::Connection`].
//!
//! The wire protocol and type system belong to GIO. This module only defines
//! the two seams the client needs, opening a connection ([`Connector`]) and
//! issuing one synchronous method call on it ([`Transport`]), together with
//! their GIO implementation. Tests plug in a recording fake instead.

use std::borrow::Cow;

use glib::{Variant, VariantTy};

use crate::config::CALL_TIMEOUT_MSEC;

/// One remote method invocation, fully addressed.
#[derive(Debug, Clone)]
pub struct MethodCall<'a> {
    pub bus_name: Option<&'a str>,
    pub object_path: &'a str,
    pub interface: &'a str,
    /// Literal remote method name, e.g. `"get_compose_port"`.
    pub method: &'a str,
    /// Argument tuple, or `None` for methods without input arguments.
    pub args: Option<Variant>,
    /// Expected reply tuple type; `None` accepts whatever the server sends.
    pub reply_type: Option<Cow<'static, VariantTy>>,
}

/// A live connection able to perform synchronous method calls.
pub trait Transport {
    /// Performs the call and returns the raw reply tuple.
    fn invoke(&self, call: &MethodCall<'_>) -> Result<Variant, glib::Error>;
}

/// Opens [`Transport`]s to a bus address.
pub trait Connector {
    type Transport: Transport;

    fn connect(
        &self,
        address: &str,
        flags: gio::DBusConnectionFlags,
    ) -> Result<Self::Transport, glib::Error>;
}

impl Transport for gio::DBusConnection {
    fn invoke(&self, call: &MethodCall<'_>) -> Result<Variant, glib::Error> {
        self.call_sync(
            call.bus_name,
            call.object_path,
            call.interface,
            call.method,
            call.args.as_ref(),
            call.reply_type.as_deref(),
            gio::DBusCallFlags::NONE,
            CALL_TIMEOUT_MSEC,
            gio::Cancellable::NONE,
        )
    }
}

/// Connects through GIO's `GDBusConnection`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GioConnector;

impl Connector for GioConnector {
    type Transport = gio::DBusConnection;

    fn connect(
        &self,
        address: &str,
        flags: gio::DBusConnectionFlags,
    ) -> Result<gio::DBusConnection, glib::Error> {
        gio::DBusConnection::for_address_sync(
            address,
            flags,
            None::<&gio::DBusAuthObserver>,
            gio::Cancellable::NONE,
        )
    }
}

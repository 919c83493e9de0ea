// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Raw remote calls to the gst-switch controller object.
//!
//! [`Connection`] marshals each operation's arguments into the typed tuple
//! the server expects, performs one synchronous call and hands back the raw
//! reply [`Variant`]. Unwrapping the reply is left to [`crate::Controller`].
//!
//! | Method               | Arguments                  | Reply    |
//! |----------------------|----------------------------|----------|
//! | `get_compose_port`   | none                       | `(i)`    |
//! | `get_encode_port`    | none                       | `(i)`    |
//! | `get_audio_port`     | none                       | `(i)`    |
//! | `get_preview_ports`  | none                       | `(s)`    |
//! | `set_composite_mode` | `(i)`                      | `(b)`    |
//! | `set_encode_mode`    | `(i)`                      | `(b)`    |
//! | `new_record`         | none                       | `(b)`    |
//! | `adjust_pip`         | `(iiii)`                   | `(u)`    |
//! | `switch`             | `(ii)`                     | `(b)`    |
//! | `click_video`        | `(iiii)`                   | `(b)`    |
//! | `mark_face`          | `(a(iiii))`                | ignored  |
//! | `mark_tracking`      | `(a(iiii))`                | ignored  |

use std::borrow::Cow;

use glib::{Variant, VariantTy, prelude::*};
use tracing::{debug, trace};

use crate::{
    Endpoint, Error, Result,
    config::CONNECTION_FLAGS,
    dbus::{Connector, GioConnector, MethodCall, Transport},
};

/// A face or tracking rectangle: x, y, width, height.
pub type Face = (i32, i32, i32, i32);

fn reply_type<T: StaticVariantType>() -> Option<Cow<'static, VariantTy>> {
    Some(T::static_variant_type())
}

/// One connection to the controller object of a running server.
///
/// The connection is opened explicitly with [`Connection::connect_dbus`] and
/// then reused by every call made through this instance. Calling a remote
/// method before connecting fails with [`Error::Connection`].
pub struct Connection<C: Connector = GioConnector> {
    endpoint: Endpoint,
    connector: C,
    connection: Option<C::Transport>,
}

impl Connection<GioConnector> {
    /// Creates an unconnected GIO-backed connection to `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_connector(endpoint, GioConnector)
    }
}

impl Default for Connection<GioConnector> {
    fn default() -> Self {
        Self::new(Endpoint::default())
    }
}

impl<C: Connector> Connection<C> {
    /// Creates an unconnected connection that opens its transport through
    /// `connector`.
    pub fn with_connector(endpoint: Endpoint, connector: C) -> Self {
        Self {
            endpoint,
            connector,
            connection: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Opens the transport to the endpoint's bus address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] naming the address and the transport's
    /// diagnostic if the connection cannot be established.
    pub fn connect_dbus(&mut self) -> Result<()> {
        let address = self.endpoint.address();
        let transport = self
            .connector
            .connect(address, CONNECTION_FLAGS)
            .map_err(|error| {
                Error::Connection(format!(
                    "Connection error for address '{address}': {}",
                    error.message()
                ))
            })?;
        debug!(address, "connected to gst-switch controller");
        self.connection = Some(transport);
        Ok(())
    }

    fn call(
        &self,
        method: &str,
        args: Option<Variant>,
        reply_type: Option<Cow<'static, VariantTy>>,
    ) -> Result<Variant> {
        let transport = self.connection.as_ref().ok_or_else(|| {
            Error::Connection(format!(
                "{method}: not connected to '{}', call connect_dbus() first",
                self.endpoint.address()
            ))
        })?;
        let call = MethodCall {
            bus_name: self.endpoint.bus_name(),
            object_path: self.endpoint.object_path(),
            interface: self.endpoint.default_interface(),
            method,
            args,
            reply_type,
        };
        trace!(method, args = ?call.args, "remote call");
        transport
            .invoke(&call)
            .map_err(|error| Error::remote_call(method, &error))
    }

    /// `get_compose_port(out i port)`
    pub fn get_compose_port(&self) -> Result<Variant> {
        self.call("get_compose_port", None, reply_type::<(i32,)>())
    }

    /// `get_encode_port(out i port)`
    pub fn get_encode_port(&self) -> Result<Variant> {
        self.call("get_encode_port", None, reply_type::<(i32,)>())
    }

    /// `get_audio_port(out i port)`
    pub fn get_audio_port(&self) -> Result<Variant> {
        self.call("get_audio_port", None, reply_type::<(i32,)>())
    }

    /// `get_preview_ports(out s ports)`; the string looks like
    /// `"[(3002, 1, 7), (3003, 1, 8)]"`.
    pub fn get_preview_ports(&self) -> Result<Variant> {
        self.call("get_preview_ports", None, reply_type::<(String,)>())
    }

    /// `set_composite_mode(in i mode, out b result)`
    pub fn set_composite_mode(&self, mode: i32) -> Result<Variant> {
        self.call(
            "set_composite_mode",
            Some((mode,).to_variant()),
            reply_type::<(bool,)>(),
        )
    }

    /// `set_encode_mode(in i channel, out b result)`; the server does not
    /// act on it.
    pub fn set_encode_mode(&self, channel: i32) -> Result<Variant> {
        self.call(
            "set_encode_mode",
            Some((channel,).to_variant()),
            reply_type::<(bool,)>(),
        )
    }

    /// `new_record(out b result)`
    pub fn new_record(&self) -> Result<Variant> {
        self.call("new_record", None, reply_type::<(bool,)>())
    }

    /// `adjust_pip(in i dx, in i dy, in i dw, in i dh, out u result)`
    pub fn adjust_pip(&self, xpos: i32, ypos: i32, width: i32, height: i32) -> Result<Variant> {
        self.call(
            "adjust_pip",
            Some((xpos, ypos, width, height).to_variant()),
            reply_type::<(u32,)>(),
        )
    }

    /// `switch(in i channel, in i port, out b result)`
    pub fn switch(&self, channel: i32, port: i32) -> Result<Variant> {
        self.call(
            "switch",
            Some((channel, port).to_variant()),
            reply_type::<(bool,)>(),
        )
    }

    /// `click_video(in i x, in i y, in i fw, in i fh, out b result)`
    pub fn click_video(&self, xpos: i32, ypos: i32, width: i32, height: i32) -> Result<Variant> {
        self.call(
            "click_video",
            Some((xpos, ypos, width, height).to_variant()),
            reply_type::<(bool,)>(),
        )
    }

    /// `mark_face(in a(iiii) faces)`
    pub fn mark_face(&self, faces: &[Face]) -> Result<Variant> {
        self.call("mark_face", Some((faces.to_vec(),).to_variant()), None)
    }

    /// `mark_tracking(in a(iiii) faces)`
    pub fn mark_tracking(&self, faces: &[Face]) -> Result<Variant> {
        self.call("mark_tracking", Some((faces.to_vec(),).to_variant()), None)
    }
}

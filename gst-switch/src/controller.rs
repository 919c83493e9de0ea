// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! High-level control of a running gst-switch server.
//!
//! [`Controller`] owns a [`Connection`] and turns its raw replies into native
//! values. Getters reuse the connection opened by
//! [`Controller::establish_connection`]; every operation that changes server
//! state opens a fresh connection first, as the server expects one control
//! session per request.

use glib::{Variant, variant::FromVariant};
use tracing::{debug, info};

use crate::{
    Endpoint, Error, Result,
    connection::{Connection, Face},
    dbus::{Connector, GioConnector},
};

const INVALID_REPLY: &str = "Connection returned invalid values. Should return a GVariant tuple";

/// Composite modes accepted by the server.
pub const COMPOSITE_MODES: std::ops::RangeInclusive<i32> = 0..=3;

/// Unwraps the single element of a reply tuple.
fn first<T: FromVariant>(reply: &Variant) -> Result<T> {
    reply
        .get::<(T,)>()
        .map(|(value,)| value)
        .ok_or_else(|| Error::ConnectionReturn(INVALID_REPLY.to_string()))
}

/// Client for the gst-switch controller interface.
///
/// ```no_run
/// use gstswitch::Controller;
///
/// # fn main() -> Result<(), gstswitch::Error> {
/// let mut controller = Controller::default();
/// controller.establish_connection()?;
/// let compose_port = controller.get_compose_port()?;
/// let previews = controller.get_preview_ports()?;
/// controller.switch('A' as i32, previews[0])?;
/// # let _ = compose_port;
/// # Ok(())
/// # }
/// ```
pub struct Controller<C: Connector + Clone = GioConnector> {
    endpoint: Endpoint,
    connector: C,
    connection: Option<Connection<C>>,
    composite_mode_result: Option<bool>,
}

impl Controller<GioConnector> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_connector(endpoint, GioConnector)
    }
}

impl Default for Controller<GioConnector> {
    fn default() -> Self {
        Self::new(Endpoint::default())
    }
}

impl<C: Connector + Clone> Controller<C> {
    /// Creates a controller whose connections are opened through `connector`.
    pub fn with_connector(endpoint: Endpoint, connector: C) -> Self {
        Self {
            endpoint,
            connector,
            connection: None,
            composite_mode_result: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Mutable access to the endpoint; its setters validate every change.
    /// Takes effect on the next [`Controller::establish_connection`].
    pub fn endpoint_mut(&mut self) -> &mut Endpoint {
        &mut self.endpoint
    }

    /// The connection created by the last [`Controller::establish_connection`].
    pub fn connection(&self) -> Option<&Connection<C>> {
        self.connection.as_ref()
    }

    /// Replaces the current connection with a fresh one and connects it.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Connection`] from [`Connection::connect_dbus`]. The
    /// new, unconnected connection is kept, so later calls fail until a
    /// connection succeeds.
    pub fn establish_connection(&mut self) -> Result<()> {
        let connection = self.connection.insert(Connection::with_connector(
            self.endpoint.clone(),
            self.connector.clone(),
        ));
        connection.connect_dbus()
    }

    fn connected(&self) -> Result<&Connection<C>> {
        self.connection.as_ref().ok_or_else(|| {
            Error::Connection(
                "Connection not established, call establish_connection() first".to_string(),
            )
        })
    }

    /// Port on which the composed output is served.
    pub fn get_compose_port(&self) -> Result<i32> {
        first(&self.connected()?.get_compose_port()?)
    }

    /// Port on which the encoded output is served.
    pub fn get_encode_port(&self) -> Result<i32> {
        first(&self.connected()?.get_encode_port()?)
    }

    /// Port on which the audio output is served.
    pub fn get_audio_port(&self) -> Result<i32> {
        first(&self.connected()?.get_audio_port()?)
    }

    /// One preview port per connected input source, in server order.
    pub fn get_preview_ports(&self) -> Result<Vec<i32>> {
        let ports: String = first(&self.connected()?.get_preview_ports()?)?;
        parse_preview_ports(&ports)
    }

    /// Selects one of the server's composite layouts.
    ///
    /// A mode outside [`COMPOSITE_MODES`] is ignored: no remote call is made
    /// and the result of the previous accepted request (or `None`) is
    /// returned.
    pub fn set_composite_mode(&mut self, mode: i32) -> Result<Option<bool>> {
        self.establish_connection()?;
        if COMPOSITE_MODES.contains(&mode) {
            let result: bool = first(&self.connected()?.set_composite_mode(mode)?)?;
            if result {
                info!("Set composite mode to {mode}");
            }
            self.composite_mode_result = Some(result);
        } else {
            debug!(mode, "composite mode out of range, ignored");
        }
        Ok(self.composite_mode_result)
    }

    /// Requests a new encode mode. The server accepts the call but does not
    /// act on it.
    pub fn set_encode_mode(&mut self, channel: i32) -> Result<bool> {
        self.establish_connection()?;
        let result: bool = first(&self.connected()?.set_encode_mode(channel)?)?;
        if result {
            info!("Set encode mode to {channel}");
        }
        Ok(result)
    }

    /// Starts a new recording file.
    pub fn new_record(&mut self) -> Result<bool> {
        self.establish_connection()?;
        let result: bool = first(&self.connected()?.new_record()?)?;
        if result {
            info!("New record");
        }
        Ok(result)
    }

    /// Moves and resizes the picture-in-picture overlay.
    pub fn adjust_pip(&mut self, xpos: i32, ypos: i32, width: i32, height: i32) -> Result<u32> {
        self.establish_connection()?;
        let result: u32 = first(&self.connected()?.adjust_pip(xpos, ypos, width, height)?)?;
        info!("adjust pip xpos:{xpos} ypos:{ypos} w:{width} h:{height}");
        Ok(result)
    }

    /// Switches `channel` (a channel letter such as `'A' as i32`) to the
    /// source on preview `port`.
    pub fn switch(&mut self, channel: i32, port: i32) -> Result<bool> {
        self.establish_connection()?;
        let result: bool = first(&self.connected()?.switch(channel, port)?)?;
        if result {
            info!("Switch channel:{channel} port:{port}");
        }
        Ok(result)
    }

    /// Forwards a click on the composed video at the given position and frame size.
    pub fn click_video(&mut self, xpos: i32, ypos: i32, width: i32, height: i32) -> Result<bool> {
        self.establish_connection()?;
        let result: bool = first(&self.connected()?.click_video(xpos, ypos, width, height)?)?;
        if result {
            info!("Click video: xpos:{xpos} ypos:{ypos} width:{width} height:{height}");
        }
        Ok(result)
    }

    /// Marks faces on the composed video. Any reply is discarded.
    pub fn mark_face(&mut self, faces: &[Face]) -> Result<()> {
        self.establish_connection()?;
        self.connected()?.mark_face(faces)?;
        Ok(())
    }

    /// Marks tracked regions on the composed video. Any reply is discarded.
    pub fn mark_tracking(&mut self, faces: &[Face]) -> Result<()> {
        self.establish_connection()?;
        self.connected()?.mark_tracking(faces)?;
        Ok(())
    }
}

/// Parses the `get_preview_ports` reply into the first element of each tuple.
///
/// Only a list of integer tuples is accepted, e.g.
/// `"[(3002, 1, 7), (3003, 1, 8)]"`; anything else is rejected with
/// [`Error::ConnectionReturn`].
///
/// ```
/// use gstswitch::controller::parse_preview_ports;
///
/// assert_eq!(parse_preview_ports("[(3002, 1, 7), (3003, 1, 8)]").unwrap(), vec![3002, 3003]);
/// assert!(parse_preview_ports("{}[]").is_err());
/// ```
pub fn parse_preview_ports(ports: &str) -> Result<Vec<i32>> {
    PortListParser::new(ports)
        .parse()
        .ok_or_else(|| Error::ConnectionReturn(format!("Connection returned invalid values:{ports}")))
}

struct PortListParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> PortListParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<Vec<i32>> {
        self.skip_whitespace();
        self.expect(b'[')?;
        let mut ports = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(b']') {
                break;
            }
            ports.push(self.tuple()?.first().copied()?);
            self.skip_whitespace();
            if self.eat(b']') {
                break;
            }
            self.expect(b',')?;
        }
        self.skip_whitespace();
        (self.pos == self.input.len()).then_some(ports)
    }

    /// `(int, int, ...)`; a single element needs a trailing comma, as a
    /// parenthesised integer is not a tuple.
    fn tuple(&mut self) -> Option<Vec<i32>> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            if self.eat(b')') {
                break;
            }
            items.push(self.integer()?);
            self.skip_whitespace();
            trailing_comma = self.eat(b',');
            if !trailing_comma {
                self.expect(b')')?;
                break;
            }
        }
        match items.len() {
            0 => None,
            1 if !trailing_comma => None,
            _ => Some(items),
        }
    }

    fn integer(&mut self) -> Option<i32> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let digits = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits {
            return None;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.eat(byte).then_some(())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

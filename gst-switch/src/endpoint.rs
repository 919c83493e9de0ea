// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Identity of the remote controller object.

use crate::{
    Result,
    config::{DEFAULT_ADDRESS, DEFAULT_INTERFACE, DEFAULT_OBJECT_PATH, EndpointConfig},
    validate::{self, Value},
};

/// Bus address, bus name, object path and interface of a gst-switch
/// controller.
///
/// Every field is validated on construction and on each later change, so an
/// `Endpoint` always holds values the transport can use.
///
/// ```
/// use gstswitch::{Endpoint, validate::Value};
///
/// let endpoint = Endpoint::new(
///     "unix:abstract=gstswitch",
///     Value::Null,
///     "/info/duzy/gst/switch/SwitchController",
///     "info.duzy.gst.switch.SwitchControllerInterface",
/// ).unwrap();
/// assert_eq!(endpoint.bus_name(), None);
///
/// assert!(Endpoint::new("abcdefghijk", Value::Null, "/a", "a.b.c").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    address: String,
    bus_name: Option<String>,
    object_path: String,
    default_interface: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_owned(),
            bus_name: None,
            object_path: DEFAULT_OBJECT_PATH.to_owned(),
            default_interface: DEFAULT_INTERFACE.to_owned(),
        }
    }
}

impl Endpoint {
    pub fn new(
        address: impl Into<Value>,
        bus_name: impl Into<Value>,
        object_path: impl Into<Value>,
        default_interface: impl Into<Value>,
    ) -> Result<Self> {
        Ok(Self {
            address: validate::address(address)?,
            bus_name: validate::bus_name(bus_name),
            object_path: validate::object_path(object_path)?,
            default_interface: validate::interface_name(default_interface)?,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_address(&mut self, address: impl Into<Value>) -> Result<()> {
        self.address = validate::address(address)?;
        Ok(())
    }

    pub fn bus_name(&self) -> Option<&str> {
        self.bus_name.as_deref()
    }

    pub fn set_bus_name(&mut self, bus_name: impl Into<Value>) {
        self.bus_name = validate::bus_name(bus_name);
    }

    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    pub fn set_object_path(&mut self, object_path: impl Into<Value>) -> Result<()> {
        self.object_path = validate::object_path(object_path)?;
        Ok(())
    }

    pub fn default_interface(&self) -> &str {
        &self.default_interface
    }

    pub fn set_default_interface(&mut self, default_interface: impl Into<Value>) -> Result<()> {
        self.default_interface = validate::interface_name(default_interface)?;
        Ok(())
    }
}

impl TryFrom<&EndpointConfig> for Endpoint {
    type Error = crate::Error;

    fn try_from(config: &EndpointConfig) -> Result<Self> {
        Endpoint::new(
            config.address.as_str(),
            config.bus_name.as_deref(),
            config.object_path.as_str(),
            config.default_interface.as_str(),
        )
    }
}

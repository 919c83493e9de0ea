// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the gst-switch integration tests.
//!
//! [`FakeBus`] stands in for the session bus: it records every connection
//! attempt and every remote call, and answers calls with canned replies.

#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use glib::prelude::*;
use gstswitch::{
    Variant,
    dbus::{Connector, MethodCall, Transport},
};

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

/// Initializes logging once (respects RUST_LOG environment variable).
pub fn setup_logging() {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_test_writer()
            .init();
    });
}

/// A remote call as observed by the fake bus.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub bus_name: Option<String>,
    pub object_path: String,
    pub interface: String,
    pub method: String,
    pub args: Option<Variant>,
    pub reply_type: Option<String>,
}

#[derive(Default)]
struct BusState {
    connects: Vec<String>,
    calls: Vec<RecordedCall>,
    replies: HashMap<String, Variant>,
    refuse_connections: Option<String>,
    accepted_interface: Option<String>,
}

/// Recording fake for [`Connector`] and [`Transport`].
#[derive(Clone, Default)]
pub struct FakeBus {
    state: Rc<RefCell<BusState>>,
}

impl FakeBus {
    /// A bus that answers `method` with `reply`.
    pub fn reply(&self, method: &str, reply: Variant) -> &Self {
        self.state
            .borrow_mut()
            .replies
            .insert(method.to_owned(), reply);
        self
    }

    /// Makes every connection attempt fail with `message`.
    pub fn refuse_connections(&self, message: &str) {
        self.state.borrow_mut().refuse_connections = Some(message.to_owned());
    }

    /// Makes calls on any interface but `interface` fail, the way the real
    /// server rejects unknown interfaces.
    pub fn accept_only(&self, interface: &str) {
        self.state.borrow_mut().accepted_interface = Some(interface.to_owned());
    }

    /// Addresses of every connection attempt, in order.
    pub fn connects(&self) -> Vec<String> {
        self.state.borrow().connects.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.borrow().calls.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }
}

impl Transport for FakeBus {
    fn invoke(&self, call: &MethodCall<'_>) -> Result<Variant, glib::Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(RecordedCall {
            bus_name: call.bus_name.map(str::to_owned),
            object_path: call.object_path.to_owned(),
            interface: call.interface.to_owned(),
            method: call.method.to_owned(),
            args: call.args.clone(),
            reply_type: call.reply_type.as_ref().map(|ty| ty.as_str().to_owned()),
        });
        if let Some(accepted) = &state.accepted_interface {
            if accepted.as_str() != call.interface {
                return Err(glib::Error::new(
                    gio::IOErrorEnum::NotSupported,
                    &format!("No such interface '{}'", call.interface),
                ));
            }
        }
        Ok(state
            .replies
            .get(call.method)
            .cloned()
            .unwrap_or_else(|| ().to_variant()))
    }
}

impl Connector for FakeBus {
    type Transport = FakeBus;

    fn connect(
        &self,
        address: &str,
        _flags: gio::DBusConnectionFlags,
    ) -> Result<FakeBus, glib::Error> {
        let mut state = self.state.borrow_mut();
        state.connects.push(address.to_owned());
        match &state.refuse_connections {
            Some(message) => Err(glib::Error::new(gio::IOErrorEnum::ConnectionRefused, message)),
            None => Ok(self.clone()),
        }
    }
}

// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Tests for field validation, endpoints and configuration loading.

use gstswitch::{
    Endpoint, Error,
    config::{DEFAULT_INTERFACE, DEFAULT_OBJECT_PATH, EndpointConfig, SwitchConfig},
    validate::{self, Value},
};

/// Ports are accepted as integers, integral floats and numeric strings
/// within [1, 65535].
#[test]
fn port_accepts_integral_values_in_range() {
    assert_eq!(validate::port("Port", 1).unwrap(), 1);
    assert_eq!(validate::port("Port", 65535).unwrap(), 65535);
    assert_eq!(validate::port("Port", "3000").unwrap(), 3000);
    assert_eq!(validate::port("Port", 4000.0).unwrap(), 4000);
}

#[test]
fn port_out_of_range_is_a_range_error() {
    for value in [Value::from(-100), Value::from(1e7), Value::from(65536), Value::from(0)] {
        assert!(
            matches!(validate::port("Port", value.clone()), Err(Error::Range { .. })),
            "{value} should be out of range"
        );
    }
}

#[test]
fn port_not_integral_is_a_type_error() {
    let values = [
        Value::from(vec![1, 2, 3, 4]),
        Value::from("1e10"),
        Value::from("port"),
        Value::from(3000.5),
        Value::from(true),
    ];
    for value in values {
        assert!(
            matches!(validate::port("Port", value.clone()), Err(Error::InvalidType { .. })),
            "{value} should be rejected as a non-integer"
        );
    }
}

#[test]
fn blank_port_is_a_value_error() {
    for value in [Value::Null, Value::from(""), Value::List(vec![])] {
        assert!(matches!(
            validate::port("Video Port", value),
            Err(Error::InvalidValue { field: "Video Port", .. })
        ));
    }
}

#[test]
fn dimensions_must_be_positive_whole_numbers() {
    assert_eq!(validate::dimension("Width", 300).unwrap(), 300);
    assert_eq!(validate::dimension("Height", "200").unwrap(), 200);
    assert!(matches!(validate::dimension("Width", -10), Err(Error::Range { .. })));
    assert!(matches!(validate::dimension("Width", Value::Null), Err(Error::InvalidValue { .. })));
    assert!(matches!(validate::dimension("Width", "wide"), Err(Error::InvalidType { .. })));
}

/// Caps take integer pixel counts, so fractional sizes are not truncated.
#[test]
fn fractional_dimensions_are_rejected() {
    assert!(matches!(validate::dimension("Width", 300.5), Err(Error::InvalidType { .. })));
    assert!(matches!(validate::dimension("Height", "200.5"), Err(Error::InvalidType { .. })));
    assert_eq!(validate::dimension("Width", 300.0).unwrap(), 300);
}

/// Pattern and wave truncate toward zero before the range check.
#[test]
fn selectors_truncate_then_check_range() {
    assert_eq!(validate::pattern(19).unwrap(), 19);
    assert_eq!(validate::pattern("4.9").unwrap(), 4);
    assert!(matches!(validate::pattern(20), Err(Error::Range { .. })));
    assert!(matches!(validate::pattern(-1), Err(Error::Range { .. })));
    assert!(matches!(validate::pattern("abc"), Err(Error::InvalidType { .. })));

    assert_eq!(validate::wave(0).unwrap(), 0);
    assert_eq!(validate::wave(12.7).unwrap(), 12);
    assert!(matches!(validate::wave(13), Err(Error::Range { .. })));
}

#[test]
fn frequency_must_be_positive() {
    assert_eq!(validate::frequency(110).unwrap(), 110);
    assert!(matches!(validate::frequency(-5), Err(Error::Range { .. })));
    assert!(matches!(validate::frequency(Value::Null), Err(Error::InvalidValue { .. })));
}

#[test]
fn record_file_rejects_slashes() {
    assert_eq!(validate::record_file("record.data").unwrap(), "record.data");
    assert!(matches!(
        validate::record_file("/tmp/record.data"),
        Err(Error::InvalidValue { field: "Record File", .. })
    ));
    assert!(matches!(validate::record_file(""), Err(Error::InvalidValue { .. })));
}

#[test]
fn index_must_be_integral_and_in_bounds() {
    assert_eq!(validate::index("video", 3, 4).unwrap(), 3);
    assert_eq!(validate::index("video", "0", 4).unwrap(), 0);
    let invalid = [
        Value::from(-100),
        Value::from(20),
        Value::from(4),
        Value::from(1e10),
        Value::from("hi"),
        Value::from(vec![1, 2, 3]),
    ];
    for value in invalid {
        assert!(
            matches!(validate::index("video", value.clone(), 4), Err(Error::InvalidIndex(_))),
            "{value} should be an invalid index"
        );
    }
}

#[test]
fn address_needs_a_transport_prefix() {
    for address in ["unix:abstract=gstswitch", "unix:temp=/tmp/abcd/xyz"] {
        let endpoint = Endpoint::new(address, Value::Null, DEFAULT_OBJECT_PATH, DEFAULT_INTERFACE)
            .unwrap();
        assert_eq!(endpoint.address(), address);
    }
    for address in [Value::from("abcdefghijk"), Value::from(":abstract"), Value::from("")] {
        assert!(matches!(
            Endpoint::new(address, Value::Null, DEFAULT_OBJECT_PATH, DEFAULT_INTERFACE),
            Err(Error::InvalidValue { field: "Address", .. })
        ));
    }
}

#[test]
fn object_path_must_start_with_slash() {
    let mut endpoint = Endpoint::default();
    assert!(matches!(
        endpoint.set_object_path("a/////////"),
        Err(Error::InvalidValue { field: "Object path", .. })
    ));
    assert!(endpoint.set_object_path(Value::Null).is_err());
    assert_eq!(endpoint.object_path(), DEFAULT_OBJECT_PATH);
}

#[test]
fn interface_needs_two_dots() {
    let mut endpoint = Endpoint::default();
    for interface in [".", "info.", "info", ""] {
        assert!(endpoint.set_default_interface(interface).is_err());
    }
    endpoint.set_default_interface("info.duzy.gst").unwrap();
    assert_eq!(endpoint.default_interface(), "info.duzy.gst");
}

#[test]
fn bus_name_is_stored_as_text() {
    let mut endpoint = Endpoint::default();
    endpoint.set_bus_name(12345);
    assert_eq!(endpoint.bus_name(), Some("12345"));
    endpoint.set_bus_name("");
    assert_eq!(endpoint.bus_name(), Some(""));
    endpoint.set_bus_name(Value::Null);
    assert_eq!(endpoint.bus_name(), None);
}

/// Loaded configuration passes through the same validators.
#[test]
fn configuration_is_validated_on_use() {
    let config = SwitchConfig::from_json_str(
        r#"{"endpoint": {"address": "unix:abstract=test"}, "server": {"video_port": 7000}}"#,
    )
    .unwrap();
    let endpoint = Endpoint::try_from(&config.endpoint).unwrap();
    assert_eq!(endpoint.address(), "unix:abstract=test");
    assert_eq!(endpoint.object_path(), DEFAULT_OBJECT_PATH);

    let bad = EndpointConfig {
        address: "nocolon".to_owned(),
        ..EndpointConfig::default()
    };
    assert!(Endpoint::try_from(&bad).is_err());

    assert!(matches!(
        SwitchConfig::from_json_str("{not json"),
        Err(Error::ConfigFormat(_))
    ));
    assert!(matches!(
        SwitchConfig::from_file("/nonexistent/gst-switch.json"),
        Err(Error::ConfigIo(_))
    ));
}

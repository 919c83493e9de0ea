// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Tests for reply unwrapping and connection handling in the controller.

mod common;

use common::{FakeBus, setup_logging};
use glib::prelude::*;
use gstswitch::{Controller, Endpoint, Error, controller::parse_preview_ports};

fn controller(bus: &FakeBus) -> Controller<FakeBus> {
    setup_logging();
    Controller::with_connector(Endpoint::default(), bus.clone())
}

#[test]
fn getters_need_an_established_connection() {
    let bus = FakeBus::default();
    let controller = controller(&bus);

    assert!(matches!(controller.get_compose_port(), Err(Error::Connection(_))));
    assert!(bus.connects().is_empty());
}

/// Getters reuse the connection opened by `establish_connection`.
#[test]
fn getters_unwrap_single_values() {
    let bus = FakeBus::default();
    bus.reply("get_compose_port", (3001,).to_variant())
        .reply("get_encode_port", (3002,).to_variant())
        .reply("get_audio_port", (4000,).to_variant());
    let mut controller = controller(&bus);
    controller.establish_connection().unwrap();

    assert_eq!(controller.get_compose_port().unwrap(), 3001);
    assert_eq!(controller.get_encode_port().unwrap(), 3002);
    assert_eq!(controller.get_audio_port().unwrap(), 4000);
    assert_eq!(bus.connects().len(), 1);
}

#[test]
fn malformed_reply_is_a_return_error() {
    let bus = FakeBus::default();
    bus.reply("get_compose_port", (1, 2, 3).to_variant())
        .reply("get_encode_port", ("3002",).to_variant());
    let mut controller = controller(&bus);
    controller.establish_connection().unwrap();

    assert!(matches!(controller.get_compose_port(), Err(Error::ConnectionReturn(_))));
    assert!(matches!(controller.get_encode_port(), Err(Error::ConnectionReturn(_))));
}

#[test]
fn preview_ports_take_first_element_of_each_tuple() {
    let bus = FakeBus::default();
    bus.reply("get_preview_ports", ("[(3002, 1, 7), (3003, 1, 8)]",).to_variant());
    let mut controller = controller(&bus);
    controller.establish_connection().unwrap();

    assert_eq!(controller.get_preview_ports().unwrap(), vec![3002, 3003]);
}

#[test]
fn preview_ports_reject_anything_but_tuple_lists() {
    for reply in ["{}[]", "1", "[1, 2]", "[(3002, 1, 7)", "[(a, b)]", "[(3002, 1)] x", ""] {
        assert!(
            matches!(parse_preview_ports(reply), Err(Error::ConnectionReturn(_))),
            "{reply:?} should be rejected"
        );
    }
    assert_eq!(parse_preview_ports("[]").unwrap(), Vec::<i32>::new());
    assert_eq!(parse_preview_ports(" [ (3002,1) ,(3003,2) ] ").unwrap(), vec![3002, 3003]);
}

/// Every state-changing operation opens its own connection first.
#[test]
fn operations_reconnect_each_time() {
    let bus = FakeBus::default();
    bus.reply("set_encode_mode", (true,).to_variant())
        .reply("new_record", (true,).to_variant())
        .reply("adjust_pip", (7u32,).to_variant())
        .reply("switch", (true,).to_variant())
        .reply("click_video", (false,).to_variant());
    let mut controller = controller(&bus);

    assert!(controller.set_encode_mode(1).unwrap());
    assert!(controller.new_record().unwrap());
    assert_eq!(controller.adjust_pip(1, 2, 3, 4).unwrap(), 7);
    assert!(controller.switch('A' as i32, 3003).unwrap());
    assert!(!controller.click_video(1, 2, 3, 4).unwrap());

    assert_eq!(bus.connects().len(), 5);
    assert_eq!(
        bus.methods(),
        ["set_encode_mode", "new_record", "adjust_pip", "switch", "click_video"]
    );
}

#[test]
fn composite_mode_out_of_range_makes_no_call() {
    let bus = FakeBus::default();
    bus.reply("set_composite_mode", (true,).to_variant());
    let mut controller = controller(&bus);

    assert_eq!(controller.set_composite_mode(5).unwrap(), None);
    assert!(bus.calls().is_empty());

    for mode in 0..=3 {
        assert_eq!(controller.set_composite_mode(mode).unwrap(), Some(true));
    }
    assert_eq!(bus.calls().len(), 4);

    // the previous accepted result is reported again
    assert_eq!(controller.set_composite_mode(-1).unwrap(), Some(true));
    assert_eq!(bus.calls().len(), 4);
}

#[test]
fn marking_ignores_the_reply() {
    let bus = FakeBus::default();
    bus.reply("mark_face", (1, "unexpected").to_variant());
    let mut controller = controller(&bus);

    controller.mark_face(&[(1, 2, 3, 4)]).unwrap();
    controller.mark_tracking(&[(1, 2, 3, 4), (5, 6, 7, 8)]).unwrap();
    assert_eq!(bus.methods(), ["mark_face", "mark_tracking"]);
}

#[test]
fn failed_connection_stops_the_operation() {
    let bus = FakeBus::default();
    bus.refuse_connections("Connection refused");
    let mut controller = controller(&bus);

    assert!(matches!(controller.new_record(), Err(Error::Connection(_))));
    assert!(matches!(controller.set_composite_mode(1), Err(Error::Connection(_))));
    assert!(bus.calls().is_empty());
    assert!(!controller.connection().unwrap().is_connected());
}

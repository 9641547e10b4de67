//! End-to-end runs over a scripted source: default mapping, override
//! documents, and the failure path, exercised through the public surface
//! only.

use joypoll::backends::virtual_input::VirtualSource;
use joypoll::mapping::codes;
use joypoll::{
    ButtonPhase, ChannelKind, DpadDirection, DpadTransition, Joypad, MappingOverrides,
    NormalizedValue,
};

#[test]
fn default_mapping_classifies_a_stick_then_a_button() {
    let mut source = VirtualSource::new("pad");
    source.feed_absolute(codes::ABS_X, 0);
    source.feed_key(codes::BTN_A, 1);

    let mut joypad = Joypad::with_source(source, None).expect("construct");
    let mut events = joypad.events();

    let stick = events.next().expect("tick").expect("event");
    assert_eq!(stick.name, "stick_left_x");
    assert_eq!(stick.channel, ChannelKind::Axis);
    assert_eq!(stick.normalized, NormalizedValue::Axis(-90.0));

    let button = events.next().expect("tick").expect("event");
    assert_eq!(button.name, "button_a");
    assert_eq!(button.channel, ChannelKind::Button);
    assert_eq!(
        button.normalized,
        NormalizedValue::Button(ButtonPhase::Pressed)
    );
}

#[test]
fn a_session_across_all_three_channels() {
    let mut source = VirtualSource::new("pad");
    // Stick sweep: full left, center (dead zone), full right.
    source.feed_absolute(codes::ABS_X, 0);
    source.feed_absolute(codes::ABS_X, 128);
    source.feed_absolute(codes::ABS_X, 255);
    // Trigger squeeze and release.
    source.feed_absolute(codes::ABS_GAS, 255);
    source.feed_absolute(codes::ABS_GAS, 0);
    // Button tap.
    source.feed_key(codes::BTN_TL, 1);
    source.feed_key(codes::BTN_TL, 0);
    // Dpad: press left, release to center.
    source.feed_absolute(codes::ABS_HAT0X, -1);
    source.feed_absolute(codes::ABS_HAT0X, 0);

    let mut joypad = Joypad::with_source(source, None).expect("construct");
    let labels: Vec<String> = joypad
        .events()
        .take(9)
        .map(|tick| {
            let event = tick.expect("event");
            format!("{} {}", event.name, event.normalized)
        })
        .collect();

    assert_eq!(
        labels,
        [
            "stick_left_x -90",
            "stick_left_x 0",
            "stick_left_x 90",
            "trigger_right 180",
            "trigger_right 0",
            "bumper_left pressed",
            "bumper_left released",
            "dpad_x pressed-left",
            "dpad_x released-left",
        ]
    );

    // The tables remember the latest record per code.
    let last = joypad.last_event(codes::ABS_HAT0X).expect("dpad history");
    assert_eq!(
        last.normalized.as_dpad(),
        Some(DpadTransition::Released(DpadDirection::Left))
    );
}

#[test]
fn toml_overrides_reshape_the_output() {
    let doc = r#"
        [axes.0]
        name = "yaw"
        normalized_bounds = { min = -1.0, max = 1.0 }
        dead_zone = { low = -0.05, high = 0.05 }

        [buttons.304]
        name = "fire"
    "#;
    let overrides = MappingOverrides::from_toml_str(doc).expect("parse");

    let mut source = VirtualSource::new("pad");
    source.feed_absolute(codes::ABS_X, 255);
    source.feed_key(codes::BTN_A, 1);

    let mut joypad = Joypad::with_source(source, Some(overrides)).expect("construct");
    let mut events = joypad.events();

    let yaw = events.next().expect("tick").expect("event");
    assert_eq!(yaw.name, "yaw");
    assert_eq!(yaw.normalized, NormalizedValue::Axis(1.0));

    let fire = events.next().expect("tick").expect("event");
    assert_eq!(fire.name, "fire");

    // Codes the document never mentioned kept their stock names.
    assert_eq!(joypad.mapping().buttons[&codes::BTN_B].name, "button_b");
}

#[test]
fn unplugging_the_device_ends_the_sequence() {
    let mut source = VirtualSource::new("pad");
    source.feed_key(codes::BTN_A, 1);
    source.feed_key(codes::BTN_A, 0);
    source.fail_after_drain();

    let mut joypad = Joypad::with_source(source, None).expect("construct");
    let seen = joypad.events().flatten().count();
    assert_eq!(seen, 2);
    assert!(joypad.is_finished());
    assert!(joypad.last_error().is_some());
}

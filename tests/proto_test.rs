// tests/proto_test.rs — Integration test: packet decode + interpretation

use cdrelay::metric::flatten_value_list;
use cdrelay::proto::{decode_packet, Event, Interpreter, Severity, Value};

fn string_part(code: u16, s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&code.to_be_bytes());
    out.extend_from_slice(&((4 + s.len() + 1) as u16).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    out
}

fn number_part(code: u16, n: u64) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&code.to_be_bytes());
    out.extend_from_slice(&12u16.to_be_bytes());
    out.extend_from_slice(&n.to_be_bytes());
    out
}

fn values_part(values: &[(u8, [u8; 8])]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0006u16.to_be_bytes());
    out.extend_from_slice(&((6 + values.len() * 9) as u16).to_be_bytes());
    out.extend_from_slice(&(values.len() as u16).to_be_bytes());
    for (ds, _) in values {
        out.push(*ds);
    }
    for (_, bytes) in values {
        out.extend_from_slice(bytes);
    }
    out
}

/// A realistic packet: identity up front, then two samples that only
/// change the type instance between them.
fn cpu_packet() -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend(string_part(0x0000, "web01.example.net"));
    packet.extend(number_part(0x0008, 1_700_000_000u64 << 30));
    packet.extend(number_part(0x0009, 10u64 << 30));
    packet.extend(string_part(0x0002, "cpu"));
    packet.extend(string_part(0x0003, "0"));
    packet.extend(string_part(0x0004, "cpu"));
    packet.extend(string_part(0x0005, "idle"));
    packet.extend(values_part(&[(2, 812_422i64.to_be_bytes())]));
    packet.extend(string_part(0x0005, "user"));
    packet.extend(values_part(&[(2, 5_411i64.to_be_bytes())]));
    packet
}

#[test]
fn decodes_and_interprets_a_cpu_packet() {
    let parts = decode_packet(&cpu_packet()).unwrap();
    let mut interp = Interpreter::new();
    let events = interp.feed(parts);
    assert_eq!(events.len(), 2);

    let Event::Values(ref idle) = events[0] else {
        panic!("expected a value list");
    };
    assert_eq!(idle.identity.host.as_deref(), Some("web01.example.net"));
    assert_eq!(idle.identity.time, Some(1_700_000_000.0));
    assert_eq!(idle.identity.interval, Some(10.0));
    assert_eq!(idle.identity.type_instance.as_deref(), Some("idle"));
    assert_eq!(idle.values, vec![Value::Derive(812_422)]);
    assert_eq!(
        idle.identity.source(),
        "web01.example.net/cpu/0/cpu/idle"
    );

    let Event::Values(ref user) = events[1] else {
        panic!("expected a value list");
    };
    // Identity carries over; only the type instance changed.
    assert_eq!(user.identity.host.as_deref(), Some("web01.example.net"));
    assert_eq!(user.identity.type_instance.as_deref(), Some("user"));
}

#[test]
fn value_lists_flatten_to_relay_records() {
    let parts = decode_packet(&cpu_packet()).unwrap();
    let mut interp = Interpreter::new();

    let mut flat = Vec::new();
    for event in interp.feed(parts) {
        if let Event::Values(vl) = event {
            flat.extend(flatten_value_list(&vl));
        }
    }

    assert_eq!(flat.len(), 2);
    let line = serde_json::to_value(&flat[0]).unwrap();
    assert_eq!(line["host"], "web01.example.net");
    assert_eq!(line["type"], "cpu");
    assert_eq!(line["type_instance"], "idle");
    assert_eq!(line["value"], 812_422);
}

#[test]
fn interprets_a_notification_packet() {
    let mut packet = Vec::new();
    packet.extend(string_part(0x0000, "db02"));
    packet.extend(number_part(0x0001, 1_700_000_100));
    packet.extend(number_part(0x0101, 2));
    packet.extend(string_part(0x0100, "free space below 10%"));

    let parts = decode_packet(&packet).unwrap();
    let mut interp = Interpreter::new();
    let events = interp.feed(parts);
    assert_eq!(events.len(), 1);

    let Event::Notification(ref nt) = events[0] else {
        panic!("expected a notification");
    };
    assert_eq!(nt.severity, Some(Severity::Warning));
    assert_eq!(nt.message, "free space below 10%");
    assert_eq!(format!("{nt}"), "[1700000100] db02 [WARNING] free space below 10%");
}

#[test]
fn mixed_ds_types_decode_with_correct_endianness() {
    let mut packet = Vec::new();
    packet.extend(string_part(0x0000, "h"));
    packet.extend(values_part(&[
        (0, 123_456u64.to_be_bytes()),
        (1, 98.6f64.to_le_bytes()),
        (2, (-42i64).to_be_bytes()),
        (3, 7u64.to_be_bytes()),
    ]));

    let parts = decode_packet(&packet).unwrap();
    let mut interp = Interpreter::new();
    let events = interp.feed(parts);

    let Event::Values(ref vl) = events[0] else {
        panic!("expected a value list");
    };
    assert_eq!(
        vl.values,
        vec![
            Value::Counter(123_456),
            Value::Gauge(98.6),
            Value::Derive(-42),
            Value::Absolute(7),
        ]
    );
}

#[test]
fn garbage_packet_fails_without_panicking() {
    let garbage: Vec<u8> = (0u16..512).map(|i| (i * 7 % 251) as u8).collect();
    assert!(decode_packet(&garbage).is_err());
}

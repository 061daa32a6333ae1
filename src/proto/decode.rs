// src/proto/decode.rs — packet decoding

use crate::proto::parts::{DsType, Part, PartType, Value};
use crate::proto::DecodeError;

const HEADER_SIZE: usize = 4;
const VALUES_HEADER_SIZE: usize = HEADER_SIZE + 2;
// One type byte plus an 8-byte value.
const SINGLE_VALUE_SIZE: usize = 9;

/// Decode one packet into its parts.
///
/// A packet is a sequence of parts, each with a 4-byte header: part type
/// (u16 BE) followed by part length (u16 BE, inclusive of the header).
/// Any malformed part fails the whole packet.
pub fn decode_packet(buf: &[u8]) -> Result<Vec<Part>, DecodeError> {
    let mut parts = Vec::new();
    let mut off = 0;

    while off < buf.len() {
        let rest = &buf[off..];
        if rest.len() < HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader {
                offset: off,
                len: buf.len(),
            });
        }

        let raw_type = u16::from_be_bytes([rest[0], rest[1]]);
        let declared = u16::from_be_bytes([rest[2], rest[3]]) as usize;

        if declared < HEADER_SIZE {
            return Err(DecodeError::BadLength {
                part_type: raw_type,
                offset: off,
                declared,
            });
        }
        if declared > rest.len() {
            return Err(DecodeError::Overrun {
                offset: off,
                declared,
                remaining: rest.len(),
            });
        }

        let part_type = PartType::try_from(raw_type)?;
        let payload = &rest[HEADER_SIZE..declared];
        parts.push(decode_part(part_type, declared, payload)?);

        off += declared;
    }

    Ok(parts)
}

fn decode_part(part_type: PartType, declared: usize, payload: &[u8]) -> Result<Part, DecodeError> {
    use PartType::*;
    Ok(match part_type {
        Host => Part::Host(decode_string(payload)),
        Plugin => Part::Plugin(decode_string(payload)),
        PluginInstance => Part::PluginInstance(decode_string(payload)),
        Type => Part::Type(decode_string(payload)),
        TypeInstance => Part::TypeInstance(decode_string(payload)),
        Message => Part::Message(decode_string(payload)),
        Time => Part::Time(decode_u64(part_type, payload)?),
        Interval => Part::Interval(decode_u64(part_type, payload)?),
        TimeHr => Part::TimeHr(decode_u64(part_type, payload)?),
        IntervalHr => Part::IntervalHr(decode_u64(part_type, payload)?),
        Severity => Part::Severity(decode_u64(part_type, payload)?),
        Values => Part::Values(decode_values(declared, payload)?),
    })
}

/// Strings are NUL-terminated UTF-8; invalid bytes are replaced lossily.
fn decode_string(payload: &[u8]) -> String {
    let trimmed = payload.strip_suffix(&[0]).unwrap_or(payload);
    String::from_utf8_lossy(trimmed).into_owned()
}

fn decode_u64(part_type: PartType, payload: &[u8]) -> Result<u64, DecodeError> {
    let bytes: [u8; 8] = payload
        .get(..8)
        .and_then(|s| s.try_into().ok())
        .ok_or(DecodeError::ShortPayload {
            part_type,
            len: payload.len(),
        })?;
    Ok(u64::from_be_bytes(bytes))
}

/// VALUES payload: u16 BE count, then `count` DS-type bytes, then `count`
/// 8-byte values. The declared part length must match exactly.
fn decode_values(declared: usize, payload: &[u8]) -> Result<Vec<Value>, DecodeError> {
    if payload.len() < 2 {
        return Err(DecodeError::ShortPayload {
            part_type: PartType::Values,
            len: payload.len(),
        });
    }

    let count = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    let expected = VALUES_HEADER_SIZE + count * SINGLE_VALUE_SIZE;
    if expected != declared {
        return Err(DecodeError::ValueSizeMismatch {
            declared,
            expected,
            count,
        });
    }

    let types = &payload[2..2 + count];
    let data = &payload[2 + count..];

    let mut values = Vec::with_capacity(count);
    for (i, &raw) in types.iter().enumerate() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&data[i * 8..i * 8 + 8]);
        let value = match DsType::try_from(raw)? {
            DsType::Counter => Value::Counter(u64::from_be_bytes(bytes)),
            DsType::Absolute => Value::Absolute(u64::from_be_bytes(bytes)),
            DsType::Derive => Value::Derive(i64::from_be_bytes(bytes)),
            // collectd transmits gauges in x86 byte order.
            DsType::Gauge => Value::Gauge(f64::from_le_bytes(bytes)),
        };
        values.push(value);
    }

    Ok(values)
}

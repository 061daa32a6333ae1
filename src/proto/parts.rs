// src/proto/parts.rs — part types, values, and cdtime conversion

use crate::proto::DecodeError;

/// Part type codes from the collectd network protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PartType {
    Host = 0x0000,
    Time = 0x0001,
    Plugin = 0x0002,
    PluginInstance = 0x0003,
    Type = 0x0004,
    TypeInstance = 0x0005,
    Values = 0x0006,
    Interval = 0x0007,
    TimeHr = 0x0008,
    IntervalHr = 0x0009,
    Message = 0x0100,
    Severity = 0x0101,
}

/// Signature and encryption parts exist on the wire but are not supported.
pub const PART_SIGN_SHA256: u16 = 0x0200;
pub const PART_ENCRYPT_AES256: u16 = 0x0210;

impl TryFrom<u16> for PartType {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use PartType::*;
        Ok(match value {
            0x0000 => Host,
            0x0001 => Time,
            0x0002 => Plugin,
            0x0003 => PluginInstance,
            0x0004 => Type,
            0x0005 => TypeInstance,
            0x0006 => Values,
            0x0007 => Interval,
            0x0008 => TimeHr,
            0x0009 => IntervalHr,
            0x0100 => Message,
            0x0101 => Severity,
            PART_SIGN_SHA256 | PART_ENCRYPT_AES256 => {
                return Err(DecodeError::UnsupportedPart(value))
            }
            other => return Err(DecodeError::UnknownPart(other)),
        })
    }
}

/// Data source types carried in a VALUES part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DsType {
    Counter = 0,
    Gauge = 1,
    Derive = 2,
    Absolute = 3,
}

impl DsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DsType::Counter => "counter",
            DsType::Gauge => "gauge",
            DsType::Derive => "derive",
            DsType::Absolute => "absolute",
        }
    }
}

impl TryFrom<u8> for DsType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => DsType::Counter,
            1 => DsType::Gauge,
            2 => DsType::Derive,
            3 => DsType::Absolute,
            other => return Err(DecodeError::UnsupportedDsType(other)),
        })
    }
}

/// A single decoded datapoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Counter(u64),
    Gauge(f64),
    Derive(i64),
    Absolute(u64),
}

impl Value {
    pub fn ds_type(&self) -> DsType {
        match self {
            Value::Counter(_) => DsType::Counter,
            Value::Gauge(_) => DsType::Gauge,
            Value::Derive(_) => DsType::Derive,
            Value::Absolute(_) => DsType::Absolute,
        }
    }

    /// JSON representation; a NaN gauge becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match *self {
            Value::Counter(v) | Value::Absolute(v) => serde_json::Value::from(v),
            Value::Derive(v) => serde_json::Value::from(v),
            Value::Gauge(v) => serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Notification severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum Severity {
    Failure = 1,
    Warning = 2,
    Okay = 4,
}

impl Severity {
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Severity::Failure),
            2 => Some(Severity::Warning),
            4 => Some(Severity::Okay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Failure => "FAILURE",
            Severity::Warning => "WARNING",
            Severity::Okay => "OKAY",
        }
    }
}

/// One decoded part of a packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Host(String),
    Time(u64),
    Plugin(String),
    PluginInstance(String),
    Type(String),
    TypeInstance(String),
    Values(Vec<Value>),
    Interval(u64),
    TimeHr(u64),
    IntervalHr(u64),
    Message(String),
    Severity(u64),
}

/// Convert a cdtime (seconds in the top 34 bits, 2^-30 second fraction in
/// the low 30 bits) to fractional UNIX seconds.
pub fn cdtime_to_unix(t: u64) -> f64 {
    let secs = t >> 30;
    let frac = (t & ((1 << 30) - 1)) as f64 / (1u64 << 30) as f64;
    secs as f64 + frac
}

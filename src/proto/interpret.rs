// src/proto/interpret.rs — stateful part interpretation
//
// collectd delta-encodes the identity fields: a packet only repeats a field
// when it changes, so interpretation is a fold over parts that emits an
// event whenever a VALUES or MESSAGE part lands.

use std::fmt;

use crate::proto::parts::{cdtime_to_unix, Part, Severity, Value};

/// Identity fields accumulated from HOST/PLUGIN/TYPE/TIME/INTERVAL parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub time: Option<f64>,
    pub interval: Option<f64>,
    pub host: Option<String>,
    pub plugin: Option<String>,
    pub plugin_instance: Option<String>,
    pub type_: Option<String>,
    pub type_instance: Option<String>,
}

impl Identity {
    /// Slash-joined source path, e.g. `web01/cpu/0/cpu/idle`.
    pub fn source(&self) -> String {
        let mut out = String::new();
        if let Some(ref host) = self.host {
            out.push_str(host);
        }
        for field in [
            &self.plugin,
            &self.plugin_instance,
            &self.type_,
            &self.type_instance,
        ] {
            if let Some(v) = field {
                out.push('/');
                out.push_str(v);
            }
        }
        out
    }
}

/// A metric sample: the current identity plus its decoded values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    pub identity: Identity,
    pub values: Vec<Value>,
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {:?}",
            self.identity.time.unwrap_or_default(),
            self.identity.source(),
            self.values
        )
    }
}

/// A notification emitted by a MESSAGE part.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub identity: Identity,
    pub severity: Option<Severity>,
    pub message: String,
}

impl Notification {
    pub fn severity_str(&self) -> &'static str {
        self.severity.map(|s| s.as_str()).unwrap_or("UNKNOWN")
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} [{}] {}",
            self.identity.time.unwrap_or_default(),
            self.identity.source(),
            self.severity_str(),
            self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Values(ValueList),
    Notification(Notification),
}

/// Folds parts into events, carrying identity state across packets.
#[derive(Debug, Default)]
pub struct Interpreter {
    identity: Identity,
    severity: Option<Severity>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one part; VALUES and MESSAGE parts produce an event.
    pub fn push(&mut self, part: Part) -> Option<Event> {
        match part {
            Part::Host(v) => self.identity.host = Some(v),
            Part::Plugin(v) => self.identity.plugin = Some(v),
            Part::PluginInstance(v) => self.identity.plugin_instance = Some(v),
            Part::Type(v) => self.identity.type_ = Some(v),
            Part::TypeInstance(v) => self.identity.type_instance = Some(v),
            Part::Time(t) => self.identity.time = Some(t as f64),
            Part::TimeHr(t) => self.identity.time = Some(cdtime_to_unix(t)),
            Part::Interval(i) => self.identity.interval = Some(i as f64),
            Part::IntervalHr(i) => self.identity.interval = Some(cdtime_to_unix(i)),
            // Out-of-range severities leave the previous value in place.
            Part::Severity(s) => {
                if let Some(sev) = Severity::from_u64(s) {
                    self.severity = Some(sev);
                }
            }
            Part::Message(message) => {
                return Some(Event::Notification(Notification {
                    identity: self.identity.clone(),
                    severity: self.severity,
                    message,
                }));
            }
            Part::Values(values) => {
                return Some(Event::Values(ValueList {
                    identity: self.identity.clone(),
                    values,
                }));
            }
        }
        None
    }

    pub fn feed(&mut self, parts: impl IntoIterator<Item = Part>) -> Vec<Event> {
        parts
            .into_iter()
            .filter_map(|part| self.push(part))
            .collect()
    }
}

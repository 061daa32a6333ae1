// src/metric.rs — write_http JSON model and flattening

use serde::{Deserialize, Serialize};

use crate::proto::ValueList;

/// One metric object as collectd's write_http plugin emits it. All fields
/// are optional; the plugin may send either `values` or a scalar `value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteHttpMetric {
    pub time: Option<f64>,
    pub interval: Option<f64>,
    pub host: Option<String>,
    pub plugin: Option<String>,
    pub plugin_instance: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub type_instance: Option<String>,
    pub dstypes: Option<Vec<String>>,
    pub dsnames: Option<Vec<String>>,
    pub value: Option<serde_json::Value>,
    pub values: Option<Vec<serde_json::Value>>,
}

/// Request body: collectd sends an array of metric objects, but a bare
/// object is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Many(Vec<WriteHttpMetric>),
    One(Box<WriteHttpMetric>),
}

impl Payload {
    pub fn into_vec(self) -> Vec<WriteHttpMetric> {
        match self {
            Payload::Many(v) => v,
            Payload::One(m) => vec![*m],
        }
    }
}

/// The relay's output shape: one datapoint per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatMetric {
    pub time: Option<f64>,
    pub host: Option<String>,
    pub plugin: Option<String>,
    pub plugin_instance: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub type_instance: Option<String>,
    pub value: serde_json::Value,
}

/// Expand one write_http metric into one flat record per value. A metric
/// with neither `values` nor `value` yields nothing.
pub fn flatten(metric: WriteHttpMetric) -> Vec<FlatMetric> {
    let values = match (metric.values, metric.value) {
        (Some(values), _) => values,
        (None, Some(value)) => vec![value],
        (None, None) => return Vec::new(),
    };

    values
        .into_iter()
        .map(|value| FlatMetric {
            time: metric.time,
            host: metric.host.clone(),
            plugin: metric.plugin.clone(),
            plugin_instance: metric.plugin_instance.clone(),
            type_: metric.type_.clone(),
            type_instance: metric.type_instance.clone(),
            value,
        })
        .collect()
}

/// Flatten a binary-protocol value list the same way.
pub fn flatten_value_list(vl: &ValueList) -> Vec<FlatMetric> {
    vl.values
        .iter()
        .map(|value| FlatMetric {
            time: vl.identity.time,
            host: vl.identity.host.clone(),
            plugin: vl.identity.plugin.clone(),
            plugin_instance: vl.identity.plugin_instance.clone(),
            type_: vl.identity.type_.clone(),
            type_instance: vl.identity.type_instance.clone(),
            value: value.to_json(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Identity, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_values_array() {
        let metric = WriteHttpMetric {
            time: Some(1000.5),
            host: Some("web01".into()),
            plugin: Some("cpu".into()),
            type_: Some("cpu".into()),
            values: Some(vec![1.into(), 2.into()]),
            ..Default::default()
        };

        let flat = flatten(metric);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].value, serde_json::Value::from(1));
        assert_eq!(flat[1].value, serde_json::Value::from(2));
        assert_eq!(flat[0].host.as_deref(), Some("web01"));
        assert_eq!(flat[0].time, Some(1000.5));
    }

    #[test]
    fn falls_back_to_scalar_value() {
        let metric = WriteHttpMetric {
            value: Some(serde_json::Value::from(3.5)),
            ..Default::default()
        };
        let flat = flatten(metric);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].value, serde_json::Value::from(3.5));
    }

    #[test]
    fn no_values_yields_nothing() {
        assert!(flatten(WriteHttpMetric::default()).is_empty());
    }

    #[test]
    fn flat_record_serializes_type_field() {
        let flat = FlatMetric {
            time: None,
            host: None,
            plugin: None,
            plugin_instance: None,
            type_: Some("gauge".into()),
            type_instance: None,
            value: serde_json::Value::from(1),
        };
        let json = serde_json::to_value(&flat).unwrap();
        assert_eq!(json["type"], "gauge");
        assert!(json.get("type_").is_none());
    }

    #[test]
    fn payload_accepts_object_and_array() {
        let one: Payload = serde_json::from_str(r#"{"host":"a","value":1}"#).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: Payload =
            serde_json::from_str(r#"[{"host":"a","value":1},{"host":"b","value":2}]"#).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        let p: Payload =
            serde_json::from_str(r#"[{"host":"a","value":1,"dsnames":["value"],"meta":{}}]"#)
                .unwrap();
        let metrics = p.into_vec();
        assert_eq!(metrics[0].dsnames.as_deref(), Some(&["value".to_string()][..]));
    }

    #[test]
    fn flattens_binary_value_list() {
        let vl = ValueList {
            identity: Identity {
                time: Some(99.0),
                host: Some("h".into()),
                plugin: Some("if".into()),
                ..Default::default()
            },
            values: vec![Value::Counter(10), Value::Gauge(0.5)],
        };
        let flat = flatten_value_list(&vl);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].value, serde_json::Value::from(10u64));
        assert_eq!(flat[1].value, serde_json::Value::from(0.5));
        assert_eq!(flat[1].plugin.as_deref(), Some("if"));
    }
}

//! Conversion between JSON metadata and Qdrant payload values.

use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ListValue, Struct, Value};
use serde_json::{Map, Number, Value as Json};

use crate::DOCUMENT_KEY;

pub(crate) fn json_to_value(json: Json) -> Value {
    let kind = match json {
        Json::Null => Kind::NullValue(0),
        Json::Bool(b) => Kind::BoolValue(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        Json::String(s) => Kind::StringValue(s),
        Json::Array(items) => {
            Kind::ListValue(ListValue { values: items.into_iter().map(json_to_value).collect() })
        },
        Json::Object(fields) => Kind::StructValue(Struct {
            fields: fields.into_iter().map(|(k, v)| (k, json_to_value(v))).collect(),
        }),
    };
    Value { kind: Some(kind) }
}

pub(crate) fn value_to_json(value: Value) -> Json {
    match value.kind {
        Some(Kind::BoolValue(b)) => Json::Bool(b),
        Some(Kind::IntegerValue(i)) => Json::from(i),
        Some(Kind::DoubleValue(d)) => Number::from_f64(d).map_or(Json::Null, Json::Number),
        Some(Kind::StringValue(s)) => Json::String(s),
        Some(Kind::ListValue(list)) => {
            Json::Array(list.values.into_iter().map(value_to_json).collect())
        },
        Some(Kind::StructValue(st)) => {
            Json::Object(st.fields.into_iter().map(|(k, v)| (k, value_to_json(v))).collect())
        },
        Some(Kind::NullValue(_)) | None => Json::Null,
    }
}

/// Payload for one point: metadata plus the document text.
pub(crate) fn entry_payload(
    document: String,
    metadata: Map<String, Json>,
) -> HashMap<String, Value> {
    let mut payload: HashMap<String, Value> =
        metadata.into_iter().map(|(k, v)| (k, json_to_value(v))).collect();
    payload.insert(DOCUMENT_KEY.to_owned(), json_to_value(Json::String(document)));
    payload
}

/// Split a stored payload back into document text and metadata.
pub(crate) fn split_payload(payload: HashMap<String, Value>) -> (String, Map<String, Json>) {
    let mut metadata: Map<String, Json> =
        payload.into_iter().map(|(k, v)| (k, value_to_json(v))).collect();
    let document = match metadata.remove(DOCUMENT_KEY) {
        Some(Json::String(s)) => s,
        _ => String::new(),
    };
    (document, metadata)
}

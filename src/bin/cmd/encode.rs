// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encode command - write JSON-described bags as frames.
//!
//! Input is a JSON array. Each element is either `null` (a nil marker) or
//! `{ "type": "...", "fields": { ... } }`. A field value that is an object
//! with a `"$type"` key becomes a nested field-bag object; other objects
//! become plain maps.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use fieldpack::{FieldBag, SerializerConfig, Value};
use serde::Deserialize;
use serde_json::{Map, Value as Json};

use crate::common::{format_size, serializer, Result};

/// Write a JSON array of bags as concatenated frames.
#[derive(Args, Clone, Debug)]
pub struct EncodeCmd {
    /// JSON input file
    #[arg(value_name = "JSON")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUT")]
    output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct BagSpec {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    fields: Map<String, Json>,
}

impl EncodeCmd {
    pub fn run(self, config: &SerializerConfig) -> Result<()> {
        let raw = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let specs: Vec<Option<BagSpec>> =
            serde_json::from_str(&raw).context("expected a JSON array of bags")?;

        let serializer = serializer(config);
        let mut bytes = Vec::with_capacity(config.initial_capacity);
        let mut offset = 0;
        for spec in &specs {
            let bag = spec.as_ref().map(to_bag);
            offset += serializer.serialize_into(&mut bytes, offset, bag.as_ref())?;
        }

        std::fs::write(&self.output, &bytes)
            .with_context(|| format!("failed to write {}", self.output.display()))?;
        println!(
            "Wrote {} frames ({}) to {}",
            specs.len(),
            format_size(bytes.len()),
            self.output.display()
        );
        Ok(())
    }
}

fn to_bag(spec: &BagSpec) -> FieldBag {
    bag_from_fields(&spec.type_name, &spec.fields)
}

fn bag_from_fields(type_name: &str, fields: &Map<String, Json>) -> FieldBag {
    let mut bag = FieldBag::with_capacity(type_name, fields.len());
    for (name, value) in fields {
        bag.add_value(name.clone(), to_value(value));
    }
    bag
}

fn to_value(json: &Json) -> Value {
    match json {
        Json::Object(obj) => match obj.get("$type") {
            Some(Json::String(type_name)) => {
                let mut fields = obj.clone();
                fields.remove("$type");
                Value::Object(bag_from_fields(type_name, &fields))
            }
            _ => Value::Map(
                obj.iter()
                    .map(|(k, v)| (Value::from(k.as_str()), to_value(v)))
                    .collect(),
            ),
        },
        Json::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        other => Value::from_json(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_type_becomes_object() {
        let json: Json = serde_json::from_str(
            r#"{"Message": "outer", "Inner": {"$type": "app::Inner", "Message": "inner"}}"#,
        )
        .unwrap();
        let Json::Object(fields) = json else {
            panic!("object expected");
        };
        let bag = bag_from_fields("app::Outer", &fields);
        assert_eq!(bag.names().collect::<Vec<_>>(), vec!["Message", "Inner"]);

        let inner = bag.get("Inner").and_then(Value::as_object).unwrap();
        assert_eq!(inner.type_name(), "app::Inner");
        assert_eq!(inner.get_string("Message").unwrap(), "inner");
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dump command - print frames as JSON.

use std::path::PathBuf;

use clap::Args;
use fieldpack::{FieldBag, SerializerConfig};
use serde_json::{json, Map, Value as Json};

use crate::common::{read_frames, Result};

/// Print every frame as a JSON object.
#[derive(Args, Clone, Debug)]
pub struct DumpCmd {
    /// Input file of concatenated frames
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Include each frame's raw bytes as hex
    #[arg(long)]
    hex: bool,
}

impl DumpCmd {
    pub fn run(self, config: &SerializerConfig) -> Result<()> {
        let (bytes, frames) = read_frames(&self.input, config)?;

        let mut out = Vec::with_capacity(frames.len());
        for frame in &frames {
            let mut entry = json!({
                "offset": frame.offset,
                "size": frame.size,
                "fields": frame.bag.as_ref().map(fields_json).unwrap_or(Json::Null),
            });
            if self.hex {
                let raw = &bytes[frame.offset..frame.offset + frame.size];
                entry["hex"] = Json::String(hex::encode(raw));
            }
            out.push(entry);
        }

        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(())
    }
}

/// Top-level entries as a JSON object, in wire order.
///
/// Top-level frames carry no type name, so unlike nested objects no
/// `"$type"` key is emitted.
fn fields_json(bag: &FieldBag) -> Json {
    let mut obj = Map::with_capacity(bag.len());
    for entry in bag {
        obj.insert(entry.name.clone(), entry.value.to_json());
    }
    Json::Object(obj)
}

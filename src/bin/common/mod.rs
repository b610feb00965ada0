// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use anyhow::Context as _;
use fieldpack::{FieldBag, MessagePackSerializer, SerializerConfig};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// One top-level frame found in a file.
#[derive(Debug)]
pub struct Frame {
    /// Byte offset of the frame start
    pub offset: usize,
    /// Encoded size in bytes
    pub size: usize,
    /// Decoded entries, `None` for a nil marker
    pub bag: Option<FieldBag>,
}

impl Frame {
    pub fn kind(&self) -> &'static str {
        if self.bag.is_some() {
            "map"
        } else {
            "nil"
        }
    }
}

/// Serializer over the built-in formatters, configured from `config`.
pub fn serializer(config: &SerializerConfig) -> MessagePackSerializer {
    MessagePackSerializer::from_config(config)
}

/// Decode back-to-back frames until the input is exhausted.
pub fn walk_frames(bytes: &[u8], config: &SerializerConfig) -> Result<Vec<Frame>> {
    let serializer = serializer(config);
    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (bag, size) = serializer
            .deserialize_at::<FieldBag>(bytes, offset)
            .with_context(|| format!("bad frame at offset {offset}"))?;
        frames.push(Frame { offset, size, bag });
        offset += size;
    }
    Ok(frames)
}

/// Read a file and decode its frames.
pub fn read_frames(path: &Path, config: &SerializerConfig) -> Result<(Vec<u8>, Vec<Frame>)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let frames = walk_frames(&bytes, config)?;
    Ok((bytes, frames))
}

/// Format a byte count to human-readable string.
pub fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

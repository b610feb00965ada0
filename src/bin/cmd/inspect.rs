// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - list the frames in a file.

use std::path::PathBuf;

use clap::Args;
use fieldpack::SerializerConfig;

use crate::common::{format_size, read_frames, Result};

/// List frames with offset, size, kind and entry names.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Input file of concatenated frames
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

impl InspectCmd {
    pub fn run(self, config: &SerializerConfig) -> Result<()> {
        let (bytes, frames) = read_frames(&self.input, config)?;

        println!("=== {} ===", self.input.display());
        println!("Frames: {}", frames.len());
        println!("Size: {}", format_size(bytes.len()));
        println!();

        for (index, frame) in frames.iter().enumerate() {
            match &frame.bag {
                Some(bag) => {
                    let names: Vec<&str> = bag.names().collect();
                    println!(
                        "  [{}] offset {} | {} | {} | {} entries: {}",
                        index,
                        frame.offset,
                        format_size(frame.size),
                        frame.kind(),
                        bag.len(),
                        names.join(", ")
                    );
                }
                None => println!(
                    "  [{}] offset {} | {} | {}",
                    index,
                    frame.offset,
                    format_size(frame.size),
                    frame.kind()
                ),
            }
        }

        Ok(())
    }
}

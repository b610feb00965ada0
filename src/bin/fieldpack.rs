// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Fieldpack CLI
//!
//! Inspect and produce files of concatenated field-bag frames.
//!
//! ## Usage
//!
//! ```sh
//! # List frames with their offsets, sizes and entry names
//! fieldpack inspect frames.bin
//!
//! # Print frames as JSON, with raw bytes
//! fieldpack dump frames.bin --hex
//!
//! # Encode a JSON array of bags into frames
//! fieldpack encode bags.json frames.bin
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{DumpCmd, EncodeCmd, InspectCmd};
use common::Result;
use fieldpack::SerializerConfig;

/// Fieldpack - field-bag MessagePack toolkit
#[derive(Parser, Clone)]
#[command(name = "fieldpack")]
#[command(about = "Inspect, dump and encode field-bag MessagePack frames", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Serializer settings (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// List frames: offset, size, kind and entry names
    Inspect(InspectCmd),

    /// Print frames as JSON
    Dump(DumpCmd),

    /// Write a JSON array of bags as concatenated frames
    Encode(EncodeCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SerializerConfig::load(path)?,
        None => SerializerConfig::default(),
    };

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(&config),
        Commands::Dump(cmd) => cmd.run(&config),
        Commands::Encode(cmd) => cmd.run(&config),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

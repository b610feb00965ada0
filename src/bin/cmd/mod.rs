// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod dump;
mod encode;
mod inspect;

pub use dump::DumpCmd;
pub use encode::EncodeCmd;
pub use inspect::InspectCmd;

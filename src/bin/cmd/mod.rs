// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod inspect;
mod unwrap;
mod wrap;

pub use inspect::InspectCmd;
pub use unwrap::UnwrapCmd;
pub use wrap::WrapCmd;

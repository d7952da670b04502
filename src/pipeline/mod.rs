// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wrap and unwrap drivers.
//!
//! - [`wrap()`] pulls codestreams from a source, resolves the descriptor
//!   from the first one and writes every frame into a container.
//! - [`unwrap()`] reads every frame of a container back out into a file list
//!   or an `MJC2` multiplex.

pub mod unwrap;
pub mod wrap;

pub use unwrap::{unwrap, unwrap_with_progress, UnwrapStats, UnwrapTarget};
pub use wrap::{wrap, wrap_with_progress, WrapOptions, WrapStats};

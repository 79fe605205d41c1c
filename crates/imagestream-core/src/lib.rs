// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagestream — Core types, configuration, platform guard, and error
// definitions shared across all crates.

pub mod config;
pub mod error;
pub mod platform;
pub mod types;

pub use config::WorkflowConfig;
pub use error::ImageStreamError;
pub use platform::{FileProbe, FsProbe, NativeDependency, PlatformGuard, TargetOs};
pub use types::*;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform guard — refuse to start when a required native imaging library is
// not installed.
//
// The check is a one-shot precondition: each dependency is tied to one OS and
// lists candidate install paths. The dependency is satisfied when any
// candidate exists. There is no retry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ImageStreamError, Result};

/// Operating system identity as far as the guard cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetOs {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl TargetOs {
    /// The OS this binary is running on.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Other => "this platform",
        }
    }
}

/// A shared library that must be present on a given OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeDependency {
    pub os: TargetOs,
    /// Library name, for logs.
    pub name: String,
    /// Install locations; any one of them satisfies the dependency.
    pub candidates: Vec<PathBuf>,
    /// Message printed when none of the candidates exist.
    pub install_hint: String,
}

impl NativeDependency {
    /// The imaging library required on macOS and Linux.
    pub fn platform_defaults() -> Vec<Self> {
        vec![
            Self {
                os: TargetOs::MacOs,
                name: "libgdiplus".into(),
                candidates: vec!["/usr/local/lib/libgdiplus.dylib".into()],
                install_hint: "Please install libgdiplus first to access the System.Drawing namespace on macOS.".into(),
            },
            Self {
                os: TargetOs::Linux,
                name: "libgdiplus".into(),
                candidates: vec![
                    "/usr/lib64/libgdiplus.so".into(),
                    "/usr/lib/libgdiplus.so".into(),
                ],
                install_hint: "Please install libgdiplus first to access the System.Drawing namespace on Linux.".into(),
            },
        ]
    }
}

/// Filesystem existence check, abstracted so the guard can be exercised
/// without touching real system paths.
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Precondition gate over a set of native dependencies.
#[derive(Debug, Clone)]
pub struct PlatformGuard {
    dependencies: Vec<NativeDependency>,
}

impl PlatformGuard {
    pub fn new(dependencies: Vec<NativeDependency>) -> Self {
        Self { dependencies }
    }

    /// Verify every dependency declared for `os`.
    ///
    /// Returns `MissingNativeDependency` carrying the install hint for the
    /// first unsatisfied dependency.
    pub fn check(&self, os: TargetOs, probe: &dyn FileProbe) -> Result<()> {
        for dependency in self.dependencies.iter().filter(|dep| dep.os == os) {
            let found = dependency
                .candidates
                .iter()
                .find(|candidate| probe.exists(candidate));

            match found {
                Some(path) => {
                    debug!(
                        library = %dependency.name,
                        path = %path.display(),
                        "native dependency present"
                    );
                }
                None => {
                    warn!(
                        library = %dependency.name,
                        os = os.display_name(),
                        "native dependency missing"
                    );
                    return Err(ImageStreamError::MissingNativeDependency {
                        name: dependency.name.clone(),
                        hint: dependency.install_hint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

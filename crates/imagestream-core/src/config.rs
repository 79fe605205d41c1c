// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workflow configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ImageStreamError, Result};
use crate::platform::NativeDependency;
use crate::types::{InputPaths, Rect};

/// Settings for a single ingest-and-place run.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Directory holding the bundled sample assets.
    pub resource_directory: PathBuf,
    /// Default bitmap input, relative to `resource_directory`.
    pub bitmap_sample: PathBuf,
    /// Default JPEG input, relative to `resource_directory`.
    pub jpeg_sample: PathBuf,
    /// Default PDF output path.
    pub document_output: PathBuf,
    /// Fixed path of the standalone PNG export.
    pub png_output: PathBuf,
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    /// Title written into the PDF metadata.
    pub document_title: String,
    /// Native libraries checked before anything else runs.
    pub native_dependencies: Vec<NativeDependency>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            resource_directory: PathBuf::from("Resources"),
            bitmap_sample: PathBuf::from("Sample_Input/sample.bmp"),
            jpeg_sample: PathBuf::from("Sample_Input/sample.jpg"),
            document_output: PathBuf::from("ImageFromStream-out2.pdf"),
            png_output: PathBuf::from("ImageFromStream-out.png"),
            page_width: 612.0,
            page_height: 792.0,
            document_title: "ImageFromStream".into(),
            native_dependencies: NativeDependency::platform_defaults(),
        }
    }
}

impl WorkflowConfig {
    /// Read a JSON config file. Keys that are absent keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            ImageStreamError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|err| {
            ImageStreamError::Config(format!("cannot parse {}: {}", path.display(), err))
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// The paths used when no positional arguments are given.
    pub fn default_inputs(&self) -> InputPaths {
        InputPaths {
            bitmap_input: self.resource_directory.join(&self.bitmap_sample),
            jpeg_input: self.resource_directory.join(&self.jpeg_sample),
            document_output: self.document_output.clone(),
        }
    }

    /// The media box of the page the JPEG is placed on.
    pub fn page_rect(&self) -> Result<Rect> {
        Rect::new(0.0, 0.0, self.page_width, self.page_height)
    }
}

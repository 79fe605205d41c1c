// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for imagestream.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ImageStreamError, Result};

/// A rectangle in PDF user-space units (1/72 inch).
///
/// Stored as lower-left and upper-right corners, the same way a PDF
/// `/MediaBox` array is written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl Rect {
    /// Build a rectangle, rejecting empty or inverted extents.
    pub fn new(llx: f32, lly: f32, urx: f32, ury: f32) -> Result<Self> {
        let rect = Self { llx, lly, urx, ury };
        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            return Err(ImageStreamError::InvalidRect(format!(
                "[{llx} {lly} {urx} {ury}] has no area"
            )));
        }
        Ok(rect)
    }

    /// US Letter portrait, 612 x 792 points.
    pub fn letter() -> Self {
        Self {
            llx: 0.0,
            lly: 0.0,
            urx: 612.0,
            ury: 792.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }
}

/// Formats a document image can be exported to as a standalone file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Gif,
}

/// Encoding used when an input image is buffered into an in-memory stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamFormat {
    Bmp,
    /// JPEG at the given quality (1-100).
    Jpeg { quality: u8 },
}

impl StreamFormat {
    /// Quality used when the caller does not pick one.
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    pub fn jpeg() -> Self {
        Self::Jpeg {
            quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Bmp => "image/bmp",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Where a new page is inserted into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIndex {
    /// Insert ahead of every existing page.
    BeforeFirst,
    /// Insert directly after the zero-based page `n`.
    After(usize),
}

/// The three paths the workflow operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub bitmap_input: PathBuf,
    pub jpeg_input: PathBuf,
    pub document_output: PathBuf,
}

impl InputPaths {
    /// Substitute positional arguments over `defaults`, in order: bitmap,
    /// JPEG, output document. Missing arguments keep the default. Nothing is
    /// checked for existence here.
    pub fn resolve<I, P>(args: I, defaults: InputPaths) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut resolved = defaults;
        let mut args = args.into_iter();
        if let Some(bitmap) = args.next() {
            resolved.bitmap_input = bitmap.into();
        }
        if let Some(jpeg) = args.next() {
            resolved.jpeg_input = jpeg.into();
        }
        if let Some(output) = args.next() {
            resolved.document_output = output.into();
        }
        resolved
    }
}

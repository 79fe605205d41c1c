// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for imagestream.

use thiserror::Error;

/// Top-level error type for all imagestream operations.
#[derive(Debug, Error)]
pub enum ImageStreamError {
    // -- Image errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("stream must be rewound before use (read position is {position})")]
    StreamNotRewound { position: u64 },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image export failed: {0}")]
    Export(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("page index {index} out of range (document has {count} pages)")]
    PageIndex { index: usize, count: usize },

    #[error("invalid rectangle: {0}")]
    InvalidRect(String),

    // -- Environment --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing native dependency {name}: {hint}")]
    MissingNativeDependency { name: String, hint: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ImageStreamError>;

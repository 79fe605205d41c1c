// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagestream-document — Image ingestion and PDF placement.
//
// Provides the library handle that scopes a run, in-memory image streams
// (decode a file, re-encode it as BMP or JPEG into a seekable buffer),
// document image objects built from those streams, and a page/content model
// that serialises to PDF. A lopdf-backed inspector reads the output back.

pub mod image;
pub mod library;
pub mod pdf;

// Re-export the primary structs so callers can use `imagestream_document::Image` etc.
pub use crate::image::object::Image;
pub use crate::image::stream::ImageStream;
pub use library::Library;
pub use pdf::document::Document;
pub use pdf::page::{Content, Element, Page};
pub use pdf::reader::PdfInspector;

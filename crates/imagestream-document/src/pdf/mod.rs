// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — documents, pages, serialisation, and read-back inspection.

pub mod document;
pub mod page;
pub mod reader;
pub mod writer;

pub use document::Document;
pub use page::{Content, Element, Page};
pub use reader::PdfInspector;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Library handle — the outermost resource scope of a run.

use imagestream_core::WorkflowConfig;
use tracing::{debug, info};

use crate::pdf::document::Document;

/// Owns run-wide settings. Every [`Document`] borrows the library, so the
/// handle necessarily outlives all documents created from it.
#[derive(Debug)]
pub struct Library {
    document_title: String,
}

impl Library {
    pub fn new(config: &WorkflowConfig) -> Self {
        info!(
            resource_directory = %config.resource_directory.display(),
            "Library initialised"
        );
        Self {
            document_title: config.document_title.clone(),
        }
    }

    /// Title given to new documents.
    pub fn document_title(&self) -> &str {
        &self.document_title
    }

    /// Create a new, empty document.
    pub fn new_document(&self) -> Document<'_> {
        Document::new(self)
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        debug!("Library released");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document — an ordered set of pages plus a store of image data shared by
// every image bound to it.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

use imagestream_core::error::ImageStreamError;
use imagestream_core::{PageIndex, Rect};
use tracing::{debug, info, instrument};

use crate::image::object::{ImageData, ImageDigest, digest_bytes};
use crate::library::Library;
use crate::pdf::page::Page;
use crate::pdf::writer;

/// A new PDF document under construction.
///
/// Tied to the [`Library`] it was created from, which must outlive it.
#[derive(Debug)]
pub struct Document<'lib> {
    library: PhantomData<&'lib Library>,
    title: String,
    pages: Vec<Page>,
    /// Decoded image data keyed by the digest of its encoded bytes.
    images: HashMap<ImageDigest, Rc<ImageData>>,
}

impl<'lib> Document<'lib> {
    /// Create an empty document with no pages.
    pub fn new(library: &'lib Library) -> Self {
        Self {
            library: PhantomData,
            title: library.document_title().to_owned(),
            pages: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // -- Pages ----------------------------------------------------------------

    /// Insert a new, empty page with the given media box.
    ///
    /// The media box must be anchored at the origin; pages are written with
    /// their lower-left corner at (0, 0).
    pub fn create_page(
        &mut self,
        index: PageIndex,
        media_box: Rect,
    ) -> Result<&mut Page, ImageStreamError> {
        if media_box.llx != 0.0 || media_box.lly != 0.0 {
            return Err(ImageStreamError::InvalidRect(format!(
                "page media box must start at the origin, got ({}, {})",
                media_box.llx, media_box.lly
            )));
        }

        let position = match index {
            PageIndex::BeforeFirst => 0,
            PageIndex::After(n) if n < self.pages.len() => n + 1,
            PageIndex::After(n) => {
                return Err(ImageStreamError::PageIndex {
                    index: n,
                    count: self.pages.len(),
                });
            }
        };

        self.pages.insert(position, Page::new(media_box));
        debug!(
            position,
            width = media_box.width(),
            height = media_box.height(),
            "Page created"
        );
        Ok(&mut self.pages[position])
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Borrow the zero-based page `index` for editing.
    pub fn get_page(&mut self, index: usize) -> Result<&mut Page, ImageStreamError> {
        let count = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(ImageStreamError::PageIndex { index, count })
    }

    /// Borrow the zero-based page `index`.
    pub fn page(&self, index: usize) -> Result<&Page, ImageStreamError> {
        self.pages.get(index).ok_or(ImageStreamError::PageIndex {
            index,
            count: self.pages.len(),
        })
    }

    // -- Image store ----------------------------------------------------------

    /// Decode `bytes` unless identical bytes were stored before.
    pub(crate) fn intern_image(
        &mut self,
        bytes: &[u8],
    ) -> Result<Rc<ImageData>, ImageStreamError> {
        let digest = digest_bytes(bytes);
        if let Some(existing) = self.images.get(&digest) {
            debug!(digest = %hex::encode(digest), "Reusing stored image data");
            return Ok(Rc::clone(existing));
        }

        let data = Rc::new(ImageData::decode(bytes, digest)?);
        self.images.insert(digest, Rc::clone(&data));
        Ok(data)
    }

    /// Number of distinct images held in the store.
    pub fn stored_image_count(&self) -> usize {
        self.images.len()
    }

    // -- Output ---------------------------------------------------------------

    /// Serialise the whole document to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageStreamError> {
        if self.pages.is_empty() {
            return Err(ImageStreamError::PdfError(
                "cannot save a document with no pages".into(),
            ));
        }
        writer::write_document(&self.title, &self.pages)
    }

    /// Serialise the document and write it to `path`, replacing any existing
    /// file.
    #[instrument(skip(self), fields(path = %path.as_ref().display(), pages = self.pages.len()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageStreamError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(bytes = bytes.len(), "Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pages and their content lists.
//
// A page keeps two views of its content: the editable element list, and the
// snapshot taken by the last `update_content()` call. Only the snapshot is
// written when the document is saved.

use imagestream_core::Rect;
use tracing::debug;

use crate::image::object::Image;

/// Something drawn on a page.
#[derive(Debug, Clone)]
pub enum Element {
    Image(Image),
}

impl Element {
    /// Area the element occupies on the page.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Image(image) => image.bounding_box(),
        }
    }
}

impl From<Image> for Element {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

/// Ordered list of elements on a page.
#[derive(Debug, Clone, Default)]
pub struct Content {
    elements: Vec<Element>,
}

impl Content {
    /// Append an element; it is drawn after (on top of) existing elements.
    pub fn add_element(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A single page of a [`crate::Document`].
#[derive(Debug, Clone)]
pub struct Page {
    media_box: Rect,
    content: Content,
    committed: Vec<Element>,
    dirty: bool,
}

impl Page {
    pub(crate) fn new(media_box: Rect) -> Self {
        Self {
            media_box,
            content: Content::default(),
            committed: Vec::new(),
            dirty: false,
        }
    }

    pub fn media_box(&self) -> Rect {
        self.media_box
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Mutable access to the content list. Changes are not written until
    /// [`Page::update_content`] is called.
    pub fn content_mut(&mut self) -> &mut Content {
        self.dirty = true;
        &mut self.content
    }

    /// Regenerate the page's drawing from its content list.
    pub fn update_content(&mut self) {
        self.committed = self.content.elements.clone();
        self.dirty = false;
        debug!(elements = self.committed.len(), "Page content updated");
    }

    /// Elements that will be written on save.
    pub fn committed_elements(&self) -> &[Element] {
        &self.committed
    }

    /// True when the content list changed after the last update.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }
}

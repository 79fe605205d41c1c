// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — read a saved PDF back with `lopdf` and report its pages,
// media boxes, and the images painted on each page.

use std::path::Path;

use imagestream_core::Rect;
use imagestream_core::error::ImageStreamError;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument};

/// Upper bound on `/Parent` hops when looking up inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Read-only view over an existing PDF file.
pub struct PdfInspector {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfInspector {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageStreamError> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            ImageStreamError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create an inspector from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImageStreamError> {
        let document = Document::load_mem(data).map_err(|err| {
            ImageStreamError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the inspector was created via [`PdfInspector::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Media box of page `page_number` (1-indexed).
    pub fn media_box(&self, page_number: u32) -> Result<Rect, ImageStreamError> {
        let page = self.page_dictionary(page_number)?;
        let object = self.inherited(page, b"MediaBox")?.ok_or_else(|| {
            ImageStreamError::PdfError(format!("page {} has no /MediaBox", page_number))
        })?;

        let values = self
            .resolve(object)?
            .as_array()
            .map_err(|err| ImageStreamError::PdfError(format!("bad /MediaBox: {}", err)))?
            .iter()
            .map(number)
            .collect::<Option<Vec<f32>>>()
            .filter(|values| values.len() == 4)
            .ok_or_else(|| ImageStreamError::PdfError("/MediaBox is not four numbers".into()))?;

        Rect::new(values[0], values[1], values[2], values[3])
    }

    /// Number of image elements painted on page `page_number` (1-indexed):
    /// `Do` operators whose operand names an image XObject in the page's
    /// resources.
    pub fn image_elements(&self, page_number: u32) -> Result<usize, ImageStreamError> {
        let page_id = self.page_id(page_number)?;
        let page = self.page_dictionary(page_number)?;

        let xobjects = match self.inherited(page, b"Resources")? {
            Some(resources) => {
                let resources = self.dictionary(resources)?;
                match resources.get(b"XObject") {
                    Ok(xobjects) => Some(self.dictionary(xobjects)?),
                    Err(_) => None,
                }
            }
            None => None,
        };
        let Some(xobjects) = xobjects else {
            return Ok(0);
        };

        let raw = self.document.get_page_content(page_id).map_err(|err| {
            ImageStreamError::PdfError(format!(
                "failed to read content of page {}: {}",
                page_number, err
            ))
        })?;
        let content = Content::decode(&raw).map_err(|err| {
            ImageStreamError::PdfError(format!(
                "failed to parse content of page {}: {}",
                page_number, err
            ))
        })?;

        let mut count = 0;
        for operation in content.operations.iter().filter(|op| op.operator == "Do") {
            let Some(Object::Name(name)) = operation.operands.first() else {
                continue;
            };
            let Ok(target) = xobjects.get(name) else {
                continue;
            };
            if self.is_image_xobject(target)? {
                count += 1;
            }
        }

        debug!(page_number, images = count, "Page images counted");
        Ok(count)
    }

    /// One-line summary for logs.
    pub fn log_summary(&self) -> Result<(), ImageStreamError> {
        let pages = self.page_count();
        let mut images = 0;
        for page_number in 1..=pages as u32 {
            images += self.image_elements(page_number)?;
        }
        info!(
            source = self.source_path().unwrap_or("<memory>"),
            pages, images, "PDF contents verified"
        );
        Ok(())
    }

    // -- Object helpers -------------------------------------------------------

    fn page_id(&self, page_number: u32) -> Result<ObjectId, ImageStreamError> {
        let pages = self.document.get_pages();
        pages.get(&page_number).copied().ok_or_else(|| {
            ImageStreamError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })
    }

    fn page_dictionary(&self, page_number: u32) -> Result<&Dictionary, ImageStreamError> {
        let page_id = self.page_id(page_number)?;
        self.document
            .get_dictionary(page_id)
            .map_err(|err| ImageStreamError::PdfError(format!("bad page object: {}", err)))
    }

    /// Follow a reference to the object it points at.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object, ImageStreamError> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                ImageStreamError::PdfError(format!("dangling reference {:?}: {}", id, err))
            }),
            other => Ok(other),
        }
    }

    fn dictionary<'a>(&'a self, object: &'a Object) -> Result<&'a Dictionary, ImageStreamError> {
        match self.resolve(object)? {
            Object::Dictionary(dict) => Ok(dict),
            Object::Stream(stream) => Ok(&stream.dict),
            _ => Err(ImageStreamError::PdfError("expected a dictionary".into())),
        }
    }

    /// Look up `key` on the page, then up its `/Parent` chain.
    fn inherited<'a>(
        &'a self,
        page: &'a Dictionary,
        key: &[u8],
    ) -> Result<Option<&'a Object>, ImageStreamError> {
        let mut node = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Ok(Some(value));
            }
            match node.get(b"Parent") {
                Ok(parent) => node = self.dictionary(parent)?,
                Err(_) => return Ok(None),
            }
        }
        Ok(None)
    }

    fn is_image_xobject(&self, object: &Object) -> Result<bool, ImageStreamError> {
        let dict = self.dictionary(object)?;
        Ok(matches!(dict.get(b"Subtype"), Ok(Object::Name(subtype)) if subtype == b"Image"))
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::object::Image;
    use crate::image::stream::ImageStream;
    use crate::library::Library;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use imagestream_core::{PageIndex, StreamFormat, WorkflowConfig};

    fn jpeg_stream(width: u32, height: u32) -> ImageStream {
        let pixels = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 200])
        }));
        ImageStream::from_dynamic(&pixels, StreamFormat::jpeg()).unwrap()
    }

    #[test]
    fn single_page_single_image() {
        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        document
            .create_page(PageIndex::BeforeFirst, Rect::letter())
            .unwrap();

        let image = Image::from_stream_in(&mut jpeg_stream(64, 48), &mut document).unwrap();
        let page = document.get_page(0).unwrap();
        page.content_mut().add_element(image);
        page.update_content();

        let inspector = PdfInspector::from_bytes(&document.to_bytes().unwrap()).unwrap();
        assert_eq!(inspector.page_count(), 1);
        assert_eq!(inspector.image_elements(1).unwrap(), 1);
        assert!(inspector.source_path().is_none());

        let media_box = inspector.media_box(1).unwrap();
        assert!((media_box.width() - 612.0).abs() < 0.5);
        assert!((media_box.height() - 792.0).abs() < 0.5);
    }

    #[test]
    fn uncommitted_content_is_not_written() {
        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        document
            .create_page(PageIndex::BeforeFirst, Rect::letter())
            .unwrap();

        let image = Image::from_stream_in(&mut jpeg_stream(8, 8), &mut document).unwrap();
        document.get_page(0).unwrap().content_mut().add_element(image);

        let inspector = PdfInspector::from_bytes(&document.to_bytes().unwrap()).unwrap();
        assert_eq!(inspector.page_count(), 1);
        assert_eq!(inspector.image_elements(1).unwrap(), 0);
    }

    #[test]
    fn saved_file_can_be_opened() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");

        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        document
            .create_page(PageIndex::BeforeFirst, Rect::letter())
            .unwrap();
        document
            .create_page(PageIndex::After(0), Rect::letter())
            .unwrap();

        let image = Image::from_stream_in(&mut jpeg_stream(10, 10), &mut document).unwrap();
        let page = document.get_page(1).unwrap();
        page.content_mut().add_element(image.clone());
        page.content_mut().add_element(image);
        page.update_content();
        document.save(&out).unwrap();

        let inspector = PdfInspector::open(&out).unwrap();
        assert_eq!(inspector.page_count(), 2);
        assert_eq!(inspector.image_elements(1).unwrap(), 0);
        assert_eq!(inspector.image_elements(2).unwrap(), 2);
        assert!(inspector.media_box(3).is_err());
        assert!(inspector.log_summary().is_ok());
    }

    #[test]
    fn image_with_alpha_is_placed() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_fn(12, 9, |x, y| {
            Rgba([(x * 20) as u8, (y * 25) as u8, 90, ((x + y) * 10) as u8])
        }));
        let mut stream = ImageStream::from_dynamic(&rgba, StreamFormat::Bmp).unwrap();

        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        document
            .create_page(PageIndex::BeforeFirst, Rect::letter())
            .unwrap();
        let image = Image::from_stream_in(&mut stream, &mut document).unwrap();
        let page = document.get_page(0).unwrap();
        page.content_mut().add_element(image);
        page.update_content();

        let inspector = PdfInspector::from_bytes(&document.to_bytes().unwrap()).unwrap();
        assert_eq!(inspector.image_elements(1).unwrap(), 1);
    }

    #[test]
    fn custom_media_box_survives_save() {
        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        let a4 = Rect::new(0.0, 0.0, 595.0, 842.0).unwrap();
        document.create_page(PageIndex::BeforeFirst, a4).unwrap();

        let inspector = PdfInspector::from_bytes(&document.to_bytes().unwrap()).unwrap();
        let media_box = inspector.media_box(1).unwrap();
        assert!(media_box.llx.abs() < 0.5 && media_box.lly.abs() < 0.5);
        assert!((media_box.urx - 595.0).abs() < 0.5);
        assert!((media_box.ury - 842.0).abs() < 0.5);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            PdfInspector::from_bytes(b"not a pdf"),
            Err(ImageStreamError::PdfError(_))
        ));
    }
}

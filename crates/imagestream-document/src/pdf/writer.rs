// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise pages and their committed content using `printpdf`
// 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::collections::HashMap;

use imagestream_core::error::ImageStreamError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, XObjectId, XObjectTransform,
};
use tracing::{debug, instrument, warn};

use crate::image::object::ImageDigest;
use crate::pdf::page::{Element, Page};

/// Images are placed at one pixel per point.
const PLACEMENT_DPI: f32 = 72.0;

/// Serialise `pages` into a complete PDF file.
///
/// Each distinct image (by digest) is embedded once, however many times it is
/// placed.
#[instrument(skip(pages), fields(pages = pages.len()))]
pub(crate) fn write_document(title: &str, pages: &[Page]) -> Result<Vec<u8>, ImageStreamError> {
    let mut doc = PdfDocument::new(title);
    let mut embedded: HashMap<ImageDigest, XObjectId> = HashMap::new();
    let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

    for (index, page) in pages.iter().enumerate() {
        if page.has_pending_changes() {
            warn!(
                page = index,
                "Page has content added after the last update; it will not be written"
            );
        }

        let media_box = page.media_box();
        let mut ops: Vec<Op> = Vec::new();

        for element in page.committed_elements() {
            match element {
                Element::Image(image) => {
                    let id = match embedded.get(image.digest()) {
                        Some(id) => id.clone(),
                        None => {
                            let id = doc.add_image(&image.to_raw_image());
                            embedded.insert(*image.digest(), id.clone());
                            id
                        }
                    };

                    let placed = image.bounding_box();
                    ops.push(Op::UseXobject {
                        id,
                        transform: XObjectTransform {
                            translate_x: Some(Pt(placed.llx)),
                            translate_y: Some(Pt(placed.lly)),
                            scale_x: None,
                            scale_y: None,
                            dpi: Some(PLACEMENT_DPI),
                            rotate: None,
                        },
                    });
                }
            }
        }

        pdf_pages.push(PdfPage::new(
            points_to_mm(media_box.width()),
            points_to_mm(media_box.height()),
            ops,
        ));
    }

    doc.with_pages(pdf_pages);

    debug!(
        pages = doc.pages.len(),
        embedded_images = embedded.len(),
        "Document layout complete"
    );

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

    for warning in &warnings {
        debug!(?warning, "printpdf warning");
    }

    Ok(output)
}

/// printpdf sizes pages in millimetres.
fn points_to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

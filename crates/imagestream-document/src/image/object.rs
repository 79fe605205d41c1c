// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document image object — decoded image data ready to be exported as a
// standalone file or placed on a page.

use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;

use image::{DynamicImage, ImageFormat};
use imagestream_core::error::ImageStreamError;
use imagestream_core::{ImageType, Rect};
use printpdf::{RawImage, RawImageData, RawImageFormat};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::pdf::document::Document;

/// SHA-256 of the encoded bytes an image was built from.
pub type ImageDigest = [u8; 32];

/// Decoded pixels plus the identity of the bytes they came from.
///
/// Shared between every [`Image`] built from identical bytes inside one
/// document.
#[derive(Debug)]
pub(crate) struct ImageData {
    pixels: DynamicImage,
    source_format: ImageFormat,
    digest: ImageDigest,
}

impl ImageData {
    /// Sniff the container format and decode.
    pub(crate) fn decode(bytes: &[u8], digest: ImageDigest) -> Result<Self, ImageStreamError> {
        let source_format = image::guess_format(bytes)
            .map_err(|err| ImageStreamError::UnsupportedFormat(err.to_string()))?;
        let pixels = image::load_from_memory_with_format(bytes, source_format).map_err(|err| {
            ImageStreamError::Decode(format!("failed to decode stream content: {}", err))
        })?;
        debug!(
            width = pixels.width(),
            height = pixels.height(),
            format = ?source_format,
            "Stream content decoded"
        );
        Ok(Self {
            pixels,
            source_format,
            digest,
        })
    }
}

/// Fingerprint encoded image bytes.
pub(crate) fn digest_bytes(bytes: &[u8]) -> ImageDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// An image built from a stream.
///
/// Cloning is cheap: clones share the decoded pixels.
#[derive(Debug, Clone)]
pub struct Image {
    data: Rc<ImageData>,
    /// Whether the data lives in a document's image store.
    bound: bool,
}

impl Image {
    // -- Construction ---------------------------------------------------------

    /// Build a standalone image from a stream positioned at its start.
    ///
    /// The stream is read to the end. A stream whose read position is not
    /// zero is rejected with `StreamNotRewound`.
    #[instrument(skip_all)]
    pub fn from_stream<R: Read + Seek>(stream: &mut R) -> Result<Self, ImageStreamError> {
        let bytes = read_from_start(stream)?;
        let data = ImageData::decode(&bytes, digest_bytes(&bytes))?;
        let image = Self {
            data: Rc::new(data),
            bound: false,
        };
        info!(
            width = image.width(),
            height = image.height(),
            digest = %image.digest_hex(),
            "Image created from stream"
        );
        Ok(image)
    }

    /// Build an image whose data is stored in `document`.
    ///
    /// Identical stream content handed to the same document is decoded once
    /// and embedded once when the document is saved.
    #[instrument(skip_all)]
    pub fn from_stream_in<R: Read + Seek>(
        stream: &mut R,
        document: &mut Document<'_>,
    ) -> Result<Self, ImageStreamError> {
        let bytes = read_from_start(stream)?;
        let image = Self {
            data: document.intern_image(&bytes)?,
            bound: true,
        };
        info!(
            width = image.width(),
            height = image.height(),
            digest = %image.digest_hex(),
            "Image created from stream for document"
        );
        Ok(image)
    }

    // -- Accessors ------------------------------------------------------------

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.data.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.data.pixels.height()
    }

    /// Container format the stream held.
    pub fn source_format(&self) -> ImageFormat {
        self.data.source_format
    }

    pub fn digest(&self) -> &ImageDigest {
        &self.data.digest
    }

    /// Lowercase hex of [`Image::digest`].
    pub fn digest_hex(&self) -> String {
        hex::encode(self.data.digest)
    }

    /// True when built with [`Image::from_stream_in`].
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// True when both images share one decoded buffer.
    pub fn shares_data_with(&self, other: &Image) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Area the image occupies when placed: its pixel size in points,
    /// anchored at the page origin.
    pub fn bounding_box(&self) -> Rect {
        Rect {
            llx: 0.0,
            lly: 0.0,
            urx: self.width() as f32,
            ury: self.height() as f32,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to `path` as a standalone file of type `image_type`.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        image_type: ImageType,
    ) -> Result<(), ImageStreamError> {
        let pixels = &self.data.pixels;
        let (prepared, format) = match image_type {
            ImageType::Jpeg => (DynamicImage::ImageRgb8(pixels.to_rgb8()), ImageFormat::Jpeg),
            ImageType::Png => (flatten_8bit(pixels), ImageFormat::Png),
            ImageType::Bmp => (flatten_8bit(pixels), ImageFormat::Bmp),
            ImageType::Tiff => (flatten_8bit(pixels), ImageFormat::Tiff),
            ImageType::Gif => (DynamicImage::ImageRgba8(pixels.to_rgba8()), ImageFormat::Gif),
        };

        prepared
            .save_with_format(path.as_ref(), format)
            .map_err(|err| {
                ImageStreamError::Export(format!(
                    "failed to save image to {}: {}",
                    path.as_ref().display(),
                    err
                ))
            })?;

        info!(?image_type, "Image exported");
        Ok(())
    }

    /// Pixel data in the layout printpdf embeds.
    pub(crate) fn to_raw_image(&self) -> RawImage {
        let pixels = &self.data.pixels;
        let width = pixels.width() as usize;
        let height = pixels.height() as usize;

        let (data, data_format) = if pixels.color().has_alpha() {
            (pixels.to_rgba8().into_raw(), RawImageFormat::RGBA8)
        } else {
            (pixels.to_rgb8().into_raw(), RawImageFormat::RGB8)
        };

        RawImage {
            pixels: RawImageData::U8(data),
            width,
            height,
            data_format,
            tag: Vec::new(),
        }
    }
}

/// Read the whole stream, insisting it starts at position zero.
fn read_from_start<R: Read + Seek>(stream: &mut R) -> Result<Vec<u8>, ImageStreamError> {
    let position = stream.stream_position()?;
    if position != 0 {
        return Err(ImageStreamError::StreamNotRewound { position });
    }

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(ImageStreamError::Decode("stream is empty".into()));
    }
    Ok(bytes)
}

/// Convert to 8-bit RGB or RGBA, keeping alpha only when present.
fn flatten_8bit(image: &DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::stream::ImageStream;
    use crate::library::Library;
    use image::{Rgb, RgbImage};
    use imagestream_core::{StreamFormat, WorkflowConfig};
    use std::io::Cursor;

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }))
    }

    #[test]
    fn standalone_image_from_bmp_stream() {
        let mut stream = ImageStream::from_dynamic(&checkerboard(30, 20), StreamFormat::Bmp).unwrap();
        let image = Image::from_stream(&mut stream).unwrap();
        assert_eq!((image.width(), image.height()), (30, 20));
        assert_eq!(image.source_format(), ImageFormat::Bmp);
        assert!(!image.is_bound());
        assert_eq!(image.bounding_box().urx, 30.0);
    }

    #[test]
    fn unrewound_stream_is_rejected() {
        let mut stream = ImageStream::from_dynamic(&checkerboard(4, 4), StreamFormat::Bmp).unwrap();
        let _ = Image::from_stream(&mut stream).unwrap();

        // The first construction consumed the stream.
        let err = Image::from_stream(&mut stream).unwrap_err();
        assert!(matches!(err, ImageStreamError::StreamNotRewound { position } if position > 0));

        stream.rewind();
        assert!(Image::from_stream(&mut stream).is_ok());
    }

    #[test]
    fn garbage_stream_is_unsupported() {
        let mut cursor = Cursor::new(b"plain text, not pixels".to_vec());
        let err = Image::from_stream(&mut cursor).unwrap_err();
        assert!(matches!(err, ImageStreamError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_stream_is_decode_error() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(matches!(
            Image::from_stream(&mut cursor),
            Err(ImageStreamError::Decode(_))
        ));
    }

    #[test]
    fn png_export_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let mut stream = ImageStream::from_dynamic(&checkerboard(33, 17), StreamFormat::Bmp).unwrap();
        Image::from_stream(&mut stream)
            .unwrap()
            .save(&out, ImageType::Png)
            .unwrap();

        let reread = image::open(&out).unwrap();
        assert_eq!((reread.width(), reread.height()), (33, 17));
        assert_eq!(reread.to_rgb8(), checkerboard(33, 17).to_rgb8());
    }

    #[test]
    fn png_export_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let mut stream = ImageStream::from_dynamic(&checkerboard(8, 8), StreamFormat::Bmp).unwrap();
        let image = Image::from_stream(&mut stream).unwrap();

        image.save(&out, ImageType::Png).unwrap();
        let first = std::fs::read(&out).unwrap();
        image.save(&out, ImageType::Png).unwrap();
        assert_eq!(first, std::fs::read(&out).unwrap());
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no-such-dir").join("out.png");
        let mut stream = ImageStream::from_dynamic(&checkerboard(2, 2), StreamFormat::Bmp).unwrap();
        let image = Image::from_stream(&mut stream).unwrap();
        assert!(matches!(
            image.save(&out, ImageType::Png),
            Err(ImageStreamError::Export(_))
        ));
    }

    #[test]
    fn document_deduplicates_identical_streams() {
        let library = Library::new(&WorkflowConfig::default());
        let mut document = library.new_document();
        let source = ImageStream::from_dynamic(&checkerboard(6, 6), StreamFormat::jpeg()).unwrap();

        let first = Image::from_stream_in(&mut source.clone(), &mut document).unwrap();
        let second = Image::from_stream_in(&mut source.clone(), &mut document).unwrap();

        assert!(first.is_bound());
        assert!(first.shares_data_with(&second));
        assert_eq!(first.digest(), second.digest());
        assert_eq!(document.stored_image_count(), 1);
    }

    #[test]
    fn standalone_images_do_not_share_data() {
        let source = ImageStream::from_dynamic(&checkerboard(6, 6), StreamFormat::Bmp).unwrap();
        let first = Image::from_stream(&mut source.clone()).unwrap();
        let second = Image::from_stream(&mut source.clone()).unwrap();
        assert!(!first.shares_data_with(&second));
        assert_eq!(first.digest_hex(), second.digest_hex());
    }
}

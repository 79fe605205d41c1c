// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image stream — decode a source image and re-encode it into a seekable
// in-memory buffer, so the document layer can read it without an
// intermediate file on disk.

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use imagestream_core::StreamFormat;
use imagestream_core::error::ImageStreamError;
use tracing::{debug, info, instrument};

/// A seekable buffer holding one re-encoded image.
///
/// Constructors always leave the read position at zero. Reading the stream
/// (for example by handing it to [`crate::Image::from_stream`]) advances the
/// position, and [`ImageStream::rewind`] resets it.
#[derive(Debug, Clone)]
pub struct ImageStream {
    cursor: Cursor<Vec<u8>>,
    format: StreamFormat,
}

impl ImageStream {
    // -- Construction ---------------------------------------------------------

    /// Decode the image at `path` and re-encode it as `format`.
    ///
    /// An unreadable or corrupt file surfaces as `ImageStreamError::Decode`.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), format = format.mime_type()))]
    pub fn from_file(
        path: impl AsRef<Path>,
        format: StreamFormat,
    ) -> Result<Self, ImageStreamError> {
        let path = path.as_ref();
        let decode_err = |err: &dyn std::fmt::Display| {
            ImageStreamError::Decode(format!("failed to open {}: {}", path.display(), err))
        };

        // The container format comes from the file's leading bytes, never its
        // extension.
        let img = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_err(&err))?
            .decode()
            .map_err(|err| decode_err(&err))?;
        info!(width = img.width(), height = img.height(), "Source image decoded");
        Self::from_dynamic(&img, format)
    }

    /// Re-encode an already-decoded image as `format`.
    pub fn from_dynamic(
        image: &DynamicImage,
        format: StreamFormat,
    ) -> Result<Self, ImageStreamError> {
        let mut cursor = Cursor::new(Vec::new());
        match format {
            StreamFormat::Bmp => {
                // The BMP encoder only takes 8-bit gray/RGB(A) layouts.
                let flattened = if image.color().has_alpha() {
                    DynamicImage::ImageRgba8(image.to_rgba8())
                } else {
                    DynamicImage::ImageRgb8(image.to_rgb8())
                };
                flattened
                    .write_to(&mut cursor, ImageFormat::Bmp)
                    .map_err(|err| {
                        ImageStreamError::Encode(format!("BMP encoding failed: {}", err))
                    })?;
            }
            StreamFormat::Jpeg { quality } => {
                let rgb = image.to_rgb8();
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                rgb.write_with_encoder(encoder).map_err(|err| {
                    ImageStreamError::Encode(format!("JPEG encoding failed: {}", err))
                })?;
            }
        }

        cursor.rewind()?;
        debug!(bytes = cursor.get_ref().len(), "Image buffered into stream");

        Ok(Self { cursor, format })
    }

    // -- Accessors ------------------------------------------------------------

    /// The encoding held in the buffer.
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Current read position.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Total encoded length in bytes.
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Borrow the encoded bytes, independent of the read position.
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    /// Reset the read position to the start of the buffer.
    pub fn rewind(&mut self) {
        self.cursor.set_position(0);
    }

    /// Consume the stream and return the encoded bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Read for ImageStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for ImageStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The ingest-and-place workflow.
//
// A strictly linear sequence: guard check, library init, path resolution,
// bitmap -> stream -> PNG export, new document + page, JPEG -> stream ->
// image bound to the document, place on the page, save. Any failure stops the
// run; files already written stay on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use imagestream_core::error::{ImageStreamError, Result};
use imagestream_core::{
    FileProbe, ImageType, InputPaths, PageIndex, PlatformGuard, StreamFormat, TargetOs,
    WorkflowConfig,
};
use imagestream_document::{Image, ImageStream, Library, PdfInspector};
use tracing::{info, instrument, warn};

/// How a run ended when no error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both outputs were written.
    Completed {
        png_output: PathBuf,
        document_output: PathBuf,
    },
    /// The platform guard stopped the run before anything was written.
    MissingDependency { message: String },
}

/// Execute one run. Status lines go to `console`; diagnostics go to tracing.
#[instrument(skip_all, fields(os = os.display_name(), args = args.len()))]
pub fn run(
    config: &WorkflowConfig,
    args: &[PathBuf],
    os: TargetOs,
    probe: &dyn FileProbe,
    console: &mut dyn Write,
) -> Result<RunOutcome> {
    let guard = PlatformGuard::new(config.native_dependencies.clone());
    match guard.check(os, probe) {
        Ok(()) => {}
        Err(ImageStreamError::MissingNativeDependency { hint, .. }) => {
            writeln!(console, "{hint}")?;
            return Ok(RunOutcome::MissingDependency { message: hint });
        }
        Err(other) => return Err(other),
    }

    writeln!(console, "ImageFromStream Sample:")?;

    let library = Library::new(config);
    writeln!(console, "Initialized the library.")?;

    let inputs = InputPaths::resolve(args.iter().cloned(), config.default_inputs());
    writeln!(
        console,
        "using bitmap input {} and jpeg input {}. Writing to output {}",
        inputs.bitmap_input.display(),
        inputs.jpeg_input.display(),
        inputs.document_output.display()
    )?;

    export_bitmap(&inputs.bitmap_input, &config.png_output)?;
    place_jpeg(&library, config, &inputs.jpeg_input, &inputs.document_output)?;

    Ok(RunOutcome::Completed {
        png_output: config.png_output.clone(),
        document_output: inputs.document_output,
    })
}

/// Bitmap file -> BMP stream -> standalone image -> PNG file.
fn export_bitmap(bitmap_input: &Path, png_output: &Path) -> Result<()> {
    let mut stream = ImageStream::from_file(bitmap_input, StreamFormat::Bmp)?;
    let image = Image::from_stream(&mut stream)?;
    image.save(png_output, ImageType::Png)?;
    info!(
        path = %png_output.display(),
        width = image.width(),
        height = image.height(),
        "Bitmap exported as PNG"
    );
    Ok(())
}

/// New document with one page; JPEG file -> JPEG stream -> image bound to the
/// document -> page content -> saved PDF.
fn place_jpeg(
    library: &Library,
    config: &WorkflowConfig,
    jpeg_input: &Path,
    document_output: &Path,
) -> Result<()> {
    let mut document = library.new_document();
    document.create_page(PageIndex::BeforeFirst, config.page_rect()?)?;

    let mut stream = ImageStream::from_file(jpeg_input, StreamFormat::jpeg())?;
    let image = Image::from_stream_in(&mut stream, &mut document)?;

    let page = document.get_page(0)?;
    page.content_mut().add_element(image);
    page.update_content();

    document.save(document_output)?;

    // Read-back is diagnostic only.
    if let Err(err) = PdfInspector::open(document_output).and_then(|pdf| pdf.log_summary()) {
        warn!(error = %err, "Could not verify saved PDF");
    }
    Ok(())
}

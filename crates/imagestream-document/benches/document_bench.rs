// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the imagestream-document crate. Covers the
// stream-to-PDF path on a small synthetic image: buffer as JPEG, build a
// document image, place it on a letter page, and serialise.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use imagestream_core::{PageIndex, Rect, StreamFormat, WorkflowConfig};
use imagestream_document::{Image, ImageStream, Library};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark buffering a 200x150 image into a JPEG stream.
fn bench_stream_encode(c: &mut Criterion) {
    let source = synthetic(200, 150);

    c.bench_function("jpeg_stream_encode (200x150)", |b| {
        b.iter(|| {
            let stream = ImageStream::from_dynamic(black_box(&source), StreamFormat::jpeg());
            black_box(stream.map(ImageStream::into_inner).ok());
        });
    });
}

/// Benchmark constructing a document image and saving a one-page PDF.
fn bench_place_and_save(c: &mut Criterion) {
    let stream = ImageStream::from_dynamic(&synthetic(200, 150), StreamFormat::jpeg())
        .expect("encode synthetic image");
    let library = Library::new(&WorkflowConfig::default());

    c.bench_function("place_and_save (200x150)", |b| {
        b.iter(|| {
            let mut document = library.new_document();
            document
                .create_page(PageIndex::BeforeFirst, Rect::letter())
                .expect("create page");
            let image = Image::from_stream_in(&mut black_box(stream.clone()), &mut document)
                .expect("build image");
            let page = document.get_page(0).expect("page 0");
            page.content_mut().add_element(image);
            page.update_content();
            black_box(document.to_bytes().expect("serialise"));
        });
    });
}

fn synthetic(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

criterion_group!(benches, bench_stream_encode, bench_place_and_save);
criterion_main!(benches);

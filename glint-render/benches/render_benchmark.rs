//! Benchmarks for printing into a `QuadBatch`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glint_render::{GlyphInstance, QuadBatch};
use glint_text::{Alignment, Font, FontData, Glyph, GlyphRect, Quad, RenderOptions, Texture, TextureHandle};

/// Printable ASCII split over two atlas pages.
fn font(shadow: bool) -> Font {
    let mut builder = FontData::builder()
        .page(Texture::new(TextureHandle(1), 512, 512))
        .page(Texture::new(TextureHandle(2), 512, 512));
    for (i, c) in ('!'..='~').enumerate() {
        let rect = GlyphRect::new((i as u32 % 32) * 16, (i as u32 / 32) * 16, 7 + (i % 5) as u32, 14);
        builder = builder.glyph(c, Glyph::new(rect, 0, i % 2));
    }
    if shadow {
        builder = builder.drop_shadow(shadow_face());
    }
    let options = RenderOptions {
        drop_shadow_active: shadow,
        ..Default::default()
    };
    Font::with_options(builder.build(), options)
}

fn shadow_face() -> FontData {
    let mut builder = FontData::builder().page(Texture::new(TextureHandle(3), 512, 512));
    for c in '!'..='~' {
        builder = builder.glyph(c, Glyph::new(GlyphRect::new(0, 0, 12, 18), 0, 0));
    }
    builder.build()
}

fn make_text(words: usize) -> String {
    let vocabulary = ["glyph", "atlas", "kerning", "justify", "baseline", "a", "quad", "wrap"];
    (0..words)
        .map(|i| vocabulary[i % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_print_justified(c: &mut Criterion) {
    let font = font(false);
    let mut group = c.benchmark_group("print_justified");
    for &words in &[50, 500, 5_000] {
        let text = make_text(words);
        let mut processed = font.process_text(&text, 320.0, Alignment::Justify);
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| {
                let mut batch = QuadBatch::new();
                font.print_processed(black_box(&mut processed), [0.0, 0.0], &mut batch);
                black_box(batch.instance_count())
            });
        });
    }
    group.finish();
}

fn bench_print_with_shadow(c: &mut Criterion) {
    let font = font(true);
    let text = make_text(500);

    c.bench_function("print_with_shadow", |b| {
        b.iter(|| {
            let mut batch = QuadBatch::new();
            font.print(black_box(&text), 320.0, Alignment::Left, [10.0, 10.0], &mut batch);
            black_box(batch.instance_count())
        });
    });
}

fn bench_instance_from_quad(c: &mut Criterion) {
    let quad = Quad {
        min: [10.0, 20.0],
        max: [18.0, 34.0],
        uv_min: [0.0, 0.0],
        uv_max: [0.03, 0.05],
        color: [1.0, 1.0, 1.0, 1.0],
        texture: TextureHandle(1),
    };

    c.bench_function("GlyphInstance::from_quad", |b| {
        b.iter(|| black_box(GlyphInstance::from_quad(black_box(&quad), black_box([5.0, 5.0]))));
    });
}

criterion_group!(
    benches,
    bench_print_justified,
    bench_print_with_shadow,
    bench_instance_from_quad,
);
criterion_main!(benches);

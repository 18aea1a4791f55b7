//! Benchmarks for the differential renderer's per-cell diff loop.
//!
//! Run with: cargo bench -p vaxis-render --bench diff_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use vaxis_core::capability_override::Capabilities;
use vaxis_render::cell::{Cell, Character};
use vaxis_render::renderer::Renderer;
use vaxis_render::screen::Screen;
use vaxis_render::shadow::Shadow;
use vaxis_style::{Color, Style};

fn filled_screen(w: u16, h: u16, ch: char, style: Style) -> Screen {
    let mut screen = Screen::new(w, h);
    let cell = Cell::from_char(ch).with_style(style);
    for row in 0..h {
        for col in 0..w {
            screen.write_cell(col, row, cell.clone());
        }
    }
    screen
}

fn bench_render_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/render_unchanged");

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        let cells = w as u64 * h as u64;
        group.throughput(Throughput::Elements(cells));
        group.bench_with_input(BenchmarkId::new("noop_frame", format!("{w}x{h}")), &(), |b, _| {
            let screen = filled_screen(w, h, 'x', Style::new());
            let mut shadow = Shadow::new(w, h);
            let mut renderer = Renderer::new(Capabilities::none());
            let mut out = Vec::new();
            renderer.render(&screen, &mut shadow, &mut out, false).unwrap();
            out.clear();
            b.iter(|| {
                renderer.render(black_box(&screen), &mut shadow, &mut out, false).unwrap();
                out.clear();
            })
        });
    }

    group.finish();
}

fn bench_render_full_repaint(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/render_full_repaint");

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        let cells = w as u64 * h as u64;
        group.throughput(Throughput::Elements(cells));
        group.bench_with_input(BenchmarkId::new("refresh", format!("{w}x{h}")), &(), |b, _| {
            let screen = filled_screen(w, h, 'x', Style::new().fg(Color::indexed(2)));
            let mut shadow = Shadow::new(w, h);
            let mut renderer = Renderer::new(Capabilities::none());
            let mut out = Vec::new();
            b.iter(|| {
                renderer.render(black_box(&screen), &mut shadow, &mut out, true).unwrap();
                out.clear();
            })
        });
    }

    group.finish();
}

fn bench_render_sparse_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/render_sparse_change");
    let (w, h) = (120u16, 40u16);

    group.bench_function("single_cell_dirty", |b| {
        let mut screen = filled_screen(w, h, 'x', Style::new());
        let mut shadow = Shadow::new(w, h);
        let mut renderer = Renderer::new(Capabilities::none());
        let mut out = Vec::new();
        renderer.render(&screen, &mut shadow, &mut out, false).unwrap();
        out.clear();

        let mut toggle = false;
        b.iter(|| {
            let ch = if toggle { 'x' } else { 'y' };
            toggle = !toggle;
            screen.write_cell(w / 2, h / 2, Cell::from_char(ch));
            renderer.render(black_box(&screen), &mut shadow, &mut out, false).unwrap();
            out.clear();
        })
    });

    group.finish();
}

fn bench_character_clone(c: &mut Criterion) {
    c.bench_function("cell/character_clone", |b| {
        let ch = Character::new("x");
        b.iter(|| black_box(ch.clone()))
    });
}

criterion_group!(
    benches,
    bench_render_unchanged,
    bench_render_full_repaint,
    bench_render_sparse_change,
    bench_character_clone,
);
criterion_main!(benches);

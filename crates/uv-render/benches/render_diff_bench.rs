use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uv_config::RenderFlags;
use uv_model::{Buffer, Cell, ColorProfile, Link, Style};
use uv_render::Renderer;
use uv_term::TerminalCapabilities;

struct NullSink;

impl uv_term::Sink for NullSink {
    fn write_all(&mut self, _bytes: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

fn flags() -> RenderFlags {
    RenderFlags {
        hard_tabs: true,
        backspace: true,
        map_newline: false,
        relative_cursor: false,
        alt_screen: true,
    }
}

fn filled_buffer(width: u16, height: u16, seed: &str) -> Buffer {
    let mut buffer = Buffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let ch = &seed[(x as usize + y as usize) % seed.len()..][..1];
            buffer.set_cell(x, y, Cell::new(ch, 1, Style::default(), Link::default()));
        }
    }
    buffer
}

fn render_full_frame(c: &mut Criterion) {
    let (width, height) = (120u16, 40u16);
    c.bench_function("render_full_frame_first_paint", |b| {
        b.iter(|| {
            let mut renderer = Renderer::new(NullSink, TerminalCapabilities::all(), flags(), ColorProfile::TrueColor);
            let mut target = filled_buffer(width, height, "abcdefghij");
            renderer.render(black_box(&mut target)).unwrap();
            renderer.flush().unwrap();
        })
    });
}

fn render_small_diff(c: &mut Criterion) {
    let (width, height) = (120u16, 40u16);
    c.bench_function("render_small_diff_one_row_changed", |b| {
        b.iter(|| {
            let mut renderer = Renderer::new(NullSink, TerminalCapabilities::all(), flags(), ColorProfile::TrueColor);
            let mut target = filled_buffer(width, height, "abcdefghij");
            renderer.render(&mut target).unwrap();
            renderer.flush().unwrap();

            target.set_cell(0, height / 2, Cell::new("x", 1, Style::default(), Link::default()));
            renderer.render(black_box(&mut target)).unwrap();
            renderer.flush().unwrap();
        })
    });
}

criterion_group!(benches, render_full_frame, render_small_diff);
criterion_main!(benches);

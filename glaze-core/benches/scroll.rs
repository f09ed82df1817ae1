//! Scroll benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glaze_core::{BlockPainter, CellSize, RedrawCommand, RedrawInterpreter, Rgb};

fn filled_interpreter(cols: u32, rows: u32) -> RedrawInterpreter<BlockPainter> {
    let mut interp = RedrawInterpreter::new(
        cols,
        rows,
        BlockPainter::new(CellSize::new(9, 18)),
        Rgb::WHITE,
        Rgb::BLACK,
    );
    let line = "Line of text that fills a good part of the row".repeat(5);
    let mut batch = Vec::new();
    for row in 0..rows {
        batch.push(RedrawCommand::CursorGoto { row, col: 0 });
        batch.push(RedrawCommand::Put(line.as_bytes()[..cols as usize].to_vec()));
    }
    interp.apply(&batch);
    interp
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    let mut interp = filled_interpreter(80, 24);
    group.throughput(Throughput::Bytes(
        interp.renderer().primary().pixels().len() as u64 * 4,
    ));
    group.bench_function("full_grid_80x24", |b| {
        b.iter(|| black_box(interp.apply(&[RedrawCommand::Scroll(black_box(1))])))
    });

    let mut interp = filled_interpreter(200, 60);
    group.throughput(Throughput::Bytes(
        interp.renderer().primary().pixels().len() as u64 * 4,
    ));
    group.bench_function("full_grid_200x60", |b| {
        b.iter(|| black_box(interp.apply(&[RedrawCommand::Scroll(black_box(1))])))
    });

    let mut interp = filled_interpreter(200, 60);
    interp.apply(&[RedrawCommand::SetScrollRegion {
        top: 1,
        bottom: 58,
        left: 0,
        right: 199,
    }]);
    group.bench_function("region_down_200x60", |b| {
        b.iter(|| black_box(interp.apply(&[RedrawCommand::Scroll(black_box(-3))])))
    });

    group.finish();
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");

    // Redrawing every row is what a scroll replaces
    let mut interp = filled_interpreter(80, 24);
    let line = "x".repeat(80);
    let batch: Vec<_> = (0..24)
        .flat_map(|row| {
            [
                RedrawCommand::CursorGoto { row, col: 0 },
                RedrawCommand::Put(line.as_bytes().to_vec()),
            ]
        })
        .collect();
    group.bench_function("redraw_all_rows_80x24", |b| {
        b.iter(|| black_box(interp.apply(black_box(&batch))))
    });

    group.finish();
}

criterion_group!(benches, bench_scroll, bench_put);
criterion_main!(benches);

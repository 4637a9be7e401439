use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pix::{rgb::SRgba8, Raster};
use tidefill::{flood_fill, FillConfig, Order, Picker, Point};

/// Gray raster crossed by a black maze of walls
fn maze(size: u32) -> Raster<SRgba8> {
    let mut raster = Raster::with_color(size, size, SRgba8::new(120, 120, 120, 255));
    let black = SRgba8::new(0, 0, 0, 255);
    for y in (8..size as i32).step_by(16) {
        for x in 0..size as i32 - 8 {
            let x = if (y / 16) % 2 == 0 { x } else { x + 8 };
            *raster.pixel_mut(x, y) = black;
        }
    }
    raster
}

fn fill_order(crit: &mut Criterion, name: &str, order: Order) {
    let raster = maze(512);
    let config = FillConfig::default()
        .with_seed(Point::new(1, 1))
        .with_order(order)
        .with_frame_freq(0);
    crit.bench_function(name, |b| {
        b.iter(|| flood_fill(black_box(&raster), &config).unwrap())
    });
}

fn fill_bfs(crit: &mut Criterion) {
    fill_order(crit, "fill_bfs", Order::BreadthFirst);
}

fn fill_dfs(crit: &mut Criterion) {
    fill_order(crit, "fill_dfs", Order::DepthFirst);
}

fn fill_border(crit: &mut Criterion) {
    let raster = maze(256);
    let config = FillConfig::default()
        .with_seed(Point::new(1, 1))
        .with_frame_freq(0)
        .with_picker(Picker::border(
            SRgba8::new(0, 200, 0, 255),
            SRgba8::new(0, 0, 0, 255),
            Picker::BORDER_WIDTH,
        ));
    crit.bench_function("fill_border", |b| {
        b.iter(|| flood_fill(black_box(&raster), &config).unwrap())
    });
}

fn fill_frames(crit: &mut Criterion) {
    let raster = maze(256);
    let config = FillConfig::default().with_frame_freq(1000);
    crit.bench_function("fill_frames", |b| {
        b.iter(|| flood_fill(black_box(&raster), &config).unwrap())
    });
}

criterion_group!(benches, fill_bfs, fill_dfs, fill_border, fill_frames);
criterion_main!(benches);

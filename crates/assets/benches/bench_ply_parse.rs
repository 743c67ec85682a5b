use std::fmt::Write;
use std::hint::black_box;
use std::time::Instant;

use roomview_assets::parse_ply;

/// A flat grid of `side * side` vertices with every attribute and two triangles per cell.
fn grid_ply(side: usize) -> String {
    let vertices = side * side;
    let faces = (side - 1) * (side - 1) * 2;
    let mut text = String::new();
    text.push_str("ply\nformat ascii 1.0\n");
    let _ = writeln!(text, "element vertex {vertices}");
    for p in ["x", "y", "z", "nx", "ny", "nz"] {
        let _ = writeln!(text, "property float {p}");
    }
    for c in ["red", "green", "blue"] {
        let _ = writeln!(text, "property uchar {c}");
    }
    for p in ["u", "v"] {
        let _ = writeln!(text, "property float {p}");
    }
    let _ = writeln!(text, "element face {faces}");
    text.push_str("property list uchar int vertex_indices\nend_header\n");

    for i in 0..vertices {
        let x = (i % side) as f32;
        let z = (i / side) as f32;
        let u = x / side as f32;
        let v = z / side as f32;
        let _ = writeln!(text, "{x} 0 {z} 0 1 0 200 180 160 {u} {v}");
    }
    for row in 0..side - 1 {
        for col in 0..side - 1 {
            let a = row * side + col;
            let b = a + 1;
            let c = a + side;
            let d = c + 1;
            let _ = writeln!(text, "3 {a} {b} {d}");
            let _ = writeln!(text, "3 {d} {c} {a}");
        }
    }
    text
}

fn bench_parse(side: usize, iterations: usize) {
    let text = grid_ply(side);
    let start = Instant::now();
    for _ in 0..iterations {
        let load = parse_ply(black_box(&text));
        assert!(load.is_complete());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  parse ({} vertices, {} KiB, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        side * side,
        text.len() / 1024
    );
}

fn main() {
    println!("=== PLY parse benchmarks ===\n");
    bench_parse(32, 200);
    bench_parse(128, 50);
    bench_parse(512, 5);
}

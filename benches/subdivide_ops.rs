//! Benchmarks for facade subdivision.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use sliver::prelude::*;

fn create_grid_mesh(n: usize, size: f64) -> FaceMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n);

    // Create grid vertices
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 * size, 0.0, j as f64 * size));
        }
    }

    // Create quads
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push(Face::Quad([v00, v10, v11, v01]));
        }
    }

    FaceMesh::from_parts(vertices, faces).unwrap()
}

fn bench_subdivide_faces(c: &mut Criterion) {
    let mesh = create_grid_mesh(100, 2.0);

    c.bench_function("subdivide_faces_grid_100x100_exact", |b| {
        b.iter(|| subdivide_faces(&mesh, 1.0, 0.0).unwrap());
    });

    c.bench_function("subdivide_faces_grid_100x100_tolerant", |b| {
        b.iter(|| subdivide_faces(&mesh, 1.0, 1e-6).unwrap());
    });
}

fn bench_weld(c: &mut Criterion) {
    let points: Vec<Point3<f64>> = (0..20_000)
        .map(|i| Point3::new((i % 200) as f64 * 0.5, 0.0, (i / 200) as f64 * 0.5))
        .collect();

    c.bench_function("weld_20k_points_twice", |b| {
        b.iter(|| {
            let mut welder = VertexWelder::new(0.0);
            for p in points.iter().chain(points.iter()) {
                welder.weld(*p);
            }
            welder.len()
        });
    });
}

fn bench_batch_run(c: &mut Criterion) {
    c.bench_function("batch_run_500_objects", |b| {
        b.iter_batched(
            || {
                let mut doc = MemoryDocument::new();
                for i in 0..250 {
                    let y = i as f64;
                    doc.add_line("Facades", Point3::new(0.0, y, 0.0), Point3::new(120.0, y, 0.0))
                        .unwrap();
                    doc.add_mesh("Facades", create_grid_mesh(4, 2.0)).unwrap();
                }
                doc
            },
            |mut doc| divide_all_facades(&mut doc, "Facades", &DivideOptions::default()),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_subdivide_faces, bench_weld, bench_batch_run);
criterion_main!(benches);

//! Benchmarks for subdivision.

use criterion::{criterion_group, criterion_main, Criterion};
use crease::prelude::*;
use nalgebra::Point3;

fn grid_vertices(n: usize) -> Vec<Point3<f64>> {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    vertices
}

fn create_quad_grid(n: usize) -> PolyMesh {
    let mut faces = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11, v01]);
        }
    }
    PolyMesh::from_quads(&grid_vertices(n), &faces)
}

fn create_triangle_grid(n: usize) -> PolyMesh {
    let mut faces = Vec::with_capacity(n * n * 2);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }
    PolyMesh::from_triangles(&grid_vertices(n), &faces)
}

fn bench_topology(c: &mut Criterion) {
    let mesh = create_triangle_grid(50);

    c.bench_function("build_topology_50x50", |b| {
        b.iter(|| {
            let topo: Topology = Topology::build(&mesh).unwrap();
            topo
        });
    });
}

fn bench_subdivision(c: &mut Criterion) {
    let quads = create_quad_grid(30);
    let triangles = create_triangle_grid(30);

    c.bench_function("catmull_clark_30x30_level2", |b| {
        let options = SubdivideOptions::catmull_clark(2);
        b.iter(|| refine(&quads, &options).unwrap());
    });

    c.bench_function("loop_30x30_level2", |b| {
        let options = SubdivideOptions::loop_subdivision(2);
        b.iter(|| refine(&triangles, &options).unwrap());
    });
}

criterion_group!(benches, bench_topology, bench_subdivision);
criterion_main!(benches);

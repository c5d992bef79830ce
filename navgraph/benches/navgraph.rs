use criterion::{black_box, criterion_group, criterion_main, Criterion};
use navgraph::{FloorPlan, GraphConfig, Location, NavigableGraph};

/// A square floor of `rooms` x `rooms` rooms of 100 units, every wall with a door in the middle
fn create_floor(rooms: usize) -> FloorPlan {
    let size = rooms as f32 * 100.0;
    let mut plan = FloorPlan::new(size, size);

    for i in 1..rooms {
        let at = i as f32 * 100.0;
        for j in 0..rooms {
            let from = j as f32 * 100.0;
            // vertical wall segments with a door between 40 and 60
            plan.paths.push(format!(
                "M {at},{from} L {at},{} M {at},{} L {at},{}",
                from + 40.0,
                from + 60.0,
                from + 100.0
            ));
            plan.paths.push(format!(
                "M {from},{at} L {},{at} M {},{at} L {},{at}",
                from + 40.0,
                from + 60.0,
                from + 100.0
            ));
        }
    }

    plan
}

fn load_floor(rooms: usize) -> (NavigableGraph, Location, Location) {
    let graph = create_floor(rooms)
        .build(&GraphConfig::default())
        .unwrap();
    let far = rooms as f32 * 100.0 - 5.0;

    (graph, Location::new(5.0, 5.0), Location::new(far, far))
}

fn bench_build(c: &mut Criterion, rooms: usize) {
    let plan = create_floor(rooms);
    let config = GraphConfig::default();

    c.bench_function(&format!("build_{}x{}", rooms, rooms), |b| {
        b.iter(|| black_box(&plan).build(&config).unwrap())
    });
}

fn bench_query(c: &mut Criterion, rooms: usize) {
    let (graph, start, goal) = load_floor(rooms);

    c.bench_function(&format!("query_{}x{}", rooms, rooms), |b| {
        b.iter(|| {
            let path = graph.find_path(black_box(start), black_box(goal));
            assert!(!path.is_empty());
        })
    });
}

pub fn floor_small(c: &mut Criterion) {
    bench_build(c, 4);
    bench_query(c, 4);
}

pub fn floor_medium(c: &mut Criterion) {
    bench_build(c, 8);
    bench_query(c, 8);
}

pub fn floor_large(c: &mut Criterion) {
    bench_build(c, 16);
    bench_query(c, 16);
}

criterion_group!(benches, floor_small, floor_medium, floor_large);
criterion_main!(benches);

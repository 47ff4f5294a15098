use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use skirmish_core::{Arena, FrameBuffer, Point3D, Side, SideLoadout, SimConfig, Simulation, WorldBounds};

fn seeded_config(fleet: u32) -> SimConfig {
    let loadout = |side: &str| SideLoadout {
        cargo_ships: fleet,
        space_ports: fleet,
        fighter_ships: fleet,
        ..SideLoadout::new(side)
    };
    SimConfig {
        seed: Some(7),
        sides: vec![loadout("CYAN"), loadout("MAGENTA")],
        ..SimConfig::default()
    }
}

fn bench_sweep(c: &mut Criterion) {
    // Battles thin out as they run, so each batch starts from a fresh seed-7 fleet
    let config = seeded_config(3);

    c.bench_function("sweep_100_ticks", |b| {
        b.iter_batched(
            || Simulation::new(&config).expect("valid bench config"),
            |mut sim| {
                let mut frames = FrameBuffer::new();
                black_box(sim.run_for(100, &mut frames))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_sweep_crowded(c: &mut Criterion) {
    let config = seeded_config(20);

    c.bench_function("sweep_crowded", |b| {
        b.iter_batched(
            || Simulation::new(&config).expect("valid bench config"),
            |mut sim| {
                let mut frames = FrameBuffer::new();
                black_box(sim.run_for(10, &mut frames))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_radar_sweep(c: &mut Criterion) {
    let mut arena = Arena::with_seed(WorldBounds::default(), 11);
    arena.seed_side(&SideLoadout::new("CYAN"));
    arena.seed_side(&SideLoadout::new("MAGENTA"));

    c.bench_function("radar_sweep", |b| {
        b.iter(|| black_box(arena.radar_sweep(black_box(Point3D::splat(300.0)), Side::Cyan)))
    });
}

criterion_group!(benches, bench_sweep, bench_sweep_crowded, bench_radar_sweep);
criterion_main!(benches);

//! Cost of the CPU decal compositor as the active decal count grows.

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3, Vec4};
use radius_decals::compositor::{
    radius_cursor_decal_color, AddressMode, FilterMode, SamplerState,
    TextureArray,
};
use radius_decals::decal::{RadiusCursorDecal, RadiusCursorDecalConstants};

fn textures() -> TextureArray {
    let texels: Vec<Vec4> = (0..64 * 64)
        .map(|i| Vec4::new(1.0, 0.5, 0.25, (i % 64) as f32 / 64.0))
        .collect();
    TextureArray::new(
        64,
        64,
        vec![texels.clone(), texels],
        SamplerState::new(AddressMode::ClampToBorder, FilterMode::Linear),
    )
    .unwrap()
}

fn decals(count: usize) -> Vec<RadiusCursorDecal> {
    (0..count)
        .map(|i| {
            let center = Vec2::new((i % 8) as f32 * 10.0, (i / 8) as f32 * 10.0);
            RadiusCursorDecal::from_center_radius(center, 6.0, (i % 2) as u32, 0.8)
        })
        .collect()
}

/// Cost per shaded point grows linearly with the active decal count.
fn per_point_benchmark(c: &mut Criterion) {
    let textures = textures();
    let mut group = c.benchmark_group("decal_color_per_point");

    for count in [1usize, 8, 20, 64] {
        let decals = decals(count);
        let constants = RadiusCursorDecalConstants::new(count as u32);
        let _ = group.bench_function(format!("{count}_decals"), |b| {
            b.iter(|| {
                black_box(radius_cursor_decal_color(
                    black_box(Vec3::new(12.0, 7.0, 0.0)),
                    &constants,
                    &decals,
                    &textures,
                ))
            });
        });
    }

    group.finish();
}

fn tile_benchmark(c: &mut Criterion) {
    let textures = textures();
    let decals = decals(20);
    let constants = RadiusCursorDecalConstants::new(20);

    let _ = c.bench_function("decal_color_64x64_tile", |b| {
        b.iter(|| {
            let mut sum = Vec3::ZERO;
            for y in 0..64 {
                for x in 0..64 {
                    let p = Vec3::new(x as f32 * 0.5, y as f32 * 0.5, 0.0);
                    sum += radius_cursor_decal_color(p, &constants, &decals, &textures);
                }
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, per_point_benchmark, tile_benchmark);
criterion_main!(benches);

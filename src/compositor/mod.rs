//! CPU reference implementation of the radius cursor decal routine.
//!
//! [`radius_cursor_decal_color`] computes exactly what the WGSL function of
//! the same name computes for one fragment. It performs no validation: the
//! inputs are assumed to have passed through
//! [`RadiusCursorDecalSet`](crate::decal::RadiusCursorDecalSet).

mod sampling;

use glam::{Vec2, Vec3};
pub use sampling::{
    AddressMode, BorderColor, DecalTextureSource, FilterMode, SamplerState,
    TextureArray,
};

use crate::decal::{RadiusCursorDecal, RadiusCursorDecalConstants};

/// Local UV of `world_position` within `decal`'s footprint, with V flipped
/// into texture space.
///
/// The corner maps to `(0, 1)` and the opposite corner to `(1, 0)`. Only the
/// X and Y of `world_position` are used.
#[must_use]
pub fn decal_uv(decal: &RadiusCursorDecal, world_position: Vec3) -> Vec2 {
    let local = (world_position.truncate() - decal.corner()) / decal.diameter;
    Vec2::new(local.x, 1.0 - local.y)
}

/// Additive color contribution of all active decals at `world_position`.
///
/// Visits the first `constants.decal_count` records of `decals` in order and
/// sums `rgb * a * opacity` of each sample. Iteration never goes past the end
/// of `decals`.
#[must_use]
pub fn radius_cursor_decal_color<S>(
    world_position: Vec3,
    constants: &RadiusCursorDecalConstants,
    decals: &[RadiusCursorDecal],
    textures: &S,
) -> Vec3
where
    S: DecalTextureSource + ?Sized,
{
    decals
        .iter()
        .take(constants.decal_count as usize)
        .fold(Vec3::ZERO, |result, decal| {
            let color =
                textures.sample(decal_uv(decal, world_position), decal.texture_index);
            result + color.truncate() * color.w * decal.opacity
        })
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < EPSILON, "{a} != {b}");
    }

    fn nearest() -> SamplerState {
        SamplerState::new(AddressMode::ClampToEdge, FilterMode::Nearest)
    }

    /// 4x4 layer whose texel at column x, row y is `(x, y, 0, 1)`.
    fn coordinate_texture() -> TextureArray {
        let texels = (0..4)
            .flat_map(|y| (0..4).map(move |x| Vec4::new(x as f32, y as f32, 0.0, 1.0)))
            .collect();
        TextureArray::new(4, 4, vec![texels], nearest()).unwrap()
    }

    fn unit_decal(opacity: f32) -> RadiusCursorDecal {
        RadiusCursorDecal::new(Vec2::ZERO, 1.0, 0, opacity)
    }

    #[test]
    fn no_active_decals_contribute_nothing() {
        let textures =
            TextureArray::solid(&[Vec4::ONE], nearest()).unwrap();
        let decals = [unit_decal(1.0); 3];
        let constants = RadiusCursorDecalConstants::new(0);
        for p in [Vec3::ZERO, Vec3::new(0.5, 0.5, 7.0), Vec3::splat(-40.0)] {
            assert_eq!(
                radius_cursor_decal_color(p, &constants, &decals, &textures),
                Vec3::ZERO
            );
        }
    }

    #[test]
    fn single_decal_is_premultiplied_sample() {
        let sample = Vec4::new(0.8, 0.4, 0.2, 0.5);
        let textures = TextureArray::solid(&[sample], nearest()).unwrap();
        let color = radius_cursor_decal_color(
            Vec3::new(0.3, 0.6, 0.0),
            &RadiusCursorDecalConstants::new(1),
            &[unit_decal(1.0)],
            &textures,
        );
        assert_close(color, Vec3::new(0.4, 0.2, 0.1));
    }

    #[test]
    fn opacity_scales_linearly() {
        let textures =
            TextureArray::solid(&[Vec4::new(0.6, 0.3, 0.9, 1.0)], nearest()).unwrap();
        let constants = RadiusCursorDecalConstants::new(1);
        let p = Vec3::new(0.5, 0.5, 0.0);
        let quarter =
            radius_cursor_decal_color(p, &constants, &[unit_decal(0.25)], &textures);
        let half = radius_cursor_decal_color(p, &constants, &[unit_decal(0.5)], &textures);
        assert_close(half, quarter * 2.0);
    }

    #[test]
    fn contributions_add_regardless_of_order() {
        let textures = TextureArray::solid(
            &[
                Vec4::new(0.1, 0.2, 0.3, 1.0),
                Vec4::new(0.5, 0.0, 0.25, 0.5),
                Vec4::new(0.0, 0.7, 0.1, 0.8),
            ],
            nearest(),
        )
        .unwrap();
        let a = RadiusCursorDecal::new(Vec2::new(-1.0, -1.0), 4.0, 0, 0.9);
        let b = RadiusCursorDecal::new(Vec2::new(0.0, 0.0), 2.0, 1, 0.4);
        let c = RadiusCursorDecal::new(Vec2::new(0.5, -2.0), 3.0, 2, 1.0);
        let constants = RadiusCursorDecalConstants::new(3);
        let p = Vec3::new(1.0, 0.5, 0.0);

        let forward = radius_cursor_decal_color(p, &constants, &[a, b, c], &textures);
        let reversed = radius_cursor_decal_color(p, &constants, &[c, b, a], &textures);
        let shuffled = radius_cursor_decal_color(p, &constants, &[b, c, a], &textures);
        assert_close(forward, reversed);
        assert_close(forward, shuffled);

        let expected = Vec3::new(0.1, 0.2, 0.3) * 0.9
            + Vec3::new(0.5, 0.0, 0.25) * 0.5 * 0.4
            + Vec3::new(0.0, 0.7, 0.1) * 0.8;
        assert_close(forward, expected);
    }

    #[test]
    fn v_is_flipped_into_texture_space() {
        let p = Vec3::new(0.5, 0.25, 0.0);
        assert_eq!(decal_uv(&unit_decal(1.0), p), Vec2::new(0.5, 0.75));

        // (0.5, 0.75) on a 4x4 texture is column 2, row 3.
        let color = radius_cursor_decal_color(
            p,
            &RadiusCursorDecalConstants::new(1),
            &[unit_decal(1.0)],
            &coordinate_texture(),
        );
        assert_eq!(color, Vec3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn footprint_corners_map_to_uv_extremes() {
        let decal = RadiusCursorDecal::new(Vec2::new(3.0, -2.0), 8.0, 0, 1.0);
        assert_eq!(decal_uv(&decal, Vec3::new(3.0, -2.0, 0.0)), Vec2::new(0.0, 1.0));
        assert_eq!(decal_uv(&decal, Vec3::new(11.0, 6.0, 0.0)), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn height_is_ignored() {
        let decal = RadiusCursorDecal::new(Vec2::new(3.0, -2.0), 8.0, 0, 1.0);
        assert_eq!(
            decal_uv(&decal, Vec3::new(5.0, 1.0, -100.0)),
            decal_uv(&decal, Vec3::new(5.0, 1.0, 250.0))
        );
    }

    #[test]
    fn entries_past_the_count_are_ignored() {
        let textures = TextureArray::solid(&[Vec4::ONE], nearest()).unwrap();
        let decals = [unit_decal(0.5), unit_decal(1.0)];
        let color = radius_cursor_decal_color(
            Vec3::new(0.5, 0.5, 0.0),
            &RadiusCursorDecalConstants::new(1),
            &decals,
            &textures,
        );
        assert_close(color, Vec3::splat(0.5));
    }

    #[test]
    fn clamp_to_border_hides_decal_outside_footprint() {
        let textures = TextureArray::solid(
            &[Vec4::ONE],
            SamplerState::new(AddressMode::ClampToBorder, FilterMode::Nearest),
        )
        .unwrap();
        let constants = RadiusCursorDecalConstants::new(1);
        let decals = [unit_decal(1.0)];
        let outside =
            radius_cursor_decal_color(Vec3::new(1.5, 0.5, 0.0), &constants, &decals, &textures);
        let inside =
            radius_cursor_decal_color(Vec3::new(0.5, 0.5, 0.0), &constants, &decals, &textures);
        assert_eq!(outside, Vec3::ZERO);
        assert_eq!(inside, Vec3::ONE);
    }

    #[test]
    fn clamp_to_edge_bleeds_outside_footprint() {
        let textures = TextureArray::solid(&[Vec4::ONE], nearest()).unwrap();
        let color = radius_cursor_decal_color(
            Vec3::new(5.0, 5.0, 0.0),
            &RadiusCursorDecalConstants::new(1),
            &[unit_decal(1.0)],
            &textures,
        );
        assert_eq!(color, Vec3::ONE);
    }

    #[test]
    fn tiny_footprint_stays_finite_far_from_corner() {
        let decal = RadiusCursorDecal::new(Vec2::ZERO, 1e-20, 0, 1.0);
        assert!(crate::decal::validate_decal(0, &decal, 1).is_ok());
        let textures = TextureArray::solid(
            &[Vec4::ONE],
            SamplerState::new(AddressMode::ClampToBorder, FilterMode::Linear),
        )
        .unwrap();
        let color = radius_cursor_decal_color(
            Vec3::new(1.0, 0.5, 0.0),
            &RadiusCursorDecalConstants::new(1),
            &[decal],
            &textures,
        );
        assert_eq!(color, Vec3::ZERO);
    }
}

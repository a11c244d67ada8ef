use glam::Vec2;

/// One decal as laid out in the read-only storage buffer.
///
/// 32 bytes per element: corner (8), diameter (4), texture layer (4),
/// padding (12), opacity (4). The padding puts `opacity` in the last word of
/// the 16-byte-aligned record so the array stride matches std430 / WGSL
/// storage rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RadiusCursorDecal {
    /// World-space XY of the decal's UV origin.
    pub bottom_left_corner: [f32; 2],
    /// Side length of the square footprint in world units.
    pub diameter: f32,
    /// Layer in the decal texture array.
    pub texture_index: u32,
    /// Padding for GPU alignment.
    pub _padding: [f32; 3],
    /// Multiplier applied to the sampled color, in `[0, 1]`.
    pub opacity: f32,
}

impl RadiusCursorDecal {
    /// Decal whose footprint starts at `bottom_left_corner`.
    #[must_use]
    pub fn new(
        bottom_left_corner: Vec2,
        diameter: f32,
        texture_index: u32,
        opacity: f32,
    ) -> Self {
        Self {
            bottom_left_corner: bottom_left_corner.to_array(),
            diameter,
            texture_index,
            _padding: [0.0; 3],
            opacity,
        }
    }

    /// Decal covering the square circumscribing a circle of `radius` around
    /// `center`. This is how game logic places range indicators.
    #[must_use]
    pub fn from_center_radius(
        center: Vec2,
        radius: f32,
        texture_index: u32,
        opacity: f32,
    ) -> Self {
        Self::new(center - Vec2::splat(radius), radius * 2.0, texture_index, opacity)
    }

    /// Bottom-left corner as a vector.
    #[must_use]
    pub fn corner(&self) -> Vec2 {
        Vec2::from_array(self.bottom_left_corner)
    }

    /// Center of the footprint.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.corner() + Vec2::splat(self.diameter * 0.5)
    }
}

/// Uniform block carrying the number of valid entries in the decal buffer.
///
/// The leading padding keeps the block at the 16-byte minimum uniform size
/// with `decal_count` in the last word, matching the shader declaration.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct RadiusCursorDecalConstants {
    /// Padding for GPU alignment.
    pub _padding: [u32; 3],
    /// Number of leading records in the decal buffer that are active.
    pub decal_count: u32,
}

impl RadiusCursorDecalConstants {
    /// Constants announcing `decal_count` active decals.
    #[must_use]
    pub fn new(decal_count: u32) -> Self {
        Self {
            _padding: [0; 3],
            decal_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    #[test]
    fn decal_layout_matches_storage_buffer() {
        assert_eq!(size_of::<RadiusCursorDecal>(), 32);
        assert_eq!(offset_of!(RadiusCursorDecal, bottom_left_corner), 0);
        assert_eq!(offset_of!(RadiusCursorDecal, diameter), 8);
        assert_eq!(offset_of!(RadiusCursorDecal, texture_index), 12);
        assert_eq!(offset_of!(RadiusCursorDecal, _padding), 16);
        assert_eq!(offset_of!(RadiusCursorDecal, opacity), 28);
    }

    #[test]
    fn constants_fill_one_uniform_slot() {
        assert_eq!(size_of::<RadiusCursorDecalConstants>(), 16);
        assert_eq!(offset_of!(RadiusCursorDecalConstants, decal_count), 12);
    }

    #[test]
    fn decal_bytes_are_little_endian_words_in_field_order() {
        let decal = RadiusCursorDecal::new(Vec2::new(1.0, 2.0), 3.0, 4, 0.5);
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&decal));
        assert_eq!(words.len(), 8);
        assert_eq!(f32::from_bits(words[0]), 1.0);
        assert_eq!(f32::from_bits(words[1]), 2.0);
        assert_eq!(f32::from_bits(words[2]), 3.0);
        assert_eq!(words[3], 4);
        assert_eq!(&words[4..7], &[0, 0, 0]);
        assert_eq!(f32::from_bits(words[7]), 0.5);
    }

    #[test]
    fn center_radius_places_square_footprint() {
        let decal =
            RadiusCursorDecal::from_center_radius(Vec2::new(10.0, 20.0), 5.0, 2, 1.0);
        assert_eq!(decal.bottom_left_corner, [5.0, 15.0]);
        assert_eq!(decal.diameter, 10.0);
        assert_eq!(decal.center(), Vec2::new(10.0, 20.0));
    }
}

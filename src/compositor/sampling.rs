//! CPU texture array and sampler mirroring GPU addressing and filtering.
//!
//! Texel row 0 is the top of the image, so `v = 0` samples the first row,
//! which is the same convention wgpu uses for uploaded texture data.

use glam::{Vec2, Vec4};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DecalError;

/// How coordinates outside `[0, 1]` are resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    /// Repeat the edge texel.
    #[default]
    ClampToEdge,
    /// Tile the image.
    Repeat,
    /// Tile the image, flipping every other repetition.
    MirrorRepeat,
    /// Return the border color outside the image.
    ClampToBorder,
}

/// Texel filtering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Closest texel.
    Nearest,
    /// Bilinear blend of the four closest texels.
    #[default]
    Linear,
}

/// Border color used by [`AddressMode::ClampToBorder`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BorderColor {
    /// `(0, 0, 0, 0)`
    #[default]
    TransparentBlack,
    /// `(0, 0, 0, 1)`
    OpaqueBlack,
    /// `(1, 1, 1, 1)`
    OpaqueWhite,
}

impl BorderColor {
    /// RGBA value of the border.
    #[must_use]
    pub fn rgba(self) -> Vec4 {
        match self {
            Self::TransparentBlack => Vec4::ZERO,
            Self::OpaqueBlack => Vec4::new(0.0, 0.0, 0.0, 1.0),
            Self::OpaqueWhite => Vec4::ONE,
        }
    }
}

/// Sampler configuration shared by every decal lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerState {
    /// Addressing along U.
    pub address_mode_u: AddressMode,
    /// Addressing along V.
    pub address_mode_v: AddressMode,
    /// Magnification and minification filter.
    pub filter: FilterMode,
    /// Border for [`AddressMode::ClampToBorder`].
    pub border_color: BorderColor,
}

impl SamplerState {
    /// Same address mode on both axes.
    #[must_use]
    pub fn new(address_mode: AddressMode, filter: FilterMode) -> Self {
        Self {
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            filter,
            border_color: BorderColor::default(),
        }
    }
}

/// Texel coordinates are clamped to this magnitude before conversion so a
/// far-out UV cannot overflow the neighbour lookups. Every address mode has
/// already lost all sub-texel precision at this distance.
const MAX_TEXEL_COORD: f32 = 1_073_741_824.0;

/// Decode an sRGB-encoded channel to linear, as `Rgba8UnormSrgb` sampling
/// does. Alpha is never encoded.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Resolve integer texel coordinate `i` on an axis of `size` texels.
/// `None` means the border color applies.
fn address(i: i64, size: u32, mode: AddressMode) -> Option<u32> {
    let n = i64::from(size);
    let resolved = match mode {
        AddressMode::ClampToEdge => i.clamp(0, n - 1),
        AddressMode::Repeat => i.rem_euclid(n),
        AddressMode::MirrorRepeat => {
            let period = i.rem_euclid(2 * n);
            if period < n {
                period
            } else {
                2 * n - 1 - period
            }
        }
        AddressMode::ClampToBorder => {
            if !(0..n).contains(&i) {
                return None;
            }
            i
        }
    };
    Some(resolved as u32)
}

/// Something the compositor can sample decal imagery from.
pub trait DecalTextureSource {
    /// Number of layers available.
    fn layer_count(&self) -> u32;

    /// RGBA sample of `layer` at `uv`.
    fn sample(&self, uv: Vec2, layer: u32) -> Vec4;
}

/// RGBA float texture array held in host memory.
#[derive(Debug, Clone)]
pub struct TextureArray {
    width: u32,
    height: u32,
    layers: Vec<Vec<Vec4>>,
    sampler: SamplerState,
}

impl TextureArray {
    /// Texture array from per-layer texels (row-major, top row first).
    ///
    /// # Errors
    ///
    /// [`DecalError::TextureLayers`] if there are no layers, a dimension is
    /// zero, or a layer has the wrong texel count.
    pub fn new(
        width: u32,
        height: u32,
        layers: Vec<Vec<Vec4>>,
        sampler: SamplerState,
    ) -> Result<Self, DecalError> {
        if width == 0 || height == 0 || layers.is_empty() {
            return Err(DecalError::TextureLayers(format!(
                "{width}x{height} texture array with {} layers",
                layers.len()
            )));
        }
        let expected = width as usize * height as usize;
        if let Some((i, layer)) =
            layers.iter().enumerate().find(|(_, l)| l.len() != expected)
        {
            return Err(DecalError::TextureLayers(format!(
                "layer {i} has {} texels, expected {expected}",
                layer.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layers,
            sampler,
        })
    }

    /// Texture array from RGBA8 layer bytes, normalized to `[0, 1]`.
    ///
    /// With `srgb` the color channels are decoded to linear the way an
    /// `Rgba8UnormSrgb` texture is sampled on the GPU.
    ///
    /// # Errors
    ///
    /// [`DecalError::TextureLayers`] if a layer is not `width * height * 4`
    /// bytes long.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        layers: &[&[u8]],
        sampler: SamplerState,
        srgb: bool,
    ) -> Result<Self, DecalError> {
        let expected = width as usize * height as usize * 4;
        let mut texels = Vec::with_capacity(layers.len());
        for (i, bytes) in layers.iter().enumerate() {
            if bytes.len() != expected {
                return Err(DecalError::TextureLayers(format!(
                    "layer {i} has {} bytes, expected {expected}",
                    bytes.len()
                )));
            }
            texels.push(
                bytes
                    .chunks_exact(4)
                    .map(|px| {
                        let c = Vec4::new(
                            f32::from(px[0]),
                            f32::from(px[1]),
                            f32::from(px[2]),
                            f32::from(px[3]),
                        ) / 255.0;
                        if srgb {
                            Vec4::new(
                                srgb_to_linear(c.x),
                                srgb_to_linear(c.y),
                                srgb_to_linear(c.z),
                                c.w,
                            )
                        } else {
                            c
                        }
                    })
                    .collect(),
            );
        }
        Self::new(width, height, texels, sampler)
    }

    /// Single-texel layers, one per color. Handy for flat-colored decals.
    ///
    /// # Errors
    ///
    /// [`DecalError::TextureLayers`] if `colors` is empty.
    pub fn solid(colors: &[Vec4], sampler: SamplerState) -> Result<Self, DecalError> {
        Self::new(1, 1, colors.iter().map(|c| vec![*c]).collect(), sampler)
    }

    fn texel(&self, layer: &[Vec4], x: i64, y: i64) -> Vec4 {
        let s = &self.sampler;
        match (
            address(x, self.width, s.address_mode_u),
            address(y, self.height, s.address_mode_v),
        ) {
            (Some(x), Some(y)) => {
                layer[y as usize * self.width as usize + x as usize]
            }
            _ => s.border_color.rgba(),
        }
    }
}

impl DecalTextureSource for TextureArray {
    fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    fn sample(&self, uv: Vec2, layer: u32) -> Vec4 {
        // GPUs clamp the array index rather than failing.
        let index = (layer as usize).min(self.layers.len() - 1);
        let texels = &self.layers[index];
        let size = Vec2::new(self.width as f32, self.height as f32);
        let limit = Vec2::splat(MAX_TEXEL_COORD);

        match self.sampler.filter {
            FilterMode::Nearest => {
                let p = (uv * size).floor().clamp(-limit, limit);
                self.texel(texels, p.x as i64, p.y as i64)
            }
            FilterMode::Linear => {
                let p = (uv * size - 0.5).clamp(-limit, limit);
                let base = p.floor();
                let t = p - base;
                let (x0, y0) = (base.x as i64, base.y as i64);
                let top = self
                    .texel(texels, x0, y0)
                    .lerp(self.texel(texels, x0 + 1, y0), t.x);
                let bottom = self
                    .texel(texels, x0, y0 + 1)
                    .lerp(self.texel(texels, x0 + 1, y0 + 1), t.x);
                top.lerp(bottom, t.y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 layer: red, green / blue, white.
    fn quad(sampler: SamplerState) -> TextureArray {
        TextureArray::new(
            2,
            2,
            vec![vec![
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                Vec4::ONE,
            ]],
            sampler,
        )
        .unwrap()
    }

    #[test]
    fn nearest_picks_top_row_at_small_v() {
        let tex = quad(SamplerState::new(AddressMode::ClampToEdge, FilterMode::Nearest));
        assert_eq!(tex.sample(Vec2::new(0.25, 0.25), 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(0.25, 0.75), 0), Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn linear_blends_at_texel_boundary() {
        let tex = quad(SamplerState::new(AddressMode::ClampToEdge, FilterMode::Linear));
        let c = tex.sample(Vec2::new(0.5, 0.25), 0);
        assert!((c - Vec4::new(0.5, 0.5, 0.0, 1.0)).abs().max_element() < 1e-6);
    }

    #[test]
    fn clamp_to_edge_repeats_edge_texel() {
        let tex = quad(SamplerState::new(AddressMode::ClampToEdge, FilterMode::Nearest));
        assert_eq!(tex.sample(Vec2::new(-3.0, 0.1), 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn repeat_tiles() {
        let tex = quad(SamplerState::new(AddressMode::Repeat, FilterMode::Nearest));
        assert_eq!(
            tex.sample(Vec2::new(1.25, 0.25), 0),
            tex.sample(Vec2::new(0.25, 0.25), 0)
        );
    }

    #[test]
    fn mirror_repeat_flips_odd_tiles() {
        let tex = quad(SamplerState::new(AddressMode::MirrorRepeat, FilterMode::Nearest));
        // u = 1.25 mirrors to 0.75, the green texel.
        assert_eq!(tex.sample(Vec2::new(1.25, 0.25), 0), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn clamp_to_border_is_transparent_outside() {
        let tex = quad(SamplerState::new(AddressMode::ClampToBorder, FilterMode::Nearest));
        assert_eq!(tex.sample(Vec2::new(1.5, 0.5), 0), Vec4::ZERO);
        assert_eq!(tex.sample(Vec2::new(0.25, 0.25), 0), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn layer_index_is_clamped() {
        let tex = TextureArray::solid(
            &[Vec4::X, Vec4::Y],
            SamplerState::new(AddressMode::ClampToEdge, FilterMode::Nearest),
        )
        .unwrap();
        assert_eq!(tex.layer_count(), 2);
        assert_eq!(tex.sample(Vec2::splat(0.5), 9), Vec4::Y);
    }

    #[test]
    fn rgba8_is_normalized() {
        let bytes = [255u8, 0, 51, 255];
        let tex =
            TextureArray::from_rgba8(1, 1, &[&bytes], SamplerState::default(), false)
                .unwrap();
        let c = tex.sample(Vec2::splat(0.5), 0);
        assert!((c - Vec4::new(1.0, 0.0, 0.2, 1.0)).abs().max_element() < 1e-6);
    }

    #[test]
    fn srgb_bytes_decode_to_linear() {
        let bytes = [128u8, 10, 255, 128];
        let tex =
            TextureArray::from_rgba8(1, 1, &[&bytes], SamplerState::default(), true)
                .unwrap();
        let c = tex.sample(Vec2::splat(0.5), 0);
        // 128/255 encodes ~0.2158 linear; 10/255 sits on the linear segment.
        assert!((c.x - 0.215_861).abs() < 1e-4);
        assert!((c.y - 10.0 / 255.0 / 12.92).abs() < 1e-6);
        assert!((c.z - 1.0).abs() < 1e-6);
        assert!((c.w - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn far_uv_resolves_to_edge_texel() {
        let tex = quad(SamplerState::new(AddressMode::ClampToEdge, FilterMode::Linear));
        // Saturates to the top-right texel instead of overflowing.
        assert_eq!(tex.sample(Vec2::new(1e30, -1e30), 0), Vec4::new(0.0, 1.0, 0.0, 1.0));

        let tex = quad(SamplerState::new(AddressMode::ClampToBorder, FilterMode::Linear));
        assert_eq!(tex.sample(Vec2::new(-1e30, 1e30), 0), Vec4::ZERO);
    }

    #[test]
    fn mismatched_layer_size_is_an_error() {
        let err =
            TextureArray::from_rgba8(2, 2, &[&[0u8; 4]], SamplerState::default(), false);
        assert!(matches!(err, Err(DecalError::TextureLayers(_))));
    }
}

//! Decal texture array upload.

use wgpu::util::DeviceExt;

use crate::error::DecalError;

/// A `D2Array` texture holding one decal image per layer, with its view.
///
/// Created with a single mip level: the shader samples level 0 explicitly.
pub struct DecalTextureArray {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// Array view over every layer.
    pub view: wgpu::TextureView,
    layer_count: u32,
}

impl DecalTextureArray {
    /// Upload RGBA8 layers of `width x height` texels, top row first.
    ///
    /// # Errors
    ///
    /// [`DecalError::TextureLayers`] if there are no layers, a dimension is
    /// zero, or a layer is not `width * height * 4` bytes.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        layers: &[&[u8]],
        srgb: bool,
    ) -> Result<Self, DecalError> {
        if width == 0 || height == 0 || layers.is_empty() {
            return Err(DecalError::TextureLayers(format!(
                "{width}x{height} texture array with {} layers",
                layers.len()
            )));
        }
        let layer_bytes = width as usize * height as usize * 4;
        let mut data = Vec::with_capacity(layer_bytes * layers.len());
        for (i, layer) in layers.iter().enumerate() {
            if layer.len() != layer_bytes {
                return Err(DecalError::TextureLayers(format!(
                    "layer {i} has {} bytes, expected {layer_bytes}",
                    layer.len()
                )));
            }
            data.extend_from_slice(layer);
        }

        let layer_count = layers.len() as u32;
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Radius Cursor Decal Textures"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: layer_count,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data,
        );
        // A single-layer texture would otherwise get a plain D2 view.
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Radius Cursor Decal Textures View"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        log::debug!("uploaded {layer_count} decal layers of {width}x{height}");

        Ok(Self {
            texture,
            view,
            layer_count,
        })
    }

    /// Layers of flat color, one texel each.
    ///
    /// # Errors
    ///
    /// [`DecalError::TextureLayers`] if `colors` is empty.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        colors: &[[u8; 4]],
        srgb: bool,
    ) -> Result<Self, DecalError> {
        let layers: Vec<&[u8]> = colors.iter().map(<[u8; 4]>::as_slice).collect();
        Self::from_rgba8(device, queue, 1, 1, &layers, srgb)
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }
}

//! GPU mirror of the per-frame decal set.
//!
//! Owns everything the decal routine binds: the texture array, the sampler,
//! the constants uniform and the decal record storage buffer, plus the bind
//! group layout and bind group built from the configured binding slots.
//! Renderers include [`RadiusDecalResources::layout`] in their pipeline
//! layout at [`RadiusDecalResources::group`] and bind
//! [`RadiusDecalResources::bind_group`] there at draw time.

use wgpu::util::DeviceExt;

use super::dynamic_buffer::TypedBuffer;
use super::pipeline_helpers::{
    decal_sampler, filtering_sampler, storage_buffer, texture_2d_array,
    uniform_buffer,
};
use super::render_context::RenderContext;
use super::texture::DecalTextureArray;
use crate::compositor::{AddressMode, BorderColor, FilterMode, SamplerState};
use crate::decal::{
    RadiusCursorDecal, RadiusCursorDecalConstants, RadiusCursorDecalSet,
};
use crate::error::DecalError;
use crate::options::{BindingOptions, Options};

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => Self::ClampToEdge,
            AddressMode::Repeat => Self::Repeat,
            AddressMode::MirrorRepeat => Self::MirrorRepeat,
            AddressMode::ClampToBorder => Self::ClampToBorder,
        }
    }
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(filter: FilterMode) -> Self {
        match filter {
            FilterMode::Nearest => Self::Nearest,
            FilterMode::Linear => Self::Linear,
        }
    }
}

impl From<BorderColor> for wgpu::SamplerBorderColor {
    fn from(color: BorderColor) -> Self {
        match color {
            BorderColor::TransparentBlack => Self::TransparentBlack,
            BorderColor::OpaqueBlack => Self::OpaqueBlack,
            BorderColor::OpaqueWhite => Self::OpaqueWhite,
        }
    }
}

/// The buffers and views a decal bind group is built from.
struct DecalViews<'a> {
    textures: &'a wgpu::TextureView,
    sampler: &'a wgpu::Sampler,
    constants: &'a wgpu::Buffer,
    decals: &'a wgpu::Buffer,
}

/// Bind group and backing resources for the radius cursor decal routine.
pub struct RadiusDecalResources {
    bindings: BindingOptions,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    sampler_state: SamplerState,
    textures: DecalTextureArray,
    constants_buffer: wgpu::Buffer,
    decal_buffer: TypedBuffer<RadiusCursorDecal>,
    /// `(set id, generation)` last uploaded, `None` before the first upload.
    uploaded: Option<(u64, u64)>,
}

impl RadiusDecalResources {
    /// Create resources for `options`, sampling from `textures`.
    ///
    /// # Errors
    ///
    /// [`DecalError::BindingConflict`] if two resources share a slot, or
    /// [`DecalError::OptionsParse`] if the decal limits are unusable.
    pub fn new(
        context: &RenderContext,
        options: &Options,
        textures: DecalTextureArray,
    ) -> Result<Self, DecalError> {
        options.bindings.validate()?;
        options.decals.validate()?;

        let requested = options.sampler.sampler_state();
        let sampler_state = options
            .sampler
            .effective_sampler_state(context.supports_clamp_to_border());
        if sampler_state != requested {
            log::warn!(
                "device lacks clamp-to-border addressing, decals fall back to clamp-to-edge"
            );
        }
        let sampler = Self::create_sampler(context, &sampler_state);
        let constants_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Radius Cursor Decal Constants"),
                contents: bytemuck::bytes_of(&RadiusCursorDecalConstants::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let decal_buffer = TypedBuffer::with_capacity(
            &context.device,
            "Radius Cursor Decals",
            options.decals.max_decals,
            wgpu::BufferUsages::STORAGE,
        );

        let bind_group_layout =
            Self::create_bind_group_layout(context, &options.bindings);
        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            &options.bindings,
            &DecalViews {
                textures: &textures.view,
                sampler: &sampler,
                constants: &constants_buffer,
                decals: decal_buffer.buffer(),
            },
        );

        Ok(Self {
            bindings: options.bindings,
            bind_group_layout,
            bind_group,
            sampler,
            sampler_state,
            textures,
            constants_buffer,
            decal_buffer,
            uploaded: None,
        })
    }

    fn create_sampler(
        context: &RenderContext,
        state: &SamplerState,
    ) -> wgpu::Sampler {
        let address_mode = state.address_mode_u;
        let border_color = (address_mode == AddressMode::ClampToBorder)
            .then(|| state.border_color.into());
        decal_sampler(
            &context.device,
            "Radius Cursor Decal Sampler",
            address_mode.into(),
            state.filter.into(),
            border_color,
        )
    }

    fn create_bind_group_layout(
        context: &RenderContext,
        bindings: &BindingOptions,
    ) -> wgpu::BindGroupLayout {
        context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Radius Cursor Decal Bind Group Layout"),
                entries: &[
                    texture_2d_array(bindings.textures),
                    filtering_sampler(bindings.sampler),
                    uniform_buffer(bindings.constants),
                    storage_buffer(bindings.decals, true),
                ],
            },
        )
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        bindings: &BindingOptions,
        views: &DecalViews,
    ) -> wgpu::BindGroup {
        log::debug!("creating decal bind group in group {}", bindings.group);
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Radius Cursor Decal Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: bindings.textures,
                        resource: wgpu::BindingResource::TextureView(
                            views.textures,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: bindings.sampler,
                        resource: wgpu::BindingResource::Sampler(views.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: bindings.constants,
                        resource: views.constants.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: bindings.decals,
                        resource: views.decals.as_entire_binding(),
                    },
                ],
            })
    }

    fn rebuild_bind_group(&mut self, context: &RenderContext) {
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            &self.bindings,
            &DecalViews {
                textures: &self.textures.view,
                sampler: &self.sampler,
                constants: &self.constants_buffer,
                decals: self.decal_buffer.buffer(),
            },
        );
    }

    /// Upload the set's decals and count, once per frame before drawing.
    ///
    /// Skips the upload when the same set is passed again unchanged since
    /// the last call. Returns `true` if anything was written.
    pub fn upload(
        &mut self,
        context: &RenderContext,
        set: &RadiusCursorDecalSet,
    ) -> bool {
        let key = (set.id(), set.generation());
        if self.uploaded == Some(key) {
            return false;
        }

        let reallocated =
            self.decal_buffer
                .write(&context.device, &context.queue, set.decals());
        context.queue.write_buffer(
            &self.constants_buffer,
            0,
            bytemuck::bytes_of(&set.constants()),
        );
        if reallocated {
            self.rebuild_bind_group(context);
        }

        self.uploaded = Some(key);
        true
    }

    /// Swap in a new texture array.
    ///
    /// Callers should follow with
    /// [`RadiusCursorDecalSet::set_layer_count`] so validation matches.
    pub fn set_textures(
        &mut self,
        context: &RenderContext,
        textures: DecalTextureArray,
    ) {
        self.textures = textures;
        self.rebuild_bind_group(context);
    }

    /// Bind group index the renderer must bind [`Self::bind_group`] at.
    #[must_use]
    pub fn group(&self) -> u32 {
        self.bindings.group
    }

    /// Binding slots in use.
    #[must_use]
    pub fn bindings(&self) -> &BindingOptions {
        &self.bindings
    }

    /// Layout to place in pipeline layouts at [`Self::group`].
    #[must_use]
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Bind group to set at [`Self::group`].
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// The bound texture array.
    #[must_use]
    pub fn textures(&self) -> &DecalTextureArray {
        &self.textures
    }

    /// CPU equivalent of the sampler the device actually built, after any
    /// clamp-to-border fallback.
    #[must_use]
    pub fn sampler_state(&self) -> SamplerState {
        self.sampler_state
    }
}

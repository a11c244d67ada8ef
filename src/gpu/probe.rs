//! Compute probe: evaluate the WGSL decal routine at arbitrary world points
//! and read the colors back.
//!
//! Used to check the GPU path against
//! [`radius_cursor_decal_color`](crate::compositor::radius_cursor_decal_color)
//! and to debug binding conventions without a terrain pass.

use std::sync::mpsc;

use glam::Vec3;
use wgpu::util::DeviceExt;

use super::decal_resources::RadiusDecalResources;
use super::pipeline_helpers::storage_buffer;
use super::render_context::RenderContext;
use super::shader_composer::ShaderComposer;
use crate::error::DecalError;

const PROBE_SHADER_TEMPLATE: &str =
    include_str!("../../assets/shaders/utility/decal_probe.wgsl");

const WORKGROUP_SIZE: u32 = 64;

/// Probe shader source placing the probe buffers in `probe_group`.
#[must_use]
pub fn probe_shader_source(probe_group: u32) -> String {
    PROBE_SHADER_TEMPLATE.replace("{{PROBE_GROUP}}", &probe_group.to_string())
}

/// The bind group the probe uses for its own buffers: the first one the
/// decal resources do not occupy.
#[must_use]
pub fn probe_group_for(decal_group: u32) -> u32 {
    u32::from(decal_group == 0)
}

/// Compute pipeline evaluating `radius_cursor_decal_color` per point.
pub struct DecalProbe {
    pipeline: wgpu::ComputePipeline,
    probe_layout: wgpu::BindGroupLayout,
    /// Bound at every group index used by neither the probe nor the decals.
    empty_bind_group: wgpu::BindGroup,
    probe_group: u32,
    decal_group: u32,
}

impl DecalProbe {
    /// Build the probe pipeline against `decals`' layout and bindings.
    ///
    /// # Errors
    ///
    /// [`DecalError::ShaderCompose`] if the probe shader fails to compose,
    /// or if `composer` was built for different bindings than `decals`.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        decals: &RadiusDecalResources,
    ) -> Result<Self, DecalError> {
        if composer.bindings() != decals.bindings() {
            return Err(DecalError::ShaderCompose(
                "shader composer and decal resources use different bindings"
                    .to_owned(),
            ));
        }

        let decal_group = decals.group();
        let probe_group = probe_group_for(decal_group);

        let shader = composer.compose(
            &context.device,
            "Decal Probe Shader",
            &probe_shader_source(probe_group),
            "utility/decal_probe.wgsl",
        )?;

        let probe_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Decal Probe Bind Group Layout"),
                entries: &[storage_buffer(0, true), storage_buffer(1, false)],
            },
        );
        let empty_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Decal Probe Empty Layout"),
                entries: &[],
            },
        );
        let empty_bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Decal Probe Empty Bind Group"),
                layout: &empty_layout,
                entries: &[],
            });

        let group_count = decal_group.max(probe_group) + 1;
        let layouts: Vec<&wgpu::BindGroupLayout> = (0..group_count)
            .map(|g| {
                if g == decal_group {
                    decals.layout()
                } else if g == probe_group {
                    &probe_layout
                } else {
                    &empty_layout
                }
            })
            .collect();

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Decal Probe Pipeline Layout"),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            },
        );
        let pipeline = context.device.create_compute_pipeline(
            &wgpu::ComputePipelineDescriptor {
                label: Some("Decal Probe Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some("cs_main"),
                compilation_options: Default::default(),
                cache: None,
            },
        );

        Ok(Self {
            pipeline,
            probe_layout,
            empty_bind_group,
            probe_group,
            decal_group,
        })
    }

    /// Evaluate the decal routine at each of `points` on the GPU.
    ///
    /// Blocks until the results are read back. `decals` must already hold
    /// this frame's upload.
    ///
    /// # Errors
    ///
    /// [`DecalError::Readback`] if mapping the result buffer fails.
    pub fn run(
        &self,
        context: &RenderContext,
        decals: &RadiusDecalResources,
        points: &[Vec3],
    ) -> Result<Vec<Vec3>, DecalError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let device = &context.device;
        let padded: Vec<[f32; 4]> =
            points.iter().map(|p| p.extend(0.0).to_array()).collect();
        let result_size = (padded.len() * size_of::<[f32; 4]>()) as u64;

        let points_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Decal Probe Points"),
                contents: bytemuck::cast_slice(&padded),
                usage: wgpu::BufferUsages::STORAGE,
            });
        let colors_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Decal Probe Colors"),
            size: result_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Decal Probe Staging Buffer"),
            size: result_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let probe_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Decal Probe Bind Group"),
                layout: &self.probe_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: points_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: colors_buffer.as_entire_binding(),
                    },
                ],
            });

        let mut encoder = context.create_encoder("Decal Probe Encoder");
        {
            let mut pass =
                encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Decal Probe Pass"),
                    timestamp_writes: None,
                });
            pass.set_pipeline(&self.pipeline);
            for group in 0..=self.decal_group.max(self.probe_group) {
                let bind_group = if group == self.decal_group {
                    decals.bind_group()
                } else if group == self.probe_group {
                    &probe_bind_group
                } else {
                    &self.empty_bind_group
                };
                pass.set_bind_group(group, bind_group, &[]);
            }
            pass.dispatch_workgroups(
                (padded.len() as u32).div_ceil(WORKGROUP_SIZE),
                1,
                1,
            );
        }
        encoder.copy_buffer_to_buffer(
            &colors_buffer,
            0,
            &staging_buffer,
            0,
            result_size,
        );
        context.submit(encoder);

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        let _ = device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| DecalError::Readback(e.to_string()))?;

        match receiver.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(DecalError::Readback(e.to_string())),
            Err(e) => return Err(DecalError::Readback(e.to_string())),
        }

        let data = buffer_slice.get_mapped_range();
        let colors = data
            .chunks_exact(size_of::<[f32; 4]>())
            .map(|chunk| {
                let [r, g, b, _] = bytemuck::pod_read_unaligned::<[f32; 4]>(chunk);
                Vec3::new(r, g, b)
            })
            .collect();
        drop(data);
        staging_buffer.unmap();

        Ok(colors)
    }
}

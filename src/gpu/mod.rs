//! GPU side of the decal pass.
//!
//! Provides headless wgpu device initialization, the decal texture array,
//! the bind group that feeds the WGSL routine, shader composition, and a
//! compute probe for reading the routine's output back.

/// Bind group, texture array, sampler and buffers for the decal routine.
pub mod decal_resources;
/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Bind group layout entry helpers.
pub mod pipeline_helpers;
/// Compute probe evaluating the WGSL routine at world points.
pub mod probe;
/// wgpu device and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Decal texture array upload.
pub mod texture;

pub use decal_resources::RadiusDecalResources;
pub use probe::DecalProbe;
pub use render_context::{RenderContext, RenderContextError};
pub use shader_composer::{decal_module_source, ShaderComposer, DECAL_MODULE_PATH};
pub use texture::DecalTextureArray;

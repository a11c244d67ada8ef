use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::DecalError;
use crate::options::BindingOptions;

/// Import path consumers use to reach the decal routine.
pub const DECAL_MODULE_PATH: &str = "radius_decals::cursor_decals";

const DECAL_MODULE_TEMPLATE: &str =
    include_str!("../../assets/shaders/modules/radius_cursor_decals.wgsl");
const DECAL_MODULE_FILE: &str = "modules/radius_cursor_decals.wgsl";

/// WGSL source of the decal module with `bindings` substituted in.
#[must_use]
pub fn decal_module_source(bindings: &BindingOptions) -> String {
    DECAL_MODULE_TEMPLATE
        .replace("{{GROUP}}", &bindings.group.to_string())
        .replace("{{TEXTURES_BINDING}}", &bindings.textures.to_string())
        .replace("{{SAMPLER_BINDING}}", &bindings.sampler.to_string())
        .replace("{{CONSTANTS_BINDING}}", &bindings.constants.to_string())
        .replace("{{DECALS_BINDING}}", &bindings.decals.to_string())
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// The decal module is registered at construction time under
/// [`DECAL_MODULE_PATH`], with the binding convention baked in. Consuming
/// shaders `#import radius_decals::cursor_decals::radius_cursor_decal_color`.
/// The composer produces `naga::Module` IR directly, skipping WGSL re-parse
/// at runtime.
pub struct ShaderComposer {
    composer: Composer,
    bindings: BindingOptions,
}

impl ShaderComposer {
    /// Composer with the decal module registered for `bindings`.
    ///
    /// # Errors
    ///
    /// [`DecalError::BindingConflict`] if two resources share a slot,
    /// [`DecalError::ShaderCompose`] if the module fails to register.
    pub fn new(bindings: &BindingOptions) -> Result<Self, DecalError> {
        bindings.validate()?;

        let mut composer = Composer::default();
        let source = decal_module_source(bindings);
        let _ = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: DECAL_MODULE_FILE,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                DecalError::ShaderCompose(format!(
                    "failed to register '{DECAL_MODULE_FILE}': {e}"
                ))
            })?;

        Ok(Self {
            composer,
            bindings: *bindings,
        })
    }

    /// Binding convention the decal module was registered with.
    #[must_use]
    pub fn bindings(&self) -> &BindingOptions {
        &self.bindings
    }

    /// Compose a shader source string (which may contain `#import` directives)
    /// into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// [`DecalError::ShaderCompose`] if composition or validation fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, DecalError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose and validate a shader source into a `naga::Module` without
    /// creating a wgpu shader module. Works without a GPU device.
    ///
    /// # Errors
    ///
    /// [`DecalError::ShaderCompose`] if composition or validation fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, DecalError> {
        let module = self
            .composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                DecalError::ShaderCompose(format!(
                    "failed to compose '{file_path}': {e}"
                ))
            })?;

        let _ = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|e| {
            DecalError::ShaderCompose(format!(
                "'{file_path}' failed validation: {e}"
            ))
        })?;

        Ok(module)
    }
}

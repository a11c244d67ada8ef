use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DecalError;

/// Bind groups guaranteed by the default WebGPU limits.
pub const MAX_BIND_GROUPS: u32 = 4;

/// Where the decal resources live in the renderer's binding scheme.
///
/// Defaults follow the pass-constants resource set convention: group 1,
/// texture array at 7, sampler at 8, constants at 9, decal records at 10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Bindings", inline)]
#[serde(default)]
pub struct BindingOptions {
    /// Bind group index shared by all decal resources.
    #[schemars(title = "Group", range(min = 0, max = 3))]
    pub group: u32,
    /// Binding of the decal texture array.
    #[schemars(title = "Textures")]
    pub textures: u32,
    /// Binding of the decal sampler.
    #[schemars(title = "Sampler")]
    pub sampler: u32,
    /// Binding of the uniform block holding the decal count.
    #[schemars(title = "Constants")]
    pub constants: u32,
    /// Binding of the read-only decal record buffer.
    #[schemars(title = "Decals")]
    pub decals: u32,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            group: 1,
            textures: 7,
            sampler: 8,
            constants: 9,
            decals: 10,
        }
    }
}

impl BindingOptions {
    /// `(name, slot)` pairs in declaration order.
    #[must_use]
    pub fn slots(&self) -> [(&'static str, u32); 4] {
        [
            ("textures", self.textures),
            ("sampler", self.sampler),
            ("constants", self.constants),
            ("decals", self.decals),
        ]
    }

    /// Check that the group exists under default limits and that every
    /// resource has its own binding slot.
    ///
    /// # Errors
    ///
    /// [`DecalError::BindingConflict`] naming the out-of-range group or the
    /// first pair sharing a slot.
    pub fn validate(&self) -> Result<(), DecalError> {
        if self.group >= MAX_BIND_GROUPS {
            return Err(DecalError::BindingConflict(format!(
                "group {} exceeds the {MAX_BIND_GROUPS} available bind groups",
                self.group
            )));
        }
        let slots = self.slots();
        for (i, (name, slot)) in slots.iter().enumerate() {
            if let Some((other, _)) = slots[i + 1..].iter().find(|(_, s)| s == slot) {
                return Err(DecalError::BindingConflict(format!(
                    "{name} and {other} both use binding {slot} in group {}",
                    self.group
                )));
            }
        }
        Ok(())
    }
}

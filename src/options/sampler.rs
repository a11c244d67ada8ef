use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::compositor::{AddressMode, BorderColor, FilterMode, SamplerState};

/// Sampler and texture format used for decal lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Sampler", inline)]
#[serde(default)]
pub struct SamplerOptions {
    /// Addressing outside the decal footprint, both axes.
    #[schemars(title = "Address Mode")]
    pub address_mode: AddressMode,
    /// Texel filtering.
    #[schemars(title = "Filter")]
    pub filter: FilterMode,
    /// Border for `clamp_to_border` addressing.
    #[schemars(title = "Border Color")]
    pub border_color: BorderColor,
    /// Decode decal textures as sRGB.
    #[schemars(title = "sRGB Textures")]
    pub srgb: bool,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            address_mode: AddressMode::ClampToEdge,
            filter: FilterMode::Linear,
            border_color: BorderColor::TransparentBlack,
            srgb: true,
        }
    }
}

impl SamplerOptions {
    /// CPU sampler equivalent to the requested GPU sampler.
    #[must_use]
    pub fn sampler_state(&self) -> SamplerState {
        SamplerState {
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            filter: self.filter,
            border_color: self.border_color,
        }
    }

    /// Sampler a device actually gets: clamp-to-border degrades to
    /// clamp-to-edge when the device lacks the feature.
    #[must_use]
    pub fn effective_sampler_state(&self, supports_clamp_to_border: bool) -> SamplerState {
        let mut state = self.sampler_state();
        if !supports_clamp_to_border {
            for mode in [&mut state.address_mode_u, &mut state.address_mode_v] {
                if *mode == AddressMode::ClampToBorder {
                    *mode = AddressMode::ClampToEdge;
                }
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_addressing_degrades_without_device_support() {
        let options = SamplerOptions {
            address_mode: AddressMode::ClampToBorder,
            ..SamplerOptions::default()
        };
        let fallback = options.effective_sampler_state(false);
        assert_eq!(fallback.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(fallback.address_mode_v, AddressMode::ClampToEdge);
        assert_eq!(fallback.filter, options.filter);
        assert_eq!(options.effective_sampler_state(true), options.sampler_state());
    }

    #[test]
    fn other_modes_are_unaffected_by_border_support() {
        let options = SamplerOptions {
            address_mode: AddressMode::MirrorRepeat,
            ..SamplerOptions::default()
        };
        assert_eq!(options.effective_sampler_state(false), options.sampler_state());
    }
}

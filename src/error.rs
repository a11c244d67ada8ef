//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Why a single decal record was refused by host-side validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecalRejection {
    /// Bottom-left corner has a NaN or infinite component.
    NonFiniteCorner,
    /// Diameter is zero, negative, NaN or infinite.
    InvalidDiameter(f32),
    /// Opacity lies outside `[0, 1]` (or is NaN).
    OpacityOutOfRange(f32),
    /// Texture layer index does not exist in the bound texture array.
    TextureLayerOutOfRange {
        /// Requested layer.
        layer: u32,
        /// Layers available in the texture array.
        layer_count: u32,
    },
}

impl fmt::Display for DecalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteCorner => write!(f, "corner is not finite"),
            Self::InvalidDiameter(d) => {
                write!(f, "diameter {d} is not a positive finite value")
            }
            Self::OpacityOutOfRange(o) => {
                write!(f, "opacity {o} is outside [0, 1]")
            }
            Self::TextureLayerOutOfRange { layer, layer_count } => write!(
                f,
                "texture layer {layer} out of range ({layer_count} layers)"
            ),
        }
    }
}

/// Errors produced by the radius-decals crate.
#[derive(Debug)]
pub enum DecalError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A decal record failed per-frame validation.
    InvalidDecal {
        /// Position of the record in the submitted list.
        index: usize,
        /// What was wrong with it.
        reason: DecalRejection,
    },
    /// More decals were submitted than the set can hold.
    CapacityExceeded {
        /// Number of records submitted.
        requested: usize,
        /// Allocated capacity.
        capacity: usize,
    },
    /// Two decal resources were assigned the same binding slot.
    BindingConflict(String),
    /// Texture layer data does not match the declared dimensions.
    TextureLayers(String),
    /// WGSL composition or validation failure.
    ShaderCompose(String),
    /// GPU buffer readback failure.
    Readback(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for DecalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::InvalidDecal { index, reason } => {
                write!(f, "invalid decal at index {index}: {reason}")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "{requested} decals submitted but capacity is {capacity}"
            ),
            Self::BindingConflict(msg) => {
                write!(f, "binding conflict: {msg}")
            }
            Self::TextureLayers(msg) => {
                write!(f, "texture layer error: {msg}")
            }
            Self::ShaderCompose(msg) => {
                write!(f, "shader composition error: {msg}")
            }
            Self::Readback(msg) => write!(f, "readback error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for DecalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for DecalError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for DecalError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

//! Decal records shared with the GPU and the validated per-frame decal set.
//!
//! [`RadiusCursorDecal`] and [`RadiusCursorDecalConstants`] are the exact
//! byte layouts bound to the shader. [`RadiusCursorDecalSet`] is the host-side
//! owner that validates each frame's list before it reaches the GPU.

mod descriptor;
mod set;

pub use descriptor::{RadiusCursorDecal, RadiusCursorDecalConstants};
pub use set::{validate_decal, OverflowPolicy, RadiusCursorDecalSet};

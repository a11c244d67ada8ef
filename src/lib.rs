// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// GPU / graphics allowances, mirroring [workspace.lints.clippy]; the
// crate-level denies above would otherwise re-enable them.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::float_cmp,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
    clippy::doc_markdown,
    clippy::similar_names,
    clippy::many_single_char_names,
    clippy::items_after_statements,
    clippy::use_self,
    clippy::redundant_pub_crate
)]
// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

//! Radius cursor decal compositing for wgpu terrain renderers.
//!
//! Blends square, texture-shaped decals (selection rings, ability range
//! indicators) onto terrain. Each decal has a world-space bottom-left corner,
//! a diameter, a texture array layer and an opacity; every shaded terrain
//! point adds `rgb * alpha * opacity` of each active decal's sample.
//!
//! # Key entry points
//!
//! - [`decal::RadiusCursorDecal`] - the 32-byte GPU record
//! - [`decal::RadiusCursorDecalSet`] - validated per-frame decal list
//! - [`compositor::radius_cursor_decal_color`] - CPU reference of the shader
//!   routine
//! - [`gpu::RadiusDecalResources`] - bind group feeding the WGSL routine
//! - [`gpu::ShaderComposer`] - registers `radius_decals::cursor_decals` for
//!   `#import`
//! - [`options::Options`] - binding slots, decal limits, sampler state
//!
//! # Frame flow
//!
//! Game logic submits the frame's decals to the set, which rejects malformed
//! records and keeps the previous frame on failure. The renderer uploads the
//! set through [`gpu::RadiusDecalResources::upload`] and binds its bind group
//! at the configured group; terrain fragment shaders call
//! `radius_cursor_decal_color(world_position)` and add the result to their
//! shaded color.

pub mod compositor;
pub mod decal;
pub mod error;
pub mod gpu;
pub mod options;

//! Host-side per-frame decal list.
//!
//! The shader trusts its inputs completely: a zero diameter produces NaN UVs
//! and a count past the end of the buffer reads garbage. All of that is
//! checked here, once per frame, before anything is uploaded.

use std::sync::atomic::{AtomicU64, Ordering};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::descriptor::{RadiusCursorDecal, RadiusCursorDecalConstants};
use crate::error::{DecalError, DecalRejection};

/// What to do when a frame submits more decals than the set can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Refuse the update and keep the previous frame's decals.
    #[default]
    Reject,
    /// Keep the first `capacity` decals and drop the rest.
    Clamp,
}

/// Check a single record against the host-side contract.
///
/// # Errors
///
/// Returns [`DecalError::InvalidDecal`] carrying `index` and the first
/// violated rule.
pub fn validate_decal(
    index: usize,
    decal: &RadiusCursorDecal,
    layer_count: u32,
) -> Result<(), DecalError> {
    let reject = |reason| -> Result<(), DecalError> {
        Err(DecalError::InvalidDecal { index, reason })
    };

    if !decal.bottom_left_corner.iter().all(|c| c.is_finite()) {
        return reject(DecalRejection::NonFiniteCorner);
    }
    if !(decal.diameter.is_finite() && decal.diameter > 0.0) {
        return reject(DecalRejection::InvalidDiameter(decal.diameter));
    }
    if !(0.0..=1.0).contains(&decal.opacity) {
        return reject(DecalRejection::OpacityOutOfRange(decal.opacity));
    }
    if decal.texture_index >= layer_count {
        return reject(DecalRejection::TextureLayerOutOfRange {
            layer: decal.texture_index,
            layer_count,
        });
    }
    Ok(())
}

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(0);

fn next_set_id() -> u64 {
    NEXT_SET_ID.fetch_add(1, Ordering::Relaxed)
}

/// The decals to draw this frame, bounded by the allocated buffer length.
///
/// Updates are all-or-nothing: a rejected update leaves the previous frame's
/// decals in place.
///
/// Every set, clones included, carries a process-unique id so GPU mirrors can
/// tell two sets at the same generation apart.
#[derive(Debug)]
pub struct RadiusCursorDecalSet {
    id: u64,
    decals: Vec<RadiusCursorDecal>,
    capacity: usize,
    layer_count: u32,
    overflow: OverflowPolicy,
    /// Bumped on every accepted change so GPU mirrors know to re-upload.
    generation: u64,
}

impl RadiusCursorDecalSet {
    /// Empty set holding at most `capacity` decals that may reference
    /// `layer_count` texture layers.
    #[must_use]
    pub fn new(capacity: usize, layer_count: u32, overflow: OverflowPolicy) -> Self {
        Self {
            id: next_set_id(),
            decals: Vec::with_capacity(capacity),
            capacity,
            layer_count,
            overflow,
            generation: 0,
        }
    }

    /// Replace the current decals with `decals`.
    ///
    /// Returns the number of decals accepted.
    ///
    /// # Errors
    ///
    /// [`DecalError::InvalidDecal`] if any record fails validation, or
    /// [`DecalError::CapacityExceeded`] under [`OverflowPolicy::Reject`].
    /// In both cases the previous frame's decals are kept.
    pub fn update(&mut self, decals: &[RadiusCursorDecal]) -> Result<usize, DecalError> {
        let accepted = if decals.len() > self.capacity {
            match self.overflow {
                OverflowPolicy::Reject => {
                    log::warn!(
                        "rejecting decal update: {} decals, capacity {}",
                        decals.len(),
                        self.capacity
                    );
                    return Err(DecalError::CapacityExceeded {
                        requested: decals.len(),
                        capacity: self.capacity,
                    });
                }
                OverflowPolicy::Clamp => {
                    log::warn!(
                        "clamping {} decals to capacity {}",
                        decals.len(),
                        self.capacity
                    );
                    &decals[..self.capacity]
                }
            }
        } else {
            decals
        };

        for (index, decal) in accepted.iter().enumerate() {
            if let Err(e) = validate_decal(index, decal, self.layer_count) {
                log::warn!("rejecting decal update: {e}");
                return Err(e);
            }
        }

        self.decals.clear();
        self.decals.extend_from_slice(accepted);
        self.generation += 1;
        Ok(self.decals.len())
    }

    /// Remove all decals.
    pub fn clear(&mut self) {
        if !self.decals.is_empty() {
            self.decals.clear();
            self.generation += 1;
        }
    }

    /// Active decals in submission order.
    #[must_use]
    pub fn decals(&self) -> &[RadiusCursorDecal] {
        &self.decals
    }

    /// Number of active decals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decals.len()
    }

    /// `true` when no decals are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }

    /// Maximum number of decals per frame.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Layers available in the bound texture array.
    #[must_use]
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Change the layer count after the texture array was rebuilt.
    ///
    /// Current decals that reference a layer that no longer exists are
    /// dropped.
    pub fn set_layer_count(&mut self, layer_count: u32) {
        self.layer_count = layer_count;
        let before = self.decals.len();
        self.decals.retain(|d| d.texture_index < layer_count);
        if self.decals.len() != before {
            log::debug!(
                "dropped {} decals after texture array shrank to {layer_count} layers",
                before - self.decals.len()
            );
            self.generation += 1;
        }
    }

    /// Process-unique identity of this set.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Change counter, incremented on every accepted modification.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Uniform block announcing the active decal count.
    #[must_use]
    pub fn constants(&self) -> RadiusCursorDecalConstants {
        RadiusCursorDecalConstants::new(self.decals.len() as u32)
    }
}

impl Clone for RadiusCursorDecalSet {
    fn clone(&self) -> Self {
        Self {
            id: next_set_id(),
            decals: self.decals.clone(),
            capacity: self.capacity,
            layer_count: self.layer_count,
            overflow: self.overflow,
            generation: self.generation,
        }
    }
}

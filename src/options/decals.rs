use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decal::OverflowPolicy;
use crate::error::DecalError;

/// Limits for the per-frame decal set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Decals", inline)]
#[serde(default)]
pub struct DecalOptions {
    /// Decal records allocated in the storage buffer.
    #[schemars(title = "Max Decals", range(min = 1, max = 1024))]
    pub max_decals: usize,
    /// Behavior when a frame submits more than `max_decals`.
    #[schemars(title = "Overflow")]
    pub overflow: OverflowPolicy,
}

impl Default for DecalOptions {
    fn default() -> Self {
        Self {
            max_decals: 20,
            overflow: OverflowPolicy::Reject,
        }
    }
}

impl DecalOptions {
    /// Check that the set can hold at least one decal.
    ///
    /// # Errors
    ///
    /// [`DecalError::OptionsParse`] if `max_decals` is zero.
    pub fn validate(&self) -> Result<(), DecalError> {
        if self.max_decals == 0 {
            return Err(DecalError::OptionsParse(
                "decals.max_decals must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

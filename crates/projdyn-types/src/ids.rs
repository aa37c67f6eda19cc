//! Strongly-typed identifiers for simulation entities.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a deformable mesh instance.
///
/// Every constructed mesh receives a fresh id, so a solver can tell
/// whether the mesh it is asked to step is the one it was bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u64);

impl ModelId {
    /// Allocates a new, process-unique id.
    pub fn fresh() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

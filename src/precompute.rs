//! Per-point precomputation cache.
//!
//! Window tables are expensive relative to a single multiplication, so each
//! [`ProjectivePoint`](crate::ProjectivePoint) carries one of these and
//! multipliers populate it lazily. Entries are keyed by the strategy
//! identity that built them; distinct configurations never collide.

use crate::{endo::EndoPrecomp, lookup::LookupTable, mul::CombTable};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// Identity of a precomputation: the strategy family plus the parameters
/// that shape its table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrecomputeKey {
    /// Odd-multiple table for windowed-NAF multiplication.
    WNaf {
        /// Window width the table was built for.
        width: u32,
    },
    /// Fixed-point comb table.
    Comb {
        /// Number of teeth per comb column.
        width: u32,
    },
    /// Endomorphism split data (mapped point plus both component tables).
    Endomorphism {
        /// Window width of the per-component tables.
        width: u32,
    },
}

/// Precomputed data stored under a [`PrecomputeKey`].
#[derive(Debug)]
pub enum PrecomputeData {
    /// Odd multiples `1P, 3P, …` for windowed NAF.
    WNaf(LookupTable),
    /// Comb table of spaced-bit combinations.
    Comb(CombTable),
    /// GLV split data.
    Endomorphism(EndoPrecomp),
}

/// Lazily populated, thread-safe map from strategy identity to precomputed
/// data.
///
/// Build-once semantics: the map lock is held for the duration of a build,
/// so concurrent callers asking for the same entry block until the first
/// build publishes and then share the result. Entries are immutable once
/// inserted.
#[derive(Debug, Default)]
pub struct PrecomputeCache {
    entries: Mutex<HashMap<PrecomputeKey, Arc<PrecomputeData>>>,
}

impl PrecomputeCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<PrecomputeKey, Arc<PrecomputeData>>> {
        // A panic mid-build leaves the map without the entry but otherwise
        // intact, so poisoning carries no information here.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up an existing entry without building.
    pub fn get(&self, key: PrecomputeKey) -> Option<Arc<PrecomputeData>> {
        self.lock().get(&key).cloned()
    }

    /// Return the entry for `key`, building and inserting it with `build` if
    /// absent.
    ///
    /// At most one invocation of `build` runs per key per cache, even under
    /// concurrent calls. A failing build inserts nothing; the next caller
    /// retries.
    pub fn get_or_compute<F>(&self, key: PrecomputeKey, build: F) -> crate::Result<Arc<PrecomputeData>>
    where
        F: FnOnce() -> crate::Result<PrecomputeData>,
    {
        let mut entries = self.lock();
        if let Some(existing) = entries.get(&key) {
            return Ok(existing.clone());
        }

        let data = Arc::new(build()?);
        entries.insert(key, data.clone());
        Ok(data)
    }
}

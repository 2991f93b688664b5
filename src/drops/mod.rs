//! Creature drop resolution
//!
//! Data flows one way:
//! ```text
//! [drop_data] → DropCatalog ─┬→ sampling pool (cumulative weights)
//!                            ├→ multi-equip set → per-call expansion
//!                            └→ effective drops
//! [drop_data_global] → GlobalDropMerger → per-region views
//! ```
//! Everything above is owned by one [`DropResolver`] epoch and is dropped
//! wholesale by [`DropResolver::reset`].

mod catalog;
mod global;
pub mod multi_equip;
pub mod pool;
mod resolver;
mod types;

pub use catalog::DropCatalog;
pub use global::GlobalDropMerger;
pub use multi_equip::MultiEquipSet;
pub use resolver::DropResolver;
pub use types::{region_of, CreatureId, DropEntry, GlobalDropEntry, ItemId, MapId, RegionId, MAPS_PER_REGION};

use std::error::Error;

/// Error type for drop table loads
///
/// Never surfaces through the public resolver API; it only decides whether a
/// result may be memoized.
#[derive(Debug, thiserror::Error)]
pub enum DropError {
    #[error("drop store query failed: {0}")]
    Store(#[source] Box<dyn Error + Send + Sync>),
}

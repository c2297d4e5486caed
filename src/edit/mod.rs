//! Region Editing Module
//!
//! Trim, remove and split operations over [`AudioBuffer`](crate::audio::AudioBuffer)s,
//! plus the policy that decides which region they act on.

pub mod region;
pub mod selection;
pub mod splice;

pub use region::Region;
pub use selection::{Selection, default_region, split_region};
pub use splice::{SpliceOp, apply, remove, split, trim};

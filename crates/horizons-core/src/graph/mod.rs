//! Relationships between items in the canonical store.
//!
//! ## Submodules
//!
//! - [`hierarchy`]: cycle-guarded subtree and ancestor walks over
//!   `parent_id`/`child_ids`, and direct-child progress.

pub mod hierarchy;

pub use hierarchy::{Progress, ancestor_ids, descendant_ids, direct_progress, progress};

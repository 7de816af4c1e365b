//! # subsync-engine
//!
//! The sync pipeline: fetch the source subdirectory, extract the commit
//! delta as a patch, replay it onto the target, publish, and record the new
//! high-water mark. [`Pipeline::run`] is the canonical entrypoint; the
//! individual phase methods exist so a driver can frame each phase in CI log
//! groups.

pub mod error;
pub mod patch;
pub mod pipeline;

pub use error::SyncError;
pub use patch::{patch_has_changes, strip_components, PatchOutcome, EMPTY_PATCH_THRESHOLD};
pub use pipeline::{Pipeline, SourceCheckout, SyncOutcome};

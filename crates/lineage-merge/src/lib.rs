//! Merge decision engine for lineage.
//!
//! Merging `target` into `base` first classifies how the two commits relate
//! ([`classify`] → [`MergeDecision`]), then acts on that decision under the
//! caller's [`MergeOptions`] ([`merge`] → [`MergeOutcome`]):
//!
//! | decision              | outcome                                        |
//! |-----------------------|------------------------------------------------|
//! | same commit           | [`MergeOutcome::SameCommit`]                   |
//! | target contains base  | [`MergeOutcome::FastForward`] to the target    |
//! | base contains target  | [`MergeOutcome::AlreadyUpToDate`]              |
//! | unrelated histories   | [`MergeError::NoCommonHistory`]                |
//! | diverged              | true merge, not implemented yet                |
//!
//! The working directory must be clean before anything else is checked.

pub mod decision;
pub mod error;
pub mod merge;
pub mod options;

#[cfg(test)]
pub(crate) mod testutil;

pub use decision::{classify, MergeDecision};
pub use error::{MergeError, MergeResult, Unimplemented};
pub use merge::{merge, MergeOutcome};
pub use options::MergeOptions;

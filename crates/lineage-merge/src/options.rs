//! Caller-controlled merge behaviour.

use serde::{Deserialize, Serialize};

/// Options for a single merge.
///
/// Every flag defaults to `false`; an empty or absent `commit_message`
/// means the default message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Refuse to merge when histories have diverged.
    pub fast_forward_only: bool,
    /// Create a merge commit even when a fast-forward is possible.
    pub force_merge_commit: bool,
    /// Stop before creating the merge commit.
    pub no_commit: bool,
    /// Permit merging commits that share no history.
    pub allow_unrelated_histories: bool,
    /// Message for the merge commit.
    pub commit_message: Option<String>,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fast_forward_only(mut self, yes: bool) -> Self {
        self.fast_forward_only = yes;
        self
    }

    pub fn force_merge_commit(mut self, yes: bool) -> Self {
        self.force_merge_commit = yes;
        self
    }

    pub fn no_commit(mut self, yes: bool) -> Self {
        self.no_commit = yes;
        self
    }

    pub fn allow_unrelated_histories(mut self, yes: bool) -> Self {
        self.allow_unrelated_histories = yes;
        self
    }

    pub fn commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// The message override, if one was given and is non-empty.
    pub fn message_override(&self) -> Option<&str> {
        self.commit_message.as_deref().filter(|m| !m.is_empty())
    }
}

//! Working directory status for lineage.
//!
//! The merge layer only needs one answer from the working directory: is it
//! clean? [`WorktreeStatus`] is that seam. [`WorkdirStatus`] is a computed
//! report that answers it directly, and [`Workdir`] scans the filesystem
//! on demand.

pub mod error;
pub mod scan;
pub mod status;

pub use error::{WorktreeError, WorktreeResult};
pub use scan::{flatten_tree, scan_workdir, Workdir, METADATA_DIR};
pub use status::{WorkdirStatus, WorktreeStatus};

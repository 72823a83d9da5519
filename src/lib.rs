//! dirpick - hierarchical directory selection
//!
//! A checkbox tree over a directory hierarchy where selecting a directory
//! stands for its whole subtree, exceptions can be carved out anywhere below,
//! and membership can be asked for paths that were never listed.

pub mod error;
pub mod file_scanner;
pub mod scan_plan;
pub mod selection;
pub mod tree_builder;
pub mod tui;

// Re-exports for convenience
pub use error::{InvalidPathError, InvalidPathReason};
pub use scan_plan::ScanPlan;
pub use selection::{DirPath, SelectionSet, SharedSelection, TriState};
pub use tui::DirTree;

//! Tri-state hierarchical directory selection.
//!
//! A selected directory stands for its whole subtree without listing it, and
//! exceptions below it are carved out by the caller through further state
//! changes. All tree-shaped reasoning (which children exist, when siblings agree)
//! lives in the tree adapter; this module only keeps the minimal set of entries.

mod path;
mod set;
mod shared;

pub use path::DirPath;
pub use set::{SelectionSet, TriState};
pub use shared::SharedSelection;

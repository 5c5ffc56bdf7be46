//! Widgets for the explorer panel: the tree, the context-menu overlay,
//! and the confirm-dialog overlay.

pub mod dialog;
pub mod menu;
pub mod tree;

//! The tree-state engine behind the explorer panel: snapshot model,
//! expansion/selection state, context-menu state machine, confirm gate,
//! row derivation, and the snapshot source.

pub mod actions;
pub mod confirm;
pub mod icons;
pub mod menu;
pub mod model;
pub mod rows;
pub mod source;
pub mod state;

//! Linear undo/redo history of committed snapshots.

pub(crate) mod stack;

//! Edit parameters and the per-tool pending edit state.

pub(crate) mod model;
pub(crate) mod state;

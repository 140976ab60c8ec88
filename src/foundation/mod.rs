//! Shared primitives: pixel buffers, error taxonomy and fixed-point helpers.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;

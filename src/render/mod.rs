//! Commit engines: each turns the present snapshot plus pending parameters into the next one.

pub(crate) mod crop;
pub(crate) mod layers;
pub(crate) mod text;
pub(crate) mod transform;

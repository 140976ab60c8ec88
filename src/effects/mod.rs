//! Pixel kernels: CSS-style color filters, gaussian blur and separable blend modes.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod filters;

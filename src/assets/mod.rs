//! Image codecs, color parsing and font resolution.

pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod fonts;

//! JSON edit scripts replayed through an editing session.

pub(crate) mod model;
pub(crate) mod run;

//! Editing session: tool state machine, history ownership and the AI service boundary.

pub(crate) mod editor;
pub(crate) mod service;

//! Tab content renderers.

pub mod grades;
pub mod members;

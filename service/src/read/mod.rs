//! Read entities definitions.

pub mod project;

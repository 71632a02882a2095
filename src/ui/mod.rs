//! Terminal and CI output helpers

pub mod json;

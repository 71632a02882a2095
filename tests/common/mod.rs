//! Common test utilities for weft CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated repository in a temp directory plus CLI helpers
//! - Fixtures: Reusable workflow document builders

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;

//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Integer geometry for element placement and hit-testing
//! - Logging utilities

pub mod math;
pub mod logging;

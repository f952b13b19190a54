//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the viewer:
//! - Math types and matrix builders
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;

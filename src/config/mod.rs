//! Configuration module for storymap
//!
//! This module handles user preferences, their serialization to JSON, and
//! persistent storage in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;

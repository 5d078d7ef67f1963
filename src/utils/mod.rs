//! Utility functions for file handling and text scanning

pub mod file_utils;
pub mod text;

// Re-export commonly used utility functions for convenience
pub use file_utils::*;

//! Utility functions for VaultGraph Core
//!
//! This module provides common utility functions used across the codebase.

mod glob;

pub use glob::glob_match;

//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `roomcast` application.
//!
//! This module centralizes reusable components, such as logging setup and
//! custom error types, to promote code consistency and reduce duplication.

pub mod error;
pub mod logging;

//! # Transtag Common
//!
//! Shared types, reserved names and test fixtures for transtag.
//!
//! This crate provides the foundational types used across the translator,
//! the template engine and the translation directives.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use types::*;
pub use utils::*;

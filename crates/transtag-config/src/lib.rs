//! # Transtag Config
//!
//! Configuration for the transtag command line tool.
//!
//! This crate provides the TOML schema with defaults for every field,
//! loading with environment overrides, validation and atomic saving.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;

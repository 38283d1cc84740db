//! # Transtag CLI
//!
//! Command line front end for transtag.
//!
//! Loads the configuration, builds the locale table from the configured
//! directory, registers the translation directives and renders template
//! files or lists the available languages.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::*;
pub use commands::*;
pub use error::*;
pub use logging::*;

//! Command line arguments.

use crate::error::CliError;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use transtag_config::DEFAULT_CONFIG_FILE;

/// Render templates with gettext translation directives
#[derive(Parser, Debug)]
#[command(name = "transtag", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TRANSTAG_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template file to stdout
    Render(RenderArgs),
    /// List the languages in the locale table
    Languages,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of `render`
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Template file
    pub template: PathBuf,

    /// Language code, overrides the configured one
    #[arg(short, long)]
    pub language: Option<String>,

    /// Catalog domain, overrides the configured one
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Template variable; JSON values are decoded, anything else is a string
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, Value)>,
}

/// Parse `KEY=VALUE`.
///
/// `n=3` binds a number and `flags=[1,2]` an array, while `name=Ada` is
/// kept as the string `"Ada"`.
pub fn parse_var(arg: &str) -> Result<(String, Value), CliError> {
    let (key, value) = arg
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| CliError::InvalidVar(arg.to_string()))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

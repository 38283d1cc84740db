//! The `render`, `languages` and `init` subcommands.

use crate::cli::RenderArgs;
use crate::error::{CliError, CliResult};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use transtag_common::{LanguageInfo, DOMAIN_KEY, LANGUAGE_KEY};
use transtag_config::{Config, ConfigLoader, ConfigValidator};
use transtag_i18n::{TemplateTranslator, Translator};
use transtag_template::{Context, Engine};

/// An engine with `trans` and `blocktrans` bound to `translator`
pub fn build_engine(translator: Arc<dyn Translator>) -> CliResult<Arc<Engine>> {
    let mut engine = Engine::new();
    transtag_tags::register(&mut engine, translator)?;
    Ok(Arc::new(engine))
}

/// Load the locale table configured in `config`
pub fn load_translator(config: &Config) -> CliResult<TemplateTranslator> {
    let translator = TemplateTranslator::from_dir(&config.locales.dir)?;
    info!(
        dir = %config.locales.dir.display(),
        languages = translator.languages().len(),
        "Loaded locale table"
    );
    Ok(translator)
}

/// The public scope for a render: the `--var` values, then `_language` and
/// `_domain` from the flags or the configuration
pub fn render_scope(config: &Config, args: &RenderArgs) -> CliResult<Context> {
    let language = args.language.as_deref().unwrap_or(&config.render.language);
    ConfigValidator::validate_language(language)?;
    let domain = args.domain.as_deref().unwrap_or(&config.render.domain);

    let mut scope: Context = args.vars.iter().cloned().collect();
    scope.insert(LANGUAGE_KEY.to_string(), Value::from(language));
    scope.insert(DOMAIN_KEY.to_string(), Value::from(domain));
    Ok(scope)
}

/// Render the template named in `args`
pub fn render(config: &Config, args: &RenderArgs) -> CliResult<String> {
    let source = fs::read_to_string(&args.template)?;
    let scope = render_scope(config, args)?;
    let engine = build_engine(Arc::new(load_translator(config)?))?;

    debug!(template = %args.template.display(), "Rendering template");
    let output = engine.render_string(&source, scope)?;
    Ok(output)
}

/// Every language in the configured locale table
pub fn languages(config: &Config) -> CliResult<Vec<LanguageInfo>> {
    Ok(load_translator(config)?.language_info())
}

/// Write the default configuration through `loader`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init(loader: &ConfigLoader, force: bool) -> CliResult<&Path> {
    let path = loader.path();
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }
    loader.save(&Config::default())?;
    Ok(path)
}

use std::path::Path;

use tracing::instrument;

use crate::{
    encoding::{self, Encoding},
    error::Result,
    format::{self, LatexFormatter},
    lexer::Language,
    options::Options,
    style::StyleRegistry,
};

pub mod config;
pub mod request;
pub mod snippets;
pub mod wrap;

use config::Config;

/// Highlights a source file. The language comes from `options.lang` when
/// `detect` is off, from the file extension otherwise.
///
/// `options` are used as given: callers layer the `Coder.toml` defaults
/// under their own options beforehand. `config` only supplies the styles.
#[instrument(level = "debug", skip(options, config))]
pub fn highlight_file(
    path: &Path,
    options: &Options,
    config: &Config,
    detect: bool,
    full: bool,
) -> Result<String> {
    let mut options = options.clone();
    if detect {
        options.lang = Language::from_path(path)?.name().to_string();
    }
    let requested: Encoding = options.encoding.parse()?;
    let (text, used) = encoding::read_source(path, requested)?;
    if requested == Encoding::Guess {
        options.encoding = used.to_string();
    }

    let registry = StyleRegistry::from_config(config)?;
    let style = registry.get(&options.style)?;
    let formatted = format::highlight(&text, &options, style)?;
    if full {
        LatexFormatter::new(&options, style).full_document(&formatted)
    } else {
        Ok(formatted.verbatim())
    }
}

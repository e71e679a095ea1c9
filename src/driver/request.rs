//! JSON highlighting requests sent by the TeX engine.
//!
//! A request carries one piece of code and its options. The answer is a
//! pair of files in a `.pygd` directory, a style file and the highlighted
//! code, plus commands printed on stdout for the engine to execute.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use super::config::Config;
use crate::{
    error::{Error, Result},
    format::{self, Formatted, to_expl3},
    options::{Options, loose_bool},
    style::{Style, StyleRegistry},
};

const SHARED: &str = "SHARED";
const DIRECTORY_EXTENSION: &str = "pygd";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Request {
    pub code: String,
    /// Overrides `options.lang`.
    pub lang: Option<String>,
    #[serde(deserialize_with = "loose_bool")]
    pub inline: bool,
    /// Reuse files already in the output directory.
    #[serde(deserialize_with = "loose_bool")]
    pub cache: bool,
    /// The request file itself, used to name the output directory.
    pub json: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub options: Map<String, Value>,
}

/// A line the TeX engine reads back from our stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Tex(String),
    Lua(String),
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::Tex(command) => write!(f, "<<<<<?TEX:{command}>>>>>"),
            HostCommand::Lua(command) => write!(f, "<<<<<!LUA:{command}>>>>>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub directory: PathBuf,
    /// `None` when the engine already has the style.
    pub style_file: Option<PathBuf>,
    /// `None` when the request has no code.
    pub code_file: Option<PathBuf>,
    /// The code file was already there.
    pub cached: bool,
    pub commands: Vec<HostCommand>,
}

impl Request {
    pub fn from_json(text: &str) -> Result<Request> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a request file. Its own path stands in for a missing `json`.
    pub fn from_file(path: &Path) -> Result<Request> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut request = Request::from_json(&text)?;
        if request.json.is_none() {
            request.json = Some(path.to_path_buf());
        }
        Ok(request)
    }

    /// The request options over the configured defaults.
    pub fn resolve_options(&self, config: &Config) -> Result<Options> {
        let canonical = |key: &str| match key {
            "sty" => "style".to_string(),
            _ => key.to_string(),
        };
        let mut merged = Map::new();
        for (key, value) in &config.defaults {
            merged.insert(canonical(key), serde_json::to_value(value)?);
        }
        for (key, value) in &self.options {
            merged.insert(canonical(key), value.clone());
        }
        if let Some(lang) = &self.lang {
            merged.insert("lang".to_string(), Value::String(lang.clone()));
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// `directory`, else `<json dir>/<json stem>`, else `SHARED`, resolved
    /// against `cwd` and given the `.pygd` extension.
    pub fn output_directory(&self, cwd: &Path) -> PathBuf {
        let from_json = || {
            let json = self.json.as_ref()?;
            Some(json.with_file_name(json.file_stem()?))
        };
        let directory = match &self.directory {
            Some(directory) if !directory.as_os_str().is_empty() => directory.clone(),
            _ => from_json().unwrap_or_else(|| PathBuf::from(SHARED)),
        };
        cwd.join(directory).with_extension(DIRECTORY_EXTENSION)
    }

    /// The cache key: a digest of everything that changes the output.
    pub fn digest(&self, options: &Options) -> Result<String> {
        let key = serde_json::to_vec(&(&self.code, self.inline, options))?;
        Ok(blake3::hash(&key).to_hex().to_string())
    }
}

/// The `.pyg.sty` contents: the style macros in expl3 spelling, stored with
/// `\CDR_style_gset:nn`.
pub fn style_file(style: &Style, prefix: &str) -> String {
    let defs = format::style_defs(style, prefix)
        .replace(r"\makeatletter", "")
        .replace(r"\makeatother", "")
        .replace('\n', "%\n");
    format!(
        "%\n\\ExplSyntaxOn\n\\makeatletter\n\\CDR_style_gset:nn {{{name}}} {{%\n{defs}%\n}}%\n\\makeatother\n\\ExplSyntaxOff\n",
        name = style.name(),
        defs = to_expl3(&defs),
    )
}

fn inline_code(formatted: &Formatted, style: &Style) -> String {
    format!(
        "\\bgroup\n\\CDRCode@Prepare:n {{{}}}%\n{}%\n\\egroup\n",
        style.name(),
        formatted.lines.join("\n")
    )
}

fn block_code(formatted: &Formatted, options: &Options, style: &Style) -> String {
    let (lines, numbers) =
        format::number_lines(&formatted.lines, options, |n| format!(r"\CDR_lineno:n{{{n}}}"));
    format!(
        "%\n\\begin{{CDR/block/engine/{name}}}\n\\CDRBlock@linenos@used:n {{{numbers}}}%\n{header}\n{lines}\n{footer}\n%\n\\end{{CDR/block/engine/{name}}}\n",
        name = style.name(),
        numbers = itertools::join(numbers, ","),
        header = formatted.header,
        lines = lines.join("\n"),
        footer = formatted.footer,
    )
}

/// Highlights the request code, in inline or block form.
pub fn pygmentize(code: &str, inline: bool, options: &Options, style: &Style) -> Result<String> {
    let mode = if inline { "Code" } else { "Block" };
    let options = Options {
        envname: format!("CDR@Pyg@{mode}"),
        ..options.clone()
    };
    let formatted = format::highlight(code, &options, style)?;
    Ok(if inline {
        inline_code(&formatted, style)
    } else {
        block_code(&formatted, &options, style)
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Processes `request`, writing into its output directory.
#[instrument(level = "debug", skip_all, fields(inline = request.inline, cache = request.cache))]
pub fn process(request: &Request, config: &Config, cwd: &Path) -> Result<Outcome> {
    let options = request.resolve_options(config)?;
    let registry = StyleRegistry::from_config(config)?;
    let style = registry.get(&options.style)?;

    let directory = request.output_directory(cwd);
    std::fs::create_dir_all(&directory).map_err(|source| Error::Write {
        path: directory.clone(),
        source,
    })?;
    tracing::debug!(directory = %directory.display(), "output directory");

    let style_file = if options.already_style {
        None
    } else {
        let path = directory.join(format!("{}.pyg.sty", style.name()));
        if request.cache && path.exists() {
            tracing::info!(path = %path.display(), "style already available");
        } else {
            write_file(&path, &style_file(style, &options.commandprefix))?;
        }
        Some(path)
    };

    let mut outcome = Outcome {
        directory: directory.clone(),
        style_file,
        code_file: None,
        cached: false,
        commands: Vec::new(),
    };
    if request.code.is_empty() {
        return Ok(outcome);
    }

    let code_path = directory.join(format!("{}.pyg.tex", request.digest(&options)?));
    if request.cache && code_path.exists() {
        tracing::info!(path = %code_path.display(), "code already available");
        outcome.cached = true;
    } else {
        let code = pygmentize(&request.code, request.inline, &options, style)?;
        write_file(
            &code_path,
            &format!("% -*- mode: latex -*-\n\\makeatletter\n{code}\\makeatother\n"),
        )?;
    }

    outcome.commands.push(HostCommand::Tex(format!(
        "%\n\\CDR_remove:n {{colored:}}%\n\\input {{ \\tl_to_str:n {{{}}} }}%\n\\CDR:n {{colored:}}%\n",
        code_path.display()
    )));
    let shared = directory.file_stem().is_some_and(|stem| stem == SHARED);
    if !shared {
        let style_name = format!("{}.pyg.sty", style.name());
        let code_name = code_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        outcome.commands.push(HostCommand::Lua(format!(
            "CDR:cache_record('{style_name}','{code_name}')"
        )));
    }
    outcome.code_file = Some(code_path);
    Ok(outcome)
}

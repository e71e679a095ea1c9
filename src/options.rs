//! Highlighting options.
//!
//! Options reach the highlighter from three places: JSON requests, the
//! `key=value, flag` lines of snippet files, and the `[defaults]` table of
//! `Coder.toml`. TeX front ends tend to send everything as strings, so the
//! deserializers accept `"true"`, `"2"` and friends wherever a boolean or an
//! integer is expected.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{Error, Result},
    lexer::Language,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub lang: String,
    #[serde(alias = "sty")]
    pub style: String,
    /// Two characters delimiting raw LaTeX inside the code, e.g. `||`.
    pub escapeinside: String,
    #[serde(deserialize_with = "loose_usize")]
    pub gobble: usize,
    #[serde(deserialize_with = "loose_usize")]
    pub tabsize: usize,
    #[serde(deserialize_with = "loose_bool")]
    pub texcomments: bool,
    #[serde(deserialize_with = "loose_bool")]
    pub mathescape: bool,
    #[serde(deserialize_with = "loose_bool")]
    pub linenos: bool,
    #[serde(deserialize_with = "loose_usize")]
    pub linenostart: usize,
    #[serde(deserialize_with = "loose_usize")]
    pub linenostep: usize,
    pub linenosep: String,
    pub encoding: String,
    pub verboptions: String,
    pub commandprefix: String,
    /// The verbatim environment the formatter opens.
    pub envname: String,
    /// The style definitions are already loaded on the TeX side.
    #[serde(deserialize_with = "loose_bool")]
    pub already_style: bool,
    pub docclass: String,
    pub preamble: String,
    pub title: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lang: "c".to_string(),
            style: "default".to_string(),
            escapeinside: String::new(),
            gobble: 0,
            tabsize: 4,
            texcomments: false,
            mathescape: false,
            linenos: false,
            linenostart: 1,
            linenostep: 1,
            linenosep: "0pt".to_string(),
            encoding: "guess".to_string(),
            verboptions: String::new(),
            commandprefix: "PY".to_string(),
            envname: "Verbatim".to_string(),
            already_style: false,
            docclass: "article".to_string(),
            preamble: String::new(),
            title: String::new(),
        }
    }
}

impl Options {
    pub fn language(&self) -> Result<Language> {
        self.lang.parse()
    }

    /// The escape delimiters, when `escapeinside` is exactly two characters.
    pub fn escape_delimiters(&self) -> Option<(char, char)> {
        let mut chars = self.escapeinside.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(left), Some(right), None) => Some((left, right)),
            _ => None,
        }
    }

    /// Line numbers are printed every `linenostep` lines; zero counts as one.
    pub fn line_step(&self) -> usize {
        self.linenostep.max(1)
    }

    /// Sets one option from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || parse_usize(value).ok_or_else(invalid);

        match key {
            "lang" => self.lang = value.to_string(),
            "style" | "sty" => self.style = value.to_string(),
            "escapeinside" => self.escapeinside = value.to_string(),
            "gobble" => self.gobble = number()?,
            "tabsize" => self.tabsize = number()?,
            "texcomments" => self.texcomments = is_truthy(value),
            "mathescape" => self.mathescape = is_truthy(value),
            "linenos" => self.linenos = is_truthy(value),
            "linenostart" => self.linenostart = number()?,
            "linenostep" => self.linenostep = number()?,
            "linenosep" => self.linenosep = value.to_string(),
            "encoding" => self.encoding = value.to_string(),
            "verboptions" => self.verboptions = value.to_string(),
            "commandprefix" => self.commandprefix = value.to_string(),
            "envname" => self.envname = value.to_string(),
            "already_style" => self.already_style = is_truthy(value),
            "docclass" => self.docclass = value.to_string(),
            "preamble" => self.preamble = value.to_string(),
            "title" => self.title = value.to_string(),
            _ => tracing::warn!(key, value, "ignoring unknown option"),
        }
        Ok(())
    }

    /// Layers a `key=value, flag, ...` option line over these options.
    ///
    /// A bare `flag` means `flag=true`. Items with more than one `=` or an
    /// empty side are skipped.
    pub fn parse_opts(&self, line: &str) -> Result<Options> {
        let mut options = self.clone();
        for item in line.split(',') {
            let parts: Vec<&str> = item.split('=').map(str::trim).collect();
            match parts.as_slice() {
                [key, value] if !key.is_empty() && !value.is_empty() => options.set(key, value)?,
                [flag] if !flag.is_empty() => options.set(flag, "true")?,
                _ => {}
            }
        }
        Ok(options)
    }
}

/// `true` when the first non-blank character is `t`, `T`, `y` or `Y`.
pub fn is_truthy(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('t' | 'T' | 'y' | 'Y'))
}

/// Parses an integer, negative values being made absolute.
fn parse_usize(text: &str) -> Option<usize> {
    let number: i64 = text.trim().parse().ok()?;
    usize::try_from(number.unsigned_abs()).ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

pub(crate) fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Bool(value) => value,
        Loose::Int(value) => value != 0,
        Loose::Float(value) => value != 0.0,
        Loose::Text(text) => is_truthy(&text),
    })
}

fn loose_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    use serde::de::Error as _;

    match Loose::deserialize(deserializer)? {
        Loose::Int(value) => usize::try_from(value.unsigned_abs()).map_err(D::Error::custom),
        Loose::Float(value) => Ok(value.abs().trunc() as usize),
        Loose::Text(text) => {
            parse_usize(&text).ok_or_else(|| D::Error::custom(format!("{text:?} is not an integer")))
        }
        Loose::Bool(value) => Err(D::Error::custom(format!("expected an integer, got {value}"))),
    }
}

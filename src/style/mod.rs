//! Highlighting styles.
//!
//! A style maps token kinds to rules such as `"bold #008000"`. Rules are
//! inherited down the token tree: `Keyword.Type` starts from whatever
//! `Keyword` resolved to and then applies its own words.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use tracing::instrument;

use crate::{
    driver::config::{Config, StyleConfig},
    error::{Error, Result},
    lexer::TokenKind,
};

mod builtin;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse(text: &str) -> Option<Rgb> {
        let hex = text.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        match hex.len() {
            3 => {
                let mut doubled = hex.chars().map(|c| format!("{c}{c}"));
                Some(Rgb(
                    channel(&doubled.next()?)?,
                    channel(&doubled.next()?)?,
                    channel(&doubled.next()?)?,
                ))
            }
            6 => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }
}

/// Formats as the `[rgb]` triple of xcolor, `0.73,0.73,0.73`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = *self;
        write!(
            f,
            "{:.2},{:.2},{:.2}",
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Roman,
    Sans,
    Mono,
}

/// The fully inherited style of one token kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStyle {
    pub color: Option<Rgb>,
    pub bgcolor: Option<Rgb>,
    pub border: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font: Option<Font>,
}

impl TokenStyle {
    pub fn is_plain(&self) -> bool {
        *self == TokenStyle::default()
    }

    fn apply(&mut self, style: &str, rule: &str) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidStyleRule {
            style: style.to_string(),
            rule: rule.to_string(),
            reason: reason.to_string(),
        };
        let color = |text: &str| -> Result<Option<Rgb>> {
            if text.is_empty() {
                Ok(None)
            } else {
                Rgb::parse(text)
                    .map(Some)
                    .ok_or_else(|| invalid(&format!("bad color {text:?}")))
            }
        };

        for word in rule.split_whitespace() {
            match word {
                "noinherit" => *self = TokenStyle::default(),
                "inherit" => {}
                "bold" => self.bold = true,
                "nobold" => self.bold = false,
                "italic" => self.italic = true,
                "noitalic" => self.italic = false,
                "underline" => self.underline = true,
                "nounderline" => self.underline = false,
                "roman" => self.font = Some(Font::Roman),
                "sans" => self.font = Some(Font::Sans),
                "mono" => self.font = Some(Font::Mono),
                _ => {
                    if let Some(value) = word.strip_prefix("bg:") {
                        self.bgcolor = color(value)?;
                    } else if let Some(value) = word.strip_prefix("border:") {
                        self.border = color(value)?;
                    } else if word.starts_with('#') {
                        self.color = color(word)?;
                    } else {
                        return Err(invalid(&format!("unknown word {word:?}")));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Style {
    name: String,
    background: Option<Rgb>,
    rules: BTreeMap<TokenKind, String>,
    resolved: HashMap<TokenKind, TokenStyle>,
}

impl Style {
    pub fn new(
        name: &str,
        background: Option<Rgb>,
        rules: BTreeMap<TokenKind, String>,
    ) -> Result<Style> {
        let mut resolved = HashMap::new();
        for kind in TokenKind::ALL {
            resolve(name, kind, &rules, &mut resolved)?;
        }
        Ok(Style {
            name: name.to_string(),
            background,
            rules,
            resolved,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Option<Rgb> {
        self.background
    }

    pub fn token_style(&self, kind: TokenKind) -> &TokenStyle {
        &self.resolved[&kind]
    }

    /// Starts a new style from this one and layers the configured overrides.
    fn derive(&self, name: &str, config: &StyleConfig) -> Result<Style> {
        let mut rules = self.rules.clone();
        for (path, rule) in &config.tokens {
            rules
                .entry(TokenKind::from_path(path)?)
                .and_modify(|base| {
                    base.push(' ');
                    base.push_str(rule);
                })
                .or_insert_with(|| rule.clone());
        }
        let background = match &config.background {
            Some(text) => Some(Rgb::parse(text).ok_or_else(|| Error::InvalidStyleRule {
                style: name.to_string(),
                rule: text.clone(),
                reason: "bad background color".to_string(),
            })?),
            None => self.background,
        };
        Style::new(name, background, rules)
    }
}

fn resolve(
    name: &str,
    kind: TokenKind,
    rules: &BTreeMap<TokenKind, String>,
    resolved: &mut HashMap<TokenKind, TokenStyle>,
) -> Result<TokenStyle> {
    if let Some(style) = resolved.get(&kind) {
        return Ok(style.clone());
    }
    let mut style = match kind.parent() {
        Some(parent) => resolve(name, parent, rules, resolved)?,
        None => TokenStyle::default(),
    };
    if let Some(rule) = rules.get(&kind) {
        style.apply(name, rule)?;
    }
    resolved.insert(kind, style.clone());
    Ok(style)
}

/// The styles available by name: the builtin ones plus the configured ones.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: HashMap<String, Style>,
}

impl StyleRegistry {
    pub fn builtin() -> StyleRegistry {
        let styles = builtin::BUILTINS
            .iter()
            .map(|builtin| {
                let rules = builtin
                    .rules
                    .iter()
                    .map(|(kind, rule)| (*kind, rule.to_string()))
                    .collect();
                let background = builtin.background.and_then(Rgb::parse);
                let style = Style::new(builtin.name, background, rules)
                    .expect("builtin styles are valid");
                (builtin.name.to_string(), style)
            })
            .collect();
        StyleRegistry { styles }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn from_config(config: &Config) -> Result<StyleRegistry> {
        let mut registry = StyleRegistry::builtin();
        let mut defined = HashSet::new();
        for name in config.styles.keys() {
            registry.define(name, config, &mut Vec::new(), &mut defined)?;
        }
        Ok(registry)
    }

    fn define(
        &mut self,
        name: &str,
        config: &Config,
        visiting: &mut Vec<String>,
        defined: &mut HashSet<String>,
    ) -> Result<()> {
        let Some(style_config) = config.styles.get(name) else {
            return self.get(name).map(|_| ());
        };
        if defined.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|style| style == name) {
            return Err(Error::StyleCycle {
                style: name.to_string(),
            });
        }

        visiting.push(name.to_string());
        let base = match &style_config.inherit {
            Some(parent) => {
                self.define(parent, config, visiting, defined)?;
                self.get(parent)?.clone()
            }
            None => Style::new(name, None, BTreeMap::new())?,
        };
        visiting.pop();

        let style = base.derive(name, style_config)?;
        tracing::debug!(style = name, inherit = ?style_config.inherit, "defined style");
        self.styles.insert(name.to_string(), style);
        defined.insert(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Style> {
        self.styles
            .get(name)
            .ok_or_else(|| Error::StyleNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::builtin()
    }
}

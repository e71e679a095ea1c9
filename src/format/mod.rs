//! LaTeX output for token streams.
//!
//! The formatter produces a `fancyvrb` verbatim environment with
//! `commandchars=\\\{\}` so that every styled token can be written as a
//! macro call, `\PY{k+kt}{int}`. The macros themselves come from
//! [`style_defs`].

use std::fmt::Write;

use tracing::instrument;

use crate::{
    encoding::Encoding,
    error::Result,
    lexer::{self, Lexeme, TokenKind},
    options::Options,
    style::Style,
};

mod escape;
mod template;

pub use escape::{escape_tex, to_expl3};
pub use template::{embeddable_style_defs, style_defs};

/// A highlighted block, split so callers can rework the body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// `\begin{<envname>}[...]`
    pub header: String,
    pub lines: Vec<String>,
    /// `\end{<envname>}`
    pub footer: String,
}

impl Formatted {
    /// The complete verbatim environment.
    pub fn verbatim(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.header,
            self.lines.join("\n"),
            self.footer
        )
    }
}

pub struct LatexFormatter<'a> {
    options: &'a Options,
    style: &'a Style,
}

impl<'a> LatexFormatter<'a> {
    pub fn new(options: &'a Options, style: &'a Style) -> Self {
        Self { options, style }
    }

    pub fn style(&self) -> &Style {
        self.style
    }

    fn prefix(&self) -> &str {
        &self.options.commandprefix
    }

    pub fn header(&self) -> String {
        let options = self.options;
        let mut header = format!(r"\begin{{{}}}[commandchars=\\\{{\}}", options.envname);
        if options.linenos {
            header.push_str(",numbers=left");
            if options.linenostart > 0 {
                let _ = write!(header, ",firstnumber={}", options.linenostart);
            }
            if options.linenostep > 0 {
                let _ = write!(header, ",stepnumber={}", options.linenostep);
            }
            if !options.linenosep.is_empty() {
                let _ = write!(header, ",numbersep={}", options.linenosep);
            }
        }
        if options.mathescape || options.texcomments || options.escape_delimiters().is_some() {
            header.push_str(r",codes={\catcode`\$=3\catcode`\^=7\catcode`\_=8}");
        }
        if !options.verboptions.is_empty() {
            header.push(',');
            header.push_str(&options.verboptions);
        }
        header.push(']');
        header
    }

    pub fn footer(&self) -> String {
        format!(r"\end{{{}}}", self.options.envname)
    }

    fn escape_comment(&self, value: &str) -> String {
        let prefix = self.prefix();
        if self.options.texcomments {
            escape::escape_tex_comment(value, prefix)
        } else if self.options.mathescape {
            escape::escape_outside_math(value, prefix)
        } else if let Some((left, right)) = self.options.escape_delimiters() {
            escape::escape_outside_delimiters(value, left, right, prefix)
        } else {
            escape_tex(value, prefix)
        }
    }

    fn write_lexeme(&self, out: &mut String, lexeme: &Lexeme<'_>) {
        let value = if lexeme.kind.is_comment() {
            self.escape_comment(lexeme.text)
        } else if lexeme.kind == TokenKind::Escape {
            lexeme.text.to_string()
        } else {
            escape_tex(lexeme.text, self.prefix())
        };

        let chain = lexeme.kind.style_chain();
        if chain.is_empty() {
            out.push_str(&value);
            return;
        }
        let mut pieces = value.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                let _ = write!(out, r"\{}{{{chain}}}{{{piece}}}", self.prefix());
            }
            if pieces.peek().is_some() {
                out.push('\n');
            }
        }
    }

    /// Formats the lexemes of a prepared text (one ending with a newline).
    pub fn format(&self, lexemes: &[Lexeme<'_>]) -> Formatted {
        let mut body = String::new();
        for lexeme in lexemes {
            self.write_lexeme(&mut body, lexeme);
        }
        let body = body.strip_suffix('\n').unwrap_or(&body);
        Formatted {
            header: self.header(),
            lines: body.split('\n').map(str::to_string).collect(),
            footer: self.footer(),
        }
    }

    /// A standalone document around the formatted block.
    pub fn full_document(&self, formatted: &Formatted) -> Result<String> {
        let encoding: Encoding = self.options.encoding.parse()?;
        let styledefs = style_defs(self.style, self.prefix());
        let code = formatted.verbatim();
        Ok(template::document(&template::DocumentParts {
            docclass: &self.options.docclass,
            preamble: &self.options.preamble,
            title: &self.options.title,
            encoding: encoding.inputenc(),
            styledefs: &styledefs,
            code: &code,
        }))
    }
}

/// Rewrites body lines for display inside a TeX macro: spaces become `~`
/// (a leading one `\vphantom{Xy}~`) and, with `linenos`, every
/// `linenostep`-th line is prefixed by `lineno(n)`.
///
/// Returns the lines and the line numbers that were printed.
pub fn number_lines(
    lines: &[String],
    options: &Options,
    lineno: impl Fn(usize) -> String,
) -> (Vec<String>, Vec<usize>) {
    let step = options.line_step();
    let mut numbers = Vec::new();
    let mut out = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let mut line = match line.strip_prefix(' ') {
            Some(rest) => format!(r"\vphantom{{Xy}}~{}", rest.replace(' ', "~")),
            None => line.replace(' ', "~"),
        };
        if options.linenos && index % step == 0 {
            let counter = options.linenostart + index;
            line.insert_str(0, &lineno(counter));
            numbers.push(counter);
        }
        out.push(line);
    }
    (out, numbers)
}

/// Prepares, tokenizes and formats `text` according to `options`.
#[instrument(level = "debug", skip(text, style), fields(style = style.name()))]
pub fn highlight(text: &str, options: &Options, style: &Style) -> Result<Formatted> {
    let language = options.language()?;
    let text = lexer::prepare(text, options.gobble, options.tabsize);
    let lexemes = match options.escape_delimiters() {
        Some((left, right)) => lexer::tokenize_escaped(language, &text, left, right),
        None => lexer::tokenize(language, &text),
    };
    let formatted = LatexFormatter::new(options, style).format(&lexemes);
    tracing::debug!(lines = formatted.lines.len(), "highlighted");
    Ok(formatted)
}

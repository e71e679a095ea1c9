//! LaTeX annotations embedded in source files.
//!
//! In C they are block comments opening with `/*!latex:`, in Python
//! triple-quoted strings opening with `!latex:`. The body is LaTeX and may
//! open with `\begin{coder}{Title}`.

use std::ops::Range;

use crate::lexer::{self, Language, Lexeme};

const MARKER: &str = "!latex:";
const CODER_ENV: &str = r"\begin{coder}{";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Byte span of the whole comment or string.
    pub span: Range<usize>,
    /// 1-based line the annotation starts on.
    pub line: usize,
    pub body: String,
    pub title: Option<String>,
}

fn c_body(text: &str) -> Option<&str> {
    text.strip_prefix("/*")?
        .strip_prefix(MARKER)?
        .strip_suffix("*/")
}

fn python_body(text: &str) -> Option<&str> {
    ["'''", "\"\"\""].into_iter().find_map(|quote| {
        text.strip_prefix(quote)?
            .strip_prefix(MARKER)?
            .strip_suffix(quote)
    })
}

fn body_of<'src>(language: Language, lexeme: &Lexeme<'src>) -> Option<&'src str> {
    match language {
        Language::C if lexeme.kind.is_comment() => c_body(lexeme.text),
        Language::Python if lexeme.kind.is_string() => python_body(lexeme.text),
        _ => None,
    }
}

fn title_of(body: &str) -> Option<String> {
    let rest = body.strip_prefix(CODER_ENV)?;
    let end = rest.find('}')?;
    Some(rest[..end].to_string())
}

/// Every annotation of `text`, in source order.
pub fn extract(language: Language, text: &str) -> Vec<Annotation> {
    lexer::tokenize(language, text)
        .iter()
        .filter_map(|lexeme| {
            let body = body_of(language, lexeme)?.trim();
            Some(Annotation {
                span: lexeme.offset..lexeme.end(),
                line: text[..lexeme.offset].matches('\n').count() + 1,
                body: body.to_string(),
                title: title_of(body),
            })
        })
        .collect()
}

/// `text` without its annotations. An annotation alone on its lines is
/// removed together with its indentation and the newline that follows it.
pub fn strip(language: Language, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for annotation in extract(language, text) {
        let line_start = text[..annotation.span.start].rfind('\n').map_or(0, |i| i + 1);
        let indent = &text[line_start..annotation.span.start];
        let start = if indent.trim().is_empty() {
            line_start
        } else {
            annotation.span.start
        };
        let mut end = annotation.span.end;
        if text[end..].starts_with('\n') {
            end += 1;
        }
        out.push_str(&text[copied..start.max(copied)]);
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}

use std::ops::Range;

use super::{Language, Lexeme, TokenKind, tokenize};

/// Tokenizes `text` with `language`, honoring `left ... right` escapes.
///
/// Comments and strings are kept as the language lexer produced them; the
/// formatter deals with escapes inside comments. Every other run of tokens
/// is searched for escaped segments, which become [`TokenKind::Escape`]
/// lexemes without their delimiters. What is left is lexed again. A `left`
/// delimiter without a matching `right` becomes an error lexeme.
pub fn tokenize_escaped(language: Language, text: &str, left: char, right: char) -> Vec<Lexeme<'_>> {
    let mut out = Vec::new();
    let mut pending: Option<Range<usize>> = None;

    for lexeme in tokenize(language, text) {
        if lexeme.kind.is_comment() || lexeme.kind.is_string() {
            if let Some(range) = pending.take() {
                split_escapes(language, text, range, left, right, &mut out);
            }
            out.push(lexeme);
        } else {
            let range = pending.get_or_insert(lexeme.offset..lexeme.offset);
            range.end = lexeme.end();
        }
    }
    if let Some(range) = pending {
        split_escapes(language, text, range, left, right, &mut out);
    }

    out
}

fn split_escapes<'src>(
    language: Language,
    text: &'src str,
    range: Range<usize>,
    left: char,
    right: char,
    out: &mut Vec<Lexeme<'src>>,
) {
    let mut position = range.start;
    while position < range.end {
        let rest = &text[position..range.end];
        let Some(open) = rest.find(left) else {
            relex(language, text, position..range.end, out);
            break;
        };
        if open > 0 {
            relex(language, text, position..position + open, out);
        }
        let body_start = position + open + left.len_utf8();
        match text[body_start..range.end].find(right) {
            Some(close) => {
                out.push(Lexeme::new(
                    TokenKind::Escape,
                    &text[body_start..body_start + close],
                    body_start,
                ));
                position = body_start + close + right.len_utf8();
            }
            None => {
                out.push(Lexeme::new(
                    TokenKind::Error,
                    &text[position + open..body_start],
                    position + open,
                ));
                position = body_start;
            }
        }
    }
}

fn relex<'src>(language: Language, text: &'src str, range: Range<usize>, out: &mut Vec<Lexeme<'src>>) {
    let base = range.start;
    out.extend(
        tokenize(language, &text[range])
            .into_iter()
            .map(|lexeme| Lexeme::new(lexeme.kind, lexeme.text, base + lexeme.offset)),
    );
}

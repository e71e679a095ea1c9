use logos::{Lexer, Logos};

use super::{Lexeme, LexingError, TokenKind};

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = LexingError)]
enum Token {
    #[regex(r"[ \t\r\n\f\v]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    #[regex(r"#[^\n]*")]
    Directive,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*")]
    Hex,
    #[regex(r"0[0-7]+[uUlL]*", priority = 4)]
    Octal,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    Float,
    #[regex(r"[0-9]+[uUlL]*")]
    Integer,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[~!%^&*+=|?:<>/-]")]
    Operator,
    #[regex(r"[()\[\]{};,.]")]
    Punctuation,
}

fn block_comment(lex: &mut Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

const KEYWORDS: &[&str] = &[
    "asm", "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
    "for", "goto", "if", "inline", "register", "restrict", "return", "sizeof", "static", "struct",
    "switch", "typedef", "union", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Generic", "_Noreturn", "_Static_assert", "_Thread_local",
];

const TYPES: &[&str] = &[
    "_Bool", "_Complex", "bool", "char", "double", "float", "int", "int8_t", "int16_t", "int32_t",
    "int64_t", "long", "ptrdiff_t", "short", "signed", "size_t", "ssize_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t", "unsigned", "void", "wchar_t",
];

const BUILTINS: &[&str] = &["NULL", "true", "false", "__FILE__", "__LINE__", "__func__"];

fn classify_identifier(word: &str) -> TokenKind {
    if KEYWORDS.contains(&word) {
        TokenKind::Keyword
    } else if TYPES.contains(&word) {
        TokenKind::KeywordType
    } else if BUILTINS.contains(&word) {
        TokenKind::NameBuiltin
    } else {
        TokenKind::Name
    }
}

/// Splits `#include <stdio.h>` into the directive and the included file.
fn push_directive<'src>(out: &mut Vec<Lexeme<'src>>, text: &'src str, offset: usize) {
    let after_hash = text[1..].trim_start();
    let directive_end = text.len() - after_hash.len() + "include".len();
    if after_hash.starts_with("include") && directive_end <= text.len() {
        let rest = &text[directive_end..];
        let file = rest.trim_start();
        if file.starts_with('<') || file.starts_with('"') {
            let file_start = text.len() - file.len();
            out.push(Lexeme::new(
                TokenKind::CommentPreproc,
                &text[..directive_end],
                offset,
            ));
            if file_start > directive_end {
                out.push(Lexeme::new(
                    TokenKind::Text,
                    &text[directive_end..file_start],
                    offset + directive_end,
                ));
            }
            out.push(Lexeme::new(
                TokenKind::CommentPreprocFile,
                file,
                offset + file_start,
            ));
            return;
        }
    }
    out.push(Lexeme::new(TokenKind::CommentPreproc, text, offset));
}

pub(super) fn tokenize(text: &str) -> Vec<Lexeme<'_>> {
    let raw: Vec<(Result<Token, LexingError>, std::ops::Range<usize>)> =
        Token::lexer(text).spanned().collect();
    let mut out = Vec::with_capacity(raw.len());
    let mut depth: usize = 0;

    for index in 0..raw.len() {
        let (token, span) = raw[index].clone();
        let slice = &text[span.clone()];
        let kind = match token {
            Err(_) => TokenKind::Error,
            Ok(Token::Whitespace) => TokenKind::Text,
            Ok(Token::LineComment) => TokenKind::CommentSingle,
            Ok(Token::BlockComment) => {
                if slice.starts_with("/*!") {
                    TokenKind::CommentSpecial
                } else {
                    TokenKind::CommentMultiline
                }
            }
            Ok(Token::Directive) => {
                push_directive(&mut out, slice, span.start);
                continue;
            }
            Ok(Token::String) => TokenKind::StringDouble,
            Ok(Token::Char) => TokenKind::StringChar,
            Ok(Token::Hex) => TokenKind::NumberHex,
            Ok(Token::Octal) => TokenKind::NumberOct,
            Ok(Token::Float) => TokenKind::NumberFloat,
            Ok(Token::Integer) => TokenKind::NumberInteger,
            Ok(Token::Identifier) => match classify_identifier(slice) {
                TokenKind::Name if depth == 0 && next_is_call(&raw[index + 1..], text) => {
                    TokenKind::NameFunction
                }
                kind => kind,
            },
            Ok(Token::Operator) => TokenKind::Operator,
            Ok(Token::Punctuation) => {
                match slice {
                    "{" => depth += 1,
                    "}" => depth = depth.saturating_sub(1),
                    _ => {}
                }
                TokenKind::Punctuation
            }
        };
        out.push(Lexeme::new(kind, slice, span.start));
    }

    out
}

/// Whether the next significant token opens a parameter list.
fn next_is_call(rest: &[(Result<Token, LexingError>, std::ops::Range<usize>)], text: &str) -> bool {
    rest.iter()
        .find(|(token, _)| !matches!(token, Ok(Token::Whitespace)))
        .is_some_and(|(token, span)| {
            matches!(token, Ok(Token::Punctuation)) && &text[span.clone()] == "("
        })
}

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::lexer::TokenKind;

    fn kinds(text: &str) -> Vec<(TokenKind, &str)> {
        tokenize(text)
            .into_iter()
            .filter(|lexeme| lexeme.kind != TokenKind::Text)
            .map(|lexeme| (lexeme.kind, lexeme.text))
            .collect()
    }

    #[test]
    fn lossless() {
        let source = include_str!("../../fixtures/coder_test.c");
        let joined: String = tokenize(source).iter().map(|l| l.text).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn declaration_names_are_functions() {
        let tokens = kinds("int factorial(int n) {\n  return factorial(n-1);\n}\n");
        assert_eq!(tokens[0], (TokenKind::KeywordType, "int"));
        assert_eq!(tokens[1], (TokenKind::NameFunction, "factorial"));
        assert!(tokens.contains(&(TokenKind::Name, "n")));
        assert!(tokens.contains(&(TokenKind::Keyword, "return")));
        // calls inside a body stay plain names
        let inner = tokens
            .iter()
            .filter(|(_, text)| *text == "factorial")
            .map(|(kind, _)| *kind)
            .collect::<Vec<_>>();
        assert_eq!(inner, vec![TokenKind::NameFunction, TokenKind::Name]);
    }

    #[test]
    fn include_is_split() {
        let tokens = tokenize("#include <stdio.h>\n");
        assert_eq!(tokens[0].kind, TokenKind::CommentPreproc);
        assert_eq!(tokens[0].text, "#include");
        assert_eq!(tokens[1].text, " ");
        assert_eq!(tokens[2].kind, TokenKind::CommentPreprocFile);
        assert_eq!(tokens[2].text, "<stdio.h>");
        assert_eq!(tokens[2].offset, 9);
    }

    #[test]
    fn literals() {
        let tokens = kinds(r#"x = 0x1F + 017 + 1.5f + 42u + 'a' + "s\"q";"#);
        assert!(tokens.contains(&(TokenKind::NumberHex, "0x1F")));
        assert!(tokens.contains(&(TokenKind::NumberOct, "017")));
        assert!(tokens.contains(&(TokenKind::NumberFloat, "1.5f")));
        assert!(tokens.contains(&(TokenKind::NumberInteger, "42u")));
        assert!(tokens.contains(&(TokenKind::StringChar, "'a'")));
        assert!(tokens.contains(&(TokenKind::StringDouble, r#""s\"q""#)));
    }

    #[test]
    fn comments() {
        let tokens = kinds("/* a */ // b\n/*!latex: c */");
        assert_eq!(tokens[0], (TokenKind::CommentMultiline, "/* a */"));
        assert_eq!(tokens[1], (TokenKind::CommentSingle, "// b"));
        assert_eq!(tokens[2], (TokenKind::CommentSpecial, "/*!latex: c */"));
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let tokens = kinds("/* open");
        assert_eq!(tokens[0].0, TokenKind::Error);
    }
}

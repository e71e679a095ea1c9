use std::ops::Range;

use logos::{Lexer, Logos};

use super::{Lexeme, LexingError, TokenKind};

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = LexingError)]
enum Token {
    #[regex(r"[ \t\r\f]+")]
    Blank,
    #[token("\n")]
    Newline,
    #[regex(r"\\\n")]
    Continuation,

    #[regex(r"#[^\n]*")]
    Comment,

    #[regex(r"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'''", triple_single)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?""""#, triple_double)]
    TripleString,
    #[regex(r"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'([^'\\\n]|\\.)*'")]
    SingleString,
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?"([^"\\\n]|\\.)*""#)]
    DoubleString,

    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Hex,
    #[regex(r"0[oO][0-7_]+")]
    Octal,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[jJ]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[jJ]?")]
    Float,
    #[regex(r"[0-9][0-9_]*[jJ]?")]
    Integer,

    #[regex(r"@[\p{XID_Start}_][\p{XID_Continue}.]*")]
    Decorator,
    // Modern way of allowing identifiers, read: https://unicode.org/reports/tr31/
    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*")]
    Identifier,

    #[regex(r"[-+*/%=<>!&|^~@]")]
    Operator,
    #[regex(r"[()\[\]{},;:.]")]
    Punctuation,
}

fn close_triple(lex: &mut Lexer<Token>, quote: &str) -> bool {
    let rest = lex.remainder();
    let mut index = 0;
    while index < rest.len() {
        let tail = &rest[index..];
        if tail.starts_with('\\') {
            index += 1 + tail[1..].chars().next().map_or(0, char::len_utf8);
        } else if tail.starts_with(quote) {
            lex.bump(index + quote.len());
            return true;
        } else {
            index += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    false
}

fn triple_single(lex: &mut Lexer<Token>) -> bool {
    close_triple(lex, "'''")
}

fn triple_double(lex: &mut Lexer<Token>) -> bool {
    close_triple(lex, "\"\"\"")
}

const KEYWORDS: &[&str] = &[
    "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "global", "if", "lambda", "nonlocal", "pass", "raise", "return",
    "try", "while", "with", "yield", "match", "case",
];

const CONSTANTS: &[&str] = &["True", "False", "None"];

const NAMESPACE_KEYWORDS: &[&str] = &["import", "from", "as"];

const WORD_OPERATORS: &[&str] = &["and", "or", "not", "in", "is"];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "bool", "bytes", "chr", "dict", "enumerate", "filter", "float", "format",
    "getattr", "hasattr", "int", "isinstance", "iter", "len", "list", "map", "max", "min", "next",
    "open", "ord", "print", "range", "repr", "reversed", "round", "set", "setattr", "sorted",
    "str", "sum", "super", "tuple", "type", "zip",
];

const PSEUDO_BUILTINS: &[&str] = &["self", "cls", "Ellipsis", "NotImplemented"];

fn is_dunder(word: &str) -> bool {
    word.len() > 4 && word.starts_with("__") && word.ends_with("__")
}

/// Length of the `r`/`b`/`f`/`u` prefix of a string literal.
fn affix_len(slice: &str) -> usize {
    slice.find(['\'', '"']).unwrap_or(0)
}

#[derive(Clone, Copy, PartialEq)]
enum Pending {
    None,
    Function,
    Class,
    Namespace,
}

pub(super) fn tokenize(text: &str) -> Vec<Lexeme<'_>> {
    let raw: Vec<(Result<Token, LexingError>, Range<usize>)> =
        Token::lexer(text).spanned().collect();
    let mut out = Vec::with_capacity(raw.len());
    let mut pending = Pending::None;
    let mut line_start = true;

    for (token, span) in raw {
        let slice = &text[span.clone()];
        let at_line_start = line_start;
        line_start = match token {
            Ok(Token::Newline) => true,
            Ok(Token::Blank) | Ok(Token::Continuation) => at_line_start,
            _ => false,
        };

        let kind = match token {
            Err(_) => TokenKind::Error,
            Ok(Token::Blank) | Ok(Token::Continuation) => TokenKind::Text,
            Ok(Token::Newline) => {
                if pending == Pending::Namespace {
                    pending = Pending::None;
                }
                TokenKind::Text
            }
            Ok(Token::Comment) => {
                if span.start == 0 && slice.starts_with("#!") {
                    TokenKind::CommentHashbang
                } else {
                    TokenKind::CommentSingle
                }
            }
            Ok(Token::TripleString) | Ok(Token::SingleString) | Ok(Token::DoubleString) => {
                let affix = affix_len(slice);
                if affix > 0 {
                    out.push(Lexeme::new(
                        TokenKind::StringAffix,
                        &slice[..affix],
                        span.start,
                    ));
                }
                let body = &slice[affix..];
                let kind = if token == Ok(Token::TripleString) && at_line_start {
                    TokenKind::StringDoc
                } else if body.starts_with('\'') {
                    TokenKind::StringSingle
                } else {
                    TokenKind::StringDouble
                };
                out.push(Lexeme::new(kind, body, span.start + affix));
                continue;
            }
            Ok(Token::Hex) => TokenKind::NumberHex,
            Ok(Token::Octal) => TokenKind::NumberOct,
            Ok(Token::Float) => TokenKind::NumberFloat,
            Ok(Token::Integer) => TokenKind::NumberInteger,
            Ok(Token::Decorator) => TokenKind::NameDecorator,
            Ok(Token::Identifier) => classify_identifier(slice, &mut pending),
            Ok(Token::Operator) => TokenKind::Operator,
            Ok(Token::Punctuation) => {
                if pending == Pending::Namespace && slice == "," {
                    TokenKind::Punctuation
                } else {
                    if slice != "." {
                        pending = Pending::None;
                    }
                    TokenKind::Punctuation
                }
            }
        };
        out.push(Lexeme::new(kind, slice, span.start));
    }

    out
}

fn classify_identifier(word: &str, pending: &mut Pending) -> TokenKind {
    match std::mem::replace(pending, Pending::None) {
        Pending::Function => return TokenKind::NameFunction,
        Pending::Class => return TokenKind::NameClass,
        Pending::Namespace if !NAMESPACE_KEYWORDS.contains(&word) => {
            *pending = Pending::Namespace;
            return TokenKind::NameNamespace;
        }
        _ => {}
    }

    match word {
        "def" => {
            *pending = Pending::Function;
            TokenKind::Keyword
        }
        "class" => {
            *pending = Pending::Class;
            TokenKind::Keyword
        }
        "import" | "from" => {
            *pending = Pending::Namespace;
            TokenKind::KeywordNamespace
        }
        _ if NAMESPACE_KEYWORDS.contains(&word) => TokenKind::KeywordNamespace,
        _ if KEYWORDS.contains(&word) => TokenKind::Keyword,
        _ if CONSTANTS.contains(&word) => TokenKind::KeywordConstant,
        _ if WORD_OPERATORS.contains(&word) => TokenKind::OperatorWord,
        _ if PSEUDO_BUILTINS.contains(&word) => TokenKind::NameBuiltinPseudo,
        _ if BUILTINS.contains(&word) => TokenKind::NameBuiltin,
        _ if is_dunder(word) => TokenKind::NameVariableMagic,
        _ => TokenKind::Name,
    }
}

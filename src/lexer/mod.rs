use std::{fmt, path::Path, str::FromStr};

use crate::error::Error;

mod c;
mod embedded;
mod filters;
mod kind;
mod python;

pub use embedded::tokenize_escaped;
pub use filters::prepare;
pub use kind::TokenKind;

#[derive(Debug, PartialEq, Clone, Default)]
pub enum LexingError {
    #[default]
    Other,
}

/// A slice of the source with its token kind and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub offset: usize,
}

impl<'src> Lexeme<'src> {
    pub fn new(kind: TokenKind, text: &'src str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Python,
    Text,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::C, Language::Python, Language::Text];

    pub fn name(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Python => "python",
            Language::Text => "text",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Language::C => &["c", "h"],
            Language::Python => &["python", "py", "python3", "py3"],
            Language::Text => &["text", "plain", "txt", "none"],
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::C => &["c", "h"],
            Language::Python => &["py", "pyw"],
            Language::Text => &["txt"],
        }
    }

    pub fn from_path(path: &Path) -> Result<Language, Error> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        Language::ALL
            .into_iter()
            .find(|language| {
                extension
                    .as_deref()
                    .is_some_and(|ext| language.extensions().contains(&ext))
            })
            .ok_or_else(|| Error::UndetectedLanguage(path.to_path_buf()))
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|language| language.aliases().contains(&lowered.as_str()))
            .ok_or_else(|| Error::UnknownLanguage(name.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits `text` into lexemes. Concatenating the lexemes gives back `text`.
pub fn tokenize(language: Language, text: &str) -> Vec<Lexeme<'_>> {
    let lexemes = match language {
        Language::C => c::tokenize(text),
        Language::Python => python::tokenize(text),
        Language::Text if text.is_empty() => Vec::new(),
        Language::Text => vec![Lexeme::new(TokenKind::Text, text, 0)],
    };
    tracing::trace!(%language, count = lexemes.len(), "tokenized");
    lexemes
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Language, tokenize};
    use test_case::test_case;

    #[test_case("c", Language::C ; "c")]
    #[test_case("H", Language::C ; "header alias")]
    #[test_case("py", Language::Python ; "python alias")]
    #[test_case("python3", Language::Python ; "python3")]
    #[test_case("plain", Language::Text ; "plain")]
    fn languages_by_name(name: &str, expected: Language) {
        assert_eq!(name.parse::<Language>().unwrap(), expected);
    }

    #[test]
    fn unknown_language() {
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn languages_by_extension() {
        assert_eq!(
            Language::from_path(Path::new("fixtures/coder_test.c")).unwrap(),
            Language::C
        );
        assert_eq!(
            Language::from_path(Path::new("coder_test.PY")).unwrap(),
            Language::Python
        );
        assert!(Language::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn text_is_one_lexeme() {
        let lexemes = tokenize(Language::Text, "a {b}\n");
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].text, "a {b}\n");
        assert!(tokenize(Language::Text, "").is_empty());
    }
}

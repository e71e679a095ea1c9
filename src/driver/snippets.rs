//! Snippet files.
//!
//! The TeX side collects every snippet of a document into one file:
//!
//! ```text
//! <@@NLN@display@3
//! lang=python, linenos
//! print("hi")
//! >@@NLN@display@3
//! ```
//!
//! `inline` and `display` blocks carry the code, `input` blocks the path of
//! a file to highlight. The conversion produces a `.pyg.tex` file of macros
//! the TeX side reads back.

use std::{
    borrow::Cow,
    collections::HashSet,
    fmt::Write,
    ops::Range,
    path::{Path, PathBuf},
};

use ariadne::{ColorGenerator, IndexType, Label, Report, ReportBuilder, ReportKind, Source};
use thiserror::Error;
use tracing::instrument;

use super::config::Config;
use crate::{
    encoding::{self, Encoding},
    error::Result,
    format::{self, embeddable_style_defs, style_defs},
    options::Options,
    style::StyleRegistry,
};

const OPEN: &str = "<@@NLN@";

const PROLOGUE: &str = "% -*- mode: latex -*-\n\\makeatletter\n";
const EPILOGUE: &str = "\\makeatother\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Inline,
    Display,
    Input,
}

impl SnippetKind {
    pub fn name(self) -> &'static str {
        match self {
            SnippetKind::Inline => "inline",
            SnippetKind::Display => "display",
            SnippetKind::Input => "input",
        }
    }

    fn from_name(name: &str) -> Option<SnippetKind> {
        match name {
            "inline" => Some(SnippetKind::Inline),
            "display" => Some(SnippetKind::Display),
            "input" => Some(SnippetKind::Input),
            _ => None,
        }
    }

    /// The `NLN/colored/<mode>` environment the TeX side typesets with.
    fn mode(self) -> &'static str {
        match self {
            SnippetKind::Inline => "inline",
            SnippetKind::Display | SnippetKind::Input => "display",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet<'src> {
    pub kind: SnippetKind,
    pub number: usize,
    pub options: &'src str,
    pub body: &'src str,
    pub span: Range<usize>,
    options_span: Range<usize>,
    body_span: Range<usize>,
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("invalid snippet file contents")]
    InvalidContents { span: Range<usize> },
    #[error("snippet {number} is not terminated")]
    Unterminated { number: usize, span: Range<usize> },
    #[error("cannot read {path:?} for snippet {number}")]
    UnreadableInput {
        number: usize,
        path: PathBuf,
        span: Range<usize>,
        #[source]
        source: Box<crate::Error>,
    },
    #[error("cannot highlight snippet {number}")]
    Highlight {
        number: usize,
        span: Range<usize>,
        #[source]
        source: Box<crate::Error>,
    },
}

impl SnippetError {
    pub fn span(&self) -> Range<usize> {
        match self {
            SnippetError::InvalidContents { span }
            | SnippetError::Unterminated { span, .. }
            | SnippetError::UnreadableInput { span, .. }
            | SnippetError::Highlight { span, .. } => span.clone(),
        }
    }

    fn report_builder<'a>(&self, path: &'a str) -> ReportBuilder<'a, (&'a str, Range<usize>)> {
        let mut colors = ColorGenerator::new();
        let span = self.span();
        let (code, label) = match self {
            SnippetError::InvalidContents { .. } => ("S1", "expected a snippet here".to_string()),
            SnippetError::Unterminated { number, .. } => (
                "S2",
                format!("no closing tag for snippet {number}"),
            ),
            SnippetError::UnreadableInput { source, .. } => ("S3", source.to_string()),
            SnippetError::Highlight { source, .. } => ("S4", source.to_string()),
        };
        let mut report = Report::build(ReportKind::Error, (path, span.clone()))
            .with_config(ariadne::Config::default().with_index_type(IndexType::Byte))
            .with_code(code)
            .with_message(self.to_string())
            .with_label(
                Label::new((path, span))
                    .with_message(label)
                    .with_color(colors.next()),
            );
        if let SnippetError::InvalidContents { .. } = self {
            report = report.with_note("the remaining snippets were ignored");
        }
        report
    }

    /// Creates a report from a snippet error.
    pub fn report<'a>(&self, path: &'a str) -> Report<'a, (&'a str, Range<usize>)> {
        self.report_builder(path).finish()
    }

    /// The report as plain text, for logs and tests.
    pub fn render(&self, path: &str, text: &str) -> String {
        let mut out = Vec::new();
        let _ = self
            .report_builder(path)
            .with_config(
                ariadne::Config::default()
                    .with_index_type(IndexType::Byte)
                    .with_color(false),
            )
            .finish()
            .write((path, Source::from(text.to_string())), &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// Parses the snippet starting at `start`.
pub fn parse_snippet(text: &str, start: usize) -> std::result::Result<Snippet<'_>, SnippetError> {
    let line_end = |from: usize| text[from..].find('\n').map_or(text.len(), |i| from + i);
    let invalid = || SnippetError::InvalidContents {
        span: start..line_end(start),
    };

    let header_end = line_end(start);
    let (kind, digits) = text[start..header_end]
        .strip_prefix(OPEN)
        .and_then(|header| header.rsplit_once('@'))
        .ok_or_else(invalid)?;
    let kind = SnippetKind::from_name(kind).ok_or_else(invalid)?;
    let number: usize = digits.parse().map_err(|_| invalid())?;
    let unterminated = || SnippetError::Unterminated {
        number,
        span: start..header_end,
    };

    let options_start = (header_end + 1).min(text.len());
    let options_end = line_end(options_start);
    if options_end == text.len() {
        return Err(unterminated());
    }
    let body_start = options_end + 1;

    let closing = format!("\n>@@NLN@{}@{digits}", kind.name());
    let mut from = body_start;
    while let Some(found) = text[from..].find(&closing) {
        let at = from + found;
        let end = at + closing.len();
        if end == text.len() || text[end..].starts_with('\n') {
            return Ok(Snippet {
                kind,
                number,
                options: &text[options_start..options_end],
                body: &text[body_start..at],
                span: start..end,
                options_span: options_start..options_end,
                body_span: body_start..at,
            });
        }
        from = at + 1;
    }
    Err(unterminated())
}

/// The options every snippet starts from.
pub fn snippet_defaults(config: &Config) -> Result<Options> {
    let mut options = Options::default();
    for (key, value) in [
        ("lang", "c"),
        ("sty", "default"),
        ("linenosep", "0pt"),
        ("tabsize", "8"),
        ("encoding", "guess"),
    ] {
        options.set(key, value)?;
    }
    config.apply_defaults(&options)
}

#[derive(Debug, Default)]
pub struct SnippetReport {
    /// The decoded snippets text, which diagnostic spans point into.
    pub source: String,
    pub output: String,
    /// Snippets successfully converted.
    pub converted: usize,
    /// Styles whose definitions were emitted, in order.
    pub styles: Vec<String>,
    pub diagnostics: Vec<SnippetError>,
}

struct Converter<'a> {
    base_dir: &'a Path,
    defaults: &'a Options,
    registry: &'a StyleRegistry,
    used_styles: HashSet<String>,
    report: SnippetReport,
}

impl Converter<'_> {
    fn convert(&mut self, snippet: &Snippet<'_>) -> std::result::Result<(), SnippetError> {
        let highlight_error = |source: crate::Error| SnippetError::Highlight {
            number: snippet.number,
            span: snippet.options_span.clone(),
            source: Box::new(source),
        };

        let options = self
            .defaults
            .parse_opts(snippet.options)
            .map_err(highlight_error)?;
        let code: Cow<str> = match snippet.kind {
            SnippetKind::Input => {
                let path = self.base_dir.join(snippet.body.trim());
                let unreadable = |source: crate::Error| SnippetError::UnreadableInput {
                    number: snippet.number,
                    path: path.clone(),
                    span: snippet.body_span.clone(),
                    source: Box::new(source),
                };
                let encoding: Encoding = options.encoding.parse().map_err(unreadable)?;
                let (text, _) = encoding::read_source(&path, encoding).map_err(unreadable)?;
                Cow::Owned(text)
            }
            SnippetKind::Inline | SnippetKind::Display => Cow::Borrowed(snippet.body),
        };

        let style = self.registry.get(&options.style).map_err(highlight_error)?;
        let formatted = format::highlight(&code, &options, style).map_err(highlight_error)?;

        let output = &mut self.report.output;
        if self.used_styles.insert(style.name().to_string()) {
            let defs = embeddable_style_defs(&style_defs(style, &options.commandprefix));
            let _ = write!(output, "\\def\\PYstyle{}{{%\n{defs}%\n}}%\n", style.name());
            self.report.styles.push(style.name().to_string());
        }

        let (lines, numbers) = format::number_lines(&formatted.lines, &options, |n| {
            format!(r"\NLN_get:n {{lineno:}} {{{n}}}")
        });
        let numbers = itertools::join(numbers, ",");
        let mode = snippet.kind.mode();
        let _ = write!(
            output,
            r"\tl_set:cn {{NLN/colored/{number}}} {{%
  \group_begin:
  \NLN@do@linenos:n{{{numbers}}}%
  \begin{{NLN/colored/{mode}}}%
  {body}%
  \end{{NLN/colored/{mode}}}%
  \group_end:
}}
",
            number = snippet.number,
            body = lines.join("\\newline\n"),
        );
        self.report.converted += 1;
        Ok(())
    }
}

/// Converts the contents of a snippets file.
///
/// Snippets that fail to highlight are reported and skipped. Contents that
/// are not a snippet stop the conversion.
#[instrument(level = "debug", skip_all, fields(base_dir = %base_dir.display()))]
pub fn convert(
    text: &str,
    base_dir: &Path,
    defaults: &Options,
    registry: &StyleRegistry,
) -> SnippetReport {
    let mut converter = Converter {
        base_dir,
        defaults,
        registry,
        used_styles: HashSet::new(),
        report: SnippetReport {
            source: text.to_string(),
            output: PROLOGUE.to_string(),
            ..SnippetReport::default()
        },
    };

    let mut pos = 0;
    while let Some(ch) = text[pos..].chars().next() {
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        match parse_snippet(text, pos) {
            Ok(snippet) => {
                tracing::trace!(number = snippet.number, kind = snippet.kind.name(), "snippet");
                if let Err(error) = converter.convert(&snippet) {
                    tracing::warn!(%error, "skipping snippet");
                    converter.report.diagnostics.push(error);
                }
                pos = snippet.span.end;
            }
            Err(error) => {
                tracing::warn!(%error, "stopping");
                converter.report.diagnostics.push(error);
                break;
            }
        }
    }

    let mut report = converter.report;
    report.output.push_str(EPILOGUE);
    tracing::debug!(
        converted = report.converted,
        errors = report.diagnostics.len(),
        "converted snippets"
    );
    report
}

/// Converts `input` into `output`, reading configuration defaults and styles
/// from `config`.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<SnippetReport> {
    let (text, _) = encoding::read_source(input, Encoding::Guess)?;
    let defaults = snippet_defaults(config)?;
    let registry = StyleRegistry::from_config(config)?;
    let base_dir = input.parent().unwrap_or(Path::new("."));
    let report = convert(&text, base_dir, &defaults, &registry);
    std::fs::write(output, &report.output).map_err(|source| crate::Error::Write {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{SnippetError, SnippetKind, convert, convert_file, parse_snippet, snippet_defaults};
    use crate::{driver::config::Config, style::StyleRegistry};

    fn run(text: &str) -> super::SnippetReport {
        let defaults = snippet_defaults(&Config::default()).unwrap();
        convert(text, Path::new("."), &defaults, &StyleRegistry::builtin())
    }

    #[test]
    fn parses_a_block() {
        let text = "<@@NLN@display@12\nlang=python\nx = 1\ny = 2\n>@@NLN@display@12\nrest";
        let snippet = parse_snippet(text, 0).unwrap();
        assert_eq!(snippet.kind, SnippetKind::Display);
        assert_eq!(snippet.number, 12);
        assert_eq!(snippet.options, "lang=python");
        assert_eq!(snippet.body, "x = 1\ny = 2");
        assert_eq!(&text[snippet.span.end..], "\nrest");
    }

    #[test]
    fn closing_tag_must_end_its_line() {
        let text = "<@@NLN@inline@1\n\na\n>@@NLN@inline@10\nb\n>@@NLN@inline@1";
        let snippet = parse_snippet(text, 0).unwrap();
        assert_eq!(snippet.body, "a\n>@@NLN@inline@10\nb");
    }

    #[test]
    fn empty_body() {
        let snippet = parse_snippet("<@@NLN@inline@2\nsty=bw\n\n>@@NLN@inline@2", 0).unwrap();
        assert_eq!(snippet.body, "");
        assert_eq!(snippet.options, "sty=bw");
    }

    #[test]
    fn unterminated_block() {
        let error = parse_snippet("<@@NLN@inline@4\n\nint x;\n", 0).unwrap_err();
        assert!(matches!(error, SnippetError::Unterminated { number: 4, .. }));
        assert_eq!(error.span(), 0..15);
    }

    #[test]
    fn converts_inline_snippet() {
        let report = run("\n<@@NLN@inline@1\n\nint x;\n>@@NLN@inline@1\n");
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.converted, 1);
        assert_eq!(report.styles, vec!["default"]);
        let output = &report.output;
        assert!(output.starts_with("% -*- mode: latex -*-\n\\makeatletter\n\\def\\PYstyledefault{%\n"));
        assert!(output.ends_with(
            "\\tl_set:cn {NLN/colored/1} {%\n  \\group_begin:\n  \\NLN@do@linenos:n{}%\n  \\begin{NLN/colored/inline}%\n  \\PY{k+kt}{int}~\\PY{n}{x}\\PY{p}{;}%\n  \\end{NLN/colored/inline}%\n  \\group_end:\n}\n\\makeatother\n"
        ));
    }

    #[test]
    fn style_definitions_are_emitted_once() {
        let text = "<@@NLN@inline@1\n\na\n>@@NLN@inline@1\n<@@NLN@display@2\nsty=bw\nb\n>@@NLN@display@2\n<@@NLN@display@3\n\nc\n>@@NLN@display@3\n";
        let report = run(text);
        assert_eq!(report.converted, 3);
        assert_eq!(report.styles, vec!["default", "bw"]);
        assert_eq!(report.output.matches("\\def\\PYstyledefault{").count(), 1);
        assert!(report.output.contains("\\begin{NLN/colored/display}"));
    }

    #[test]
    fn line_numbers() {
        let text = "<@@NLN@display@7\nlinenos, linenostart=10, linenostep=2\na\nb\nc\n>@@NLN@display@7\n";
        let report = run(text);
        assert!(report.output.contains("\\NLN@do@linenos:n{10,12}%"));
        assert!(report.output.contains(
            "\\NLN_get:n {lineno:} {10}\\PY{n}{a}\\newline\n\\PY{n}{b}\\newline\n\\NLN_get:n {lineno:} {12}\\PY{n}{c}%"
        ));
    }

    #[test]
    fn bad_snippets_are_skipped() {
        let text = "<@@NLN@inline@1\nlang=cobol\nx\n>@@NLN@inline@1\n<@@NLN@inline@2\n\ny\n>@@NLN@inline@2\n";
        let report = run(text);
        assert_eq!(report.converted, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            report.diagnostics[0],
            SnippetError::Highlight { number: 1, .. }
        ));
        assert!(report.output.contains("{NLN/colored/2}"));
    }

    #[test]
    fn invalid_contents_stop_conversion() {
        let text = "<@@NLN@inline@1\n\nx\n>@@NLN@inline@1\ngarbage\n<@@NLN@inline@2\n\ny\n>@@NLN@inline@2\n";
        let report = run(text);
        assert_eq!(report.converted, 1);
        assert!(matches!(
            report.diagnostics.as_slice(),
            [SnippetError::InvalidContents { .. }]
        ));
        assert!(!report.output.contains("{NLN/colored/2}"));
        assert!(report.output.ends_with("\\makeatother\n"));

        let rendered = report.diagnostics[0].render("doc.snippets", text);
        assert!(rendered.contains("invalid snippet file contents"));
        assert!(rendered.contains("doc.snippets"));
    }

    #[test]
    fn missing_input_file() {
        let report = run("<@@NLN@input@5\n\nno/such/file.c\n>@@NLN@input@5\n");
        assert!(matches!(
            report.diagnostics.as_slice(),
            [SnippetError::UnreadableInput { number: 5, .. }]
        ));
        assert_eq!(report.converted, 0);
    }

    #[test]
    fn latin1_file_keeps_its_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.snippets");
        let output = dir.path().join("doc.pyg.tex");
        std::fs::write(&input, b"<@@NLN@inline@1\n\nx = 'caf\xE9';\n>@@NLN@inline@1\ncaf\xE9\n")
            .unwrap();

        let report = convert_file(&input, &output, &Config::default()).unwrap();
        assert_eq!(report.converted, 1);
        assert!(report.source.ends_with("caf\u{e9}\n"));
        assert!(matches!(
            report.diagnostics.as_slice(),
            [SnippetError::InvalidContents { .. }]
        ));
        let rendered = report.diagnostics[0].render("doc.snippets", &report.source);
        assert!(rendered.contains("invalid snippet file contents"));
    }
}

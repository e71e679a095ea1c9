/// Replaces the characters TeX treats specially by `\<prefix>Z..{}` macros.
pub fn escape_tex(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = match ch {
            '\\' => "bs",
            '{' => "ob",
            '}' => "cb",
            '^' => "ca",
            '_' => "us",
            '&' => "am",
            '<' => "lt",
            '>' => "gt",
            '#' => "sh",
            '%' => "pc",
            '$' => "dl",
            '-' => "hy",
            '\'' => "sq",
            '"' => "dq",
            '~' => "ti",
            _ => {
                out.push(ch);
                continue;
            }
        };
        out.push('\\');
        out.push_str(prefix);
        out.push('Z');
        out.push_str(code);
        out.push_str("{}");
    }
    out
}

/// Escapes a comment for `texcomments`: only the leading run of the first
/// character (`//`, `#`, `/`) is escaped, the rest is raw LaTeX.
pub(super) fn escape_tex_comment(value: &str, prefix: &str) -> String {
    let Some(first) = value.chars().next() else {
        return String::new();
    };
    let start_len = value
        .char_indices()
        .find(|(_, ch)| *ch != first)
        .map_or(value.len(), |(index, _)| index);
    let (start, rest) = value.split_at(start_len);
    escape_tex(start, prefix) + rest
}

/// Escapes everything but the `$...$` parts.
pub(super) fn escape_outside_math(value: &str, prefix: &str) -> String {
    value
        .split('$')
        .enumerate()
        .map(|(index, part)| {
            if index % 2 == 0 {
                escape_tex(part, prefix)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("$")
}

/// Escapes everything but the `left...right` parts, dropping the delimiters.
/// A `left` without its `right` is escaped along with the rest.
pub(super) fn escape_outside_delimiters(value: &str, left: char, right: char, prefix: &str) -> String {
    let mut out = String::new();
    let mut rest = value;
    while !rest.is_empty() {
        match rest.split_once(left) {
            Some((before, after)) => match after.split_once(right) {
                Some((raw, after)) => {
                    out.push_str(&escape_tex(before, prefix));
                    out.push_str(raw);
                    rest = after;
                }
                None => {
                    out.push_str(&escape_tex(rest, prefix));
                    rest = "";
                }
            },
            None => {
                out.push_str(&escape_tex(rest, prefix));
                rest = "";
            }
        }
    }
    out
}

/// Rewrites `\csname` constructs into their expl3 spelling:
/// `\expandafter\def\csname X\endcsname` becomes `\cs_new:cpn{X}` and any
/// other `\csname X\endcsname` becomes `\use:c{X}`. A construct never spans
/// lines.
pub fn to_expl3(text: &str) -> String {
    let text = replace_csname(text, r"\expandafter\def\csname", r"\cs_new:cpn");
    replace_csname(&text, r"\csname", r"\use:c")
}

fn replace_csname(text: &str, opening: &str, replacement: &str) -> String {
    const CLOSING: &str = r"\endcsname";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(opening) {
        let after = &rest[start + opening.len()..];
        let line_end = after.find('\n').unwrap_or(after.len());
        let Some(close) = after[..line_end].find(CLOSING) else {
            out.push_str(&rest[..start + opening.len()]);
            rest = after;
            continue;
        };
        out.push_str(&rest[..start]);
        out.push_str(replacement);
        out.push('{');
        out.push_str(after[..close].trim_start());
        out.push('}');
        rest = &after[close + CLOSING.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            escape_tex(r#"a\b{c}_d%"#, "PY"),
            r"a\PYZbs{}b\PYZob{}c\PYZcb{}\PYZus{}d\PYZpc{}"
        );
        assert_eq!(escape_tex("x->y", "Py"), r"x\PyZhy{}\PyZgt{}y");
        assert_eq!(escape_tex("plain", "PY"), "plain");
    }

    #[test]
    fn comment_start_is_escaped() {
        assert_eq!(escape_tex_comment("// $x_1$", "PY"), "// $x_1$");
        assert_eq!(escape_tex_comment("# \\emph{a}", "PY"), r"\PYZsh{} \emph{a}");
        assert_eq!(escape_tex_comment("", "PY"), "");
    }

    #[test]
    fn math_is_left_raw() {
        assert_eq!(
            escape_outside_math("// x_1 $x_1$ y_2", "PY"),
            r"// x\PYZus{}1 $x_1$ y\PYZus{}2"
        );
    }

    #[test]
    fn delimited_text_is_left_raw() {
        assert_eq!(
            escape_outside_delimiters("/* |\\alpha| _ */", '|', '|', "PY"),
            r"/* \alpha \PYZus{} */"
        );
        assert_eq!(
            escape_outside_delimiters("/* |open */", '|', '|', "PY"),
            r"/* |open */"
        );
    }

    #[test]
    fn expl3_spelling() {
        let text = "\\expandafter\\def\\csname PY@tok@k\\endcsname{x}\n\\def\\PY@tok#1{\\csname PY@tok@#1\\endcsname}\n\\csname dangling\n\\endcsname";
        assert_eq!(
            to_expl3(text),
            "\\cs_new:cpn{PY@tok@k}{x}\n\\def\\PY@tok#1{\\use:c{PY@tok@#1}}\n\\csname dangling\n\\endcsname"
        );
    }
}

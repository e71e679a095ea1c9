use std::fmt::Write;

use crate::{
    lexer::TokenKind,
    style::{Font, Style, TokenStyle},
};

const STYLE_TEMPLATE_HEAD: &str = r"\makeatletter
\def\$$@reset{\let\$$@it=\relax \let\$$@bf=\relax%
    \let\$$@ul=\relax \let\$$@tc=\relax%
    \let\$$@bc=\relax \let\$$@ff=\relax}
\def\$$@tok#1{\csname $$@tok@#1\endcsname}
\def\$$@toks#1+{\ifx\relax#1\empty\else%
    \$$@tok{#1}\expandafter\$$@toks\fi}
\def\$$@do#1{\$$@bc{\$$@tc{\$$@ul{%
    \$$@it{\$$@bf{\$$@ff{#1}}}}}}}
\def\$$#1#2{\$$@reset\$$@toks#1+\relax+\$$@do{#2}}
";

const STYLE_TEMPLATE_TAIL: &str = r#"\def\$$Zbs{\char`\\}
\def\$$Zus{\char`\_}
\def\$$Zob{\char`\{}
\def\$$Zcb{\char`\}}
\def\$$Zca{\char`\^}
\def\$$Zam{\char`\&}
\def\$$Zlt{\char`\<}
\def\$$Zgt{\char`\>}
\def\$$Zsh{\char`\#}
\def\$$Zpc{\char`\%}
\def\$$Zdl{\char`\$}
\def\$$Zhy{\char`\-}
\def\$$Zsq{\char`\'}
\def\$$Zdq{\char`\"}
\def\$$Zti{\char`\~}
% for compatibility with earlier versions
\def\$$Zat{@}
\def\$$Zlb{[}
\def\$$Zrb{]}
\makeatother
"#;

fn token_definition(style: &TokenStyle) -> String {
    let mut def = String::new();
    if style.bold {
        def.push_str(r"\let\$$@bf=\textbf");
    }
    if style.italic {
        def.push_str(r"\let\$$@it=\textit");
    }
    if style.underline {
        def.push_str(r"\let\$$@ul=\underline");
    }
    match style.font {
        Some(Font::Roman) => def.push_str(r"\let\$$@ff=\textrm"),
        Some(Font::Sans) => def.push_str(r"\let\$$@ff=\textsf"),
        Some(Font::Mono) => def.push_str(r"\let\$$@ff=\texttt"),
        None => {}
    }
    if let Some(color) = style.color {
        let _ = write!(def, r"\def\$$@tc##1{{\textcolor[rgb]{{{color}}}{{##1}}}}");
    }
    if let Some(border) = style.border {
        let background = style
            .bgcolor
            .map_or_else(|| "1,1,1".to_string(), |bg| bg.to_string());
        let _ = write!(
            def,
            r"\def\$$@bc##1{{{{\setlength{{\fboxsep}}{{\string -\fboxrule}}\fcolorbox[rgb]{{{border}}}{{{background}}}{{\strut ##1}}}}}}"
        );
    } else if let Some(background) = style.bgcolor {
        let _ = write!(
            def,
            r"\def\$$@bc##1{{{{\setlength{{\fboxsep}}{{0pt}}\colorbox[rgb]{{{background}}}{{\strut ##1}}}}}}"
        );
    }
    def
}

/// The LaTeX macros a highlighted block needs, for every styled token kind.
pub fn style_defs(style: &Style, prefix: &str) -> String {
    let mut out = String::from(STYLE_TEMPLATE_HEAD);
    out.push('\n');
    for kind in TokenKind::ALL {
        let name = kind.short_name();
        let token_style = style.token_style(kind);
        if name.is_empty() || token_style.is_plain() {
            continue;
        }
        let _ = writeln!(
            out,
            r"\expandafter\def\csname $$@tok@{name}\endcsname{{{}}}",
            token_definition(token_style)
        );
    }
    out.push('\n');
    out.push_str(STYLE_TEMPLATE_TAIL);
    out.replace("$$", prefix)
}

/// Style definitions ready to be stored in a macro body: `#` doubled,
/// `\makeatletter`/`\makeatother` removed, line ends commented out.
pub fn embeddable_style_defs(defs: &str) -> String {
    defs.replace('#', "##")
        .replace(r"\##", r"\#")
        .replace(r"\makeatletter", "")
        .replace(r"\makeatother", "")
        .replace('\n', "%\n")
}

pub struct DocumentParts<'a> {
    pub docclass: &'a str,
    pub preamble: &'a str,
    pub title: &'a str,
    pub encoding: &'a str,
    pub styledefs: &'a str,
    pub code: &'a str,
}

pub fn document(parts: &DocumentParts<'_>) -> String {
    format!(
        r"\documentclass{{{docclass}}}
\usepackage{{fancyvrb}}
\usepackage{{color}}
\usepackage[{encoding}]{{inputenc}}
{preamble}

{styledefs}

\begin{{document}}

\section*{{{title}}}

{code}
\end{{document}}
",
        docclass = parts.docclass,
        encoding = parts.encoding,
        preamble = parts.preamble,
        styledefs = parts.styledefs,
        title = parts.title,
        code = parts.code,
    )
}

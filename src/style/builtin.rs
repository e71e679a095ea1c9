use crate::lexer::TokenKind;

pub(super) struct Builtin {
    pub name: &'static str,
    pub background: Option<&'static str>,
    pub rules: &'static [(TokenKind, &'static str)],
}

pub(super) const BUILTINS: &[Builtin] = &[DEFAULT, BW, AUTUMN];

const DEFAULT: Builtin = Builtin {
    name: "default",
    background: Some("#f8f8f8"),
    rules: &[
        (TokenKind::Comment, "italic #3D7B7B"),
        (TokenKind::CommentPreproc, "noitalic #9C6500"),
        (TokenKind::Keyword, "bold #008000"),
        (TokenKind::KeywordType, "nobold #B00040"),
        (TokenKind::Operator, "#666666"),
        (TokenKind::OperatorWord, "bold #AA22FF"),
        (TokenKind::NameBuiltin, "#008000"),
        (TokenKind::NameFunction, "#0000FF"),
        (TokenKind::NameClass, "bold #0000FF"),
        (TokenKind::NameNamespace, "bold #0000FF"),
        (TokenKind::NameVariable, "#19177C"),
        (TokenKind::NameDecorator, "#AA22FF"),
        (TokenKind::String, "#BA2121"),
        (TokenKind::StringDoc, "italic"),
        (TokenKind::StringEscape, "bold #AA5D1F"),
        (TokenKind::Number, "#666666"),
        (TokenKind::Error, "border:#FF0000"),
    ],
};

const BW: Builtin = Builtin {
    name: "bw",
    background: None,
    rules: &[
        (TokenKind::Comment, "italic"),
        (TokenKind::CommentPreproc, "noitalic"),
        (TokenKind::Keyword, "bold"),
        (TokenKind::KeywordType, "nobold"),
        (TokenKind::OperatorWord, "bold"),
        (TokenKind::NameClass, "bold"),
        (TokenKind::NameNamespace, "bold"),
        (TokenKind::String, "italic"),
        (TokenKind::StringEscape, "bold"),
        (TokenKind::Error, "border:#FF0000"),
    ],
};

const AUTUMN: Builtin = Builtin {
    name: "autumn",
    background: None,
    rules: &[
        (TokenKind::Comment, "italic #aaaaaa"),
        (TokenKind::CommentPreproc, "noitalic #4c8317"),
        (TokenKind::CommentSpecial, "italic #0000aa"),
        (TokenKind::Keyword, "#0000aa"),
        (TokenKind::KeywordType, "#00aaaa"),
        (TokenKind::OperatorWord, "#0000aa"),
        (TokenKind::NameBuiltin, "#00aaaa"),
        (TokenKind::NameFunction, "#00aa00"),
        (TokenKind::NameClass, "underline #00aa00"),
        (TokenKind::NameNamespace, "underline #00aaaa"),
        (TokenKind::NameVariable, "#aa0000"),
        (TokenKind::NameDecorator, "#888888"),
        (TokenKind::String, "#aa5500"),
        (TokenKind::Number, "#009999"),
        (TokenKind::Error, "#F00 bg:#FAA"),
    ],
};

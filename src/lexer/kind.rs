use std::fmt;

/// A node of the token type tree.
///
/// The tree mirrors the one LaTeX highlighting macros are keyed on: every
/// kind has a short name (`kt` for `Keyword.Type`) and a parent, and the
/// formatter writes the chain of short names from the root down
/// (`\PY{k+kt}{int}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Text,
    Escape,
    Error,
    Keyword,
    KeywordConstant,
    KeywordDeclaration,
    KeywordNamespace,
    KeywordReserved,
    KeywordType,
    Name,
    NameBuiltin,
    NameBuiltinPseudo,
    NameClass,
    NameDecorator,
    NameFunction,
    NameNamespace,
    NameVariable,
    NameVariableMagic,
    Literal,
    String,
    StringAffix,
    StringChar,
    StringDoc,
    StringDouble,
    StringEscape,
    StringSingle,
    Number,
    NumberFloat,
    NumberHex,
    NumberInteger,
    NumberOct,
    Operator,
    OperatorWord,
    Punctuation,
    Comment,
    CommentHashbang,
    CommentMultiline,
    CommentPreproc,
    CommentPreprocFile,
    CommentSingle,
    CommentSpecial,
}

impl TokenKind {
    pub const ALL: [TokenKind; 41] = [
        TokenKind::Text,
        TokenKind::Escape,
        TokenKind::Error,
        TokenKind::Keyword,
        TokenKind::KeywordConstant,
        TokenKind::KeywordDeclaration,
        TokenKind::KeywordNamespace,
        TokenKind::KeywordReserved,
        TokenKind::KeywordType,
        TokenKind::Name,
        TokenKind::NameBuiltin,
        TokenKind::NameBuiltinPseudo,
        TokenKind::NameClass,
        TokenKind::NameDecorator,
        TokenKind::NameFunction,
        TokenKind::NameNamespace,
        TokenKind::NameVariable,
        TokenKind::NameVariableMagic,
        TokenKind::Literal,
        TokenKind::String,
        TokenKind::StringAffix,
        TokenKind::StringChar,
        TokenKind::StringDoc,
        TokenKind::StringDouble,
        TokenKind::StringEscape,
        TokenKind::StringSingle,
        TokenKind::Number,
        TokenKind::NumberFloat,
        TokenKind::NumberHex,
        TokenKind::NumberInteger,
        TokenKind::NumberOct,
        TokenKind::Operator,
        TokenKind::OperatorWord,
        TokenKind::Punctuation,
        TokenKind::Comment,
        TokenKind::CommentHashbang,
        TokenKind::CommentMultiline,
        TokenKind::CommentPreproc,
        TokenKind::CommentPreprocFile,
        TokenKind::CommentSingle,
        TokenKind::CommentSpecial,
    ];

    /// The parent kind, `None` for the direct children of the root.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            Text | Escape | Error | Keyword | Name | Literal | Operator | Punctuation | Comment => {
                None
            }
            KeywordConstant | KeywordDeclaration | KeywordNamespace | KeywordReserved
            | KeywordType => Some(Keyword),
            NameBuiltin | NameClass | NameDecorator | NameFunction | NameNamespace
            | NameVariable => Some(Name),
            NameBuiltinPseudo => Some(NameBuiltin),
            NameVariableMagic => Some(NameVariable),
            String | Number => Some(Literal),
            StringAffix | StringChar | StringDoc | StringDouble | StringEscape | StringSingle => {
                Some(String)
            }
            NumberFloat | NumberHex | NumberInteger | NumberOct => Some(Number),
            OperatorWord => Some(Operator),
            CommentHashbang | CommentMultiline | CommentPreproc | CommentSingle
            | CommentSpecial => Some(Comment),
            CommentPreprocFile => Some(CommentPreproc),
        }
    }

    /// The macro name of this kind. Plain text has none.
    pub fn short_name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Text => "",
            Escape => "esc",
            Error => "err",
            Keyword => "k",
            KeywordConstant => "kc",
            KeywordDeclaration => "kd",
            KeywordNamespace => "kn",
            KeywordReserved => "kr",
            KeywordType => "kt",
            Name => "n",
            NameBuiltin => "nb",
            NameBuiltinPseudo => "bp",
            NameClass => "nc",
            NameDecorator => "nd",
            NameFunction => "nf",
            NameNamespace => "nn",
            NameVariable => "nv",
            NameVariableMagic => "vm",
            Literal => "l",
            String => "s",
            StringAffix => "sa",
            StringChar => "sc",
            StringDoc => "sd",
            StringDouble => "s2",
            StringEscape => "se",
            StringSingle => "s1",
            Number => "m",
            NumberFloat => "mf",
            NumberHex => "mh",
            NumberInteger => "mi",
            NumberOct => "mo",
            Operator => "o",
            OperatorWord => "ow",
            Punctuation => "p",
            Comment => "c",
            CommentHashbang => "ch",
            CommentMultiline => "cm",
            CommentPreproc => "cp",
            CommentPreprocFile => "cpf",
            CommentSingle => "c1",
            CommentSpecial => "cs",
        }
    }

    /// The last segment of the dotted path.
    fn segment(self) -> &'static str {
        use TokenKind::*;
        match self {
            Text => "Text",
            Escape => "Escape",
            Error => "Error",
            Keyword => "Keyword",
            KeywordConstant => "Constant",
            KeywordDeclaration => "Declaration",
            KeywordNamespace => "Namespace",
            KeywordReserved => "Reserved",
            KeywordType => "Type",
            Name => "Name",
            NameBuiltin => "Builtin",
            NameBuiltinPseudo => "Pseudo",
            NameClass => "Class",
            NameDecorator => "Decorator",
            NameFunction => "Function",
            NameNamespace => "Namespace",
            NameVariable => "Variable",
            NameVariableMagic => "Magic",
            Literal => "Literal",
            String => "String",
            StringAffix => "Affix",
            StringChar => "Char",
            StringDoc => "Doc",
            StringDouble => "Double",
            StringEscape => "Escape",
            StringSingle => "Single",
            Number => "Number",
            NumberFloat => "Float",
            NumberHex => "Hex",
            NumberInteger => "Integer",
            NumberOct => "Oct",
            Operator => "Operator",
            OperatorWord => "Word",
            Punctuation => "Punctuation",
            Comment => "Comment",
            CommentHashbang => "Hashbang",
            CommentMultiline => "Multiline",
            CommentPreproc => "Preproc",
            CommentPreprocFile => "PreprocFile",
            CommentSingle => "Single",
            CommentSpecial => "Special",
        }
    }

    /// Self first, then every ancestor up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = TokenKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    pub fn is_a(self, other: TokenKind) -> bool {
        self.ancestors().any(|kind| kind == other)
    }

    pub fn is_comment(self) -> bool {
        self.is_a(TokenKind::Comment)
    }

    pub fn is_string(self) -> bool {
        self.is_a(TokenKind::String)
    }

    /// The `+` separated chain of short names, root first (`l+s+s2`).
    pub fn style_chain(self) -> String {
        let mut names: Vec<&str> = self
            .ancestors()
            .map(TokenKind::short_name)
            .filter(|name| !name.is_empty())
            .collect();
        names.reverse();
        names.join("+")
    }

    /// The dotted path, `Literal.String.Double`. Strings and numbers are
    /// also reachable without the `Literal.` prefix in [`TokenKind::from_path`].
    pub fn path(self) -> String {
        let mut segments: Vec<&str> = self.ancestors().map(TokenKind::segment).collect();
        segments.reverse();
        segments.join(".")
    }

    pub fn from_path(path: &str) -> crate::Result<TokenKind> {
        let path = path.trim();
        let path = path.strip_prefix("Token.").unwrap_or(path);
        TokenKind::ALL
            .into_iter()
            .find(|kind| {
                let full = kind.path();
                full == path || full.strip_prefix("Literal.") == Some(path)
            })
            .ok_or_else(|| crate::Error::UnknownTokenType(path.to_string()))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

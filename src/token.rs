use std::fmt;

use crate::config::Dialect;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Kind {
    // EOF
    Eof,

    // Structure
    Newline,
    Identifier,
    String,
    Char,
    Int,
    Float,

    // Keywords
    Label,
    Goto,
    Print,
    Input,
    Let,
    LetInt,
    LetFloat,
    LetString,
    LetChar,
    If,
    Then,
    Elif,
    Else,
    EndIf,
    While,
    Repeat,
    EndWhile,
    For,
    To,
    Next,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

const KEYWORDS: [(&str, Kind); 19] = [
    ("LABEL", Kind::Label),
    ("GOTO", Kind::Goto),
    ("PRINT", Kind::Print),
    ("INPUT", Kind::Input),
    ("LETI", Kind::LetInt),
    ("LETF", Kind::LetFloat),
    ("LETS", Kind::LetString),
    ("LETC", Kind::LetChar),
    ("IF", Kind::If),
    ("THEN", Kind::Then),
    ("ELIF", Kind::Elif),
    ("ELSE", Kind::Else),
    ("ENDIF", Kind::EndIf),
    ("WHILE", Kind::While),
    ("REPEAT", Kind::Repeat),
    ("ENDWHILE", Kind::EndWhile),
    ("FOR", Kind::For),
    ("TO", Kind::To),
    ("NEXT", Kind::Next),
];

impl Kind {
    /// Keyword lookup is case-exact. `LET` only exists in the legacy dialect.
    pub fn keyword(ident: &str, dialect: Dialect) -> Option<Kind> {
        if ident == "LET" {
            return match dialect {
                Dialect::Legacy => Some(Kind::Let),
                Dialect::Typed => None,
            };
        }
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == ident)
            .map(|(_, kind)| *kind)
    }

    pub fn is_number(self) -> bool {
        matches!(self, Kind::Int | Kind::Float)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Kind::Eq | Kind::NotEq | Kind::Lt | Kind::LtEq | Kind::Gt | Kind::GtEq
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Eof => "EOF",
            Kind::Newline => "NEWLINE",
            Kind::Identifier => "IDENT",
            Kind::String => "STRING",
            Kind::Char => "CHAR",
            Kind::Int => "INT",
            Kind::Float => "FLOAT",
            Kind::Let => "LET",
            Kind::Assign => "ASSIGN",
            Kind::Plus => "PLUS",
            Kind::Minus => "MINUS",
            Kind::Star => "ASTERISK",
            Kind::Slash => "SLASH",
            Kind::Mod => "MOD",
            Kind::Eq => "EQEQ",
            Kind::NotEq => "NOTEQ",
            Kind::Lt => "LT",
            Kind::LtEq => "LTEQ",
            Kind::Gt => "GT",
            Kind::GtEq => "GTEQ",
            keyword => KEYWORDS
                .iter()
                .find(|(_, kind)| *kind == keyword)
                .map(|(word, _)| *word)
                .unwrap_or("KEYWORD"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub text: String,
    pub kind: Kind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: Kind) -> Self {
        Token {
            text: text.into(),
            kind,
        }
    }
}

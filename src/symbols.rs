use std::fmt;

use rustc_hash::FxHashMap;

use crate::token::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Int,
    Float,
    String,
    Char,
}

impl VarType {
    /// Type of a literal token, if it is one.
    pub fn from_literal(kind: Kind) -> Option<VarType> {
        match kind {
            Kind::Int => Some(VarType::Int),
            Kind::Float => Some(VarType::Float),
            Kind::String => Some(VarType::String),
            Kind::Char => Some(VarType::Char),
            _ => None,
        }
    }

    pub fn c_declaration(self, name: &str) -> String {
        match self {
            VarType::Int => format!("int {};", name),
            VarType::Float => format!("float {};", name),
            VarType::String => format!("char *{};", name),
            VarType::Char => format!("char {};", name),
        }
    }

    pub fn printf_format(self) -> &'static str {
        match self {
            VarType::Int => "%d",
            VarType::Float => "%.2f",
            VarType::String => "%s",
            VarType::Char => "%c",
        }
    }

    /// Strings have no buffer to read into.
    pub fn scanf_format(self) -> Option<&'static str> {
        match self {
            VarType::Int => Some("%d"),
            VarType::Float => Some("%f"),
            VarType::Char => Some(" %c"),
            VarType::String => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VarType::Int => "INT",
            VarType::Float => "FLOAT",
            VarType::String => "STRING",
            VarType::Char => "CHAR",
        })
    }
}

// Names the generated C already uses: the frame around the program and the
// C keywords a short BASIC name could hit.
const RESERVED: &[&str] = &[
    "main", "printf", "scanf", "auto", "break", "case", "char", "const", "continue",
    "default", "do", "double", "else", "enum", "extern", "float", "for", "goto", "if",
    "inline", "int", "long", "register", "restrict", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
];

/// True if `name` cannot be used as a C variable or label.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    variables: FxHashMap<String, VarType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn get(&self, name: &str) -> Option<VarType> {
        self.variables.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Returns false if the name was already declared; the entry is left as is.
    pub fn declare(&mut self, name: &str, ty: VarType) -> bool {
        if self.contains(name) {
            return false;
        }
        self.variables.insert(name.to_string(), ty);
        true
    }

    /// Unconditionally sets the type, returning whether the name was new.
    /// Used by `FOR`, which retypes its induction variable.
    pub fn force(&mut self, name: &str, ty: VarType) -> bool {
        self.variables.insert(name.to_string(), ty).is_none()
    }
}

/// File the command-line driver writes the generated C into.
pub const DEFAULT_OUTPUT: &str = "out.c";

/// Source language variant accepted by the compiler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Typed declarations only: `LETI`, `LETF`, `LETS`, `LETC`.
    #[default]
    Typed,
    /// Adds the untyped `LET`, which declares float variables and allows
    /// reassignment. Numeric prints always use the float format.
    Legacy,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    pub dialect: Dialect,
}

impl Options {
    pub fn legacy() -> Self {
        Options {
            dialect: Dialect::Legacy,
        }
    }
}

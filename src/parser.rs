use rustc_hash::FxHashSet;

use crate::config::{Dialect, Options};
use crate::emitter::Emitter;
use crate::error::{CompileError, Result};
use crate::lexer::Lexer;
use crate::symbols::{self, SymbolTable, VarType};
use crate::token::{Kind, Token};

/// Recursive-descent parser that writes C as each rule is recognized.
///
/// One parser is one compilation: it owns the lexer, the symbol table, the
/// label bookkeeping and the output buffers, and [`Parser::compile`]
/// consumes it.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peek_token: Token,
    emitter: Emitter,
    symbols: SymbolTable,
    labels: FxHashSet<String>,
    // in first-reference order, checked against `labels` at the end
    gotos: Vec<String>,
    // type a literal must have while the right-hand side of a LETx is parsed
    expected: Option<VarType>,
    options: Options,
}

impl Parser {
    pub fn new(lexer: Lexer, options: Options) -> Result<Self> {
        let mut parser = Parser {
            lexer,
            current_token: Token::new("", Kind::Eof),
            peek_token: Token::new("", Kind::Eof),
            emitter: Emitter::new(),
            symbols: SymbolTable::new(),
            labels: FxHashSet::default(),
            gotos: Vec::new(),
            expected: None,
            options,
        };

        // Read two tokens so current and peek tokens are both set
        parser.next_token()?;
        parser.next_token()?;

        Ok(parser)
    }

    fn next_token(&mut self) -> Result<()> {
        let next = self.lexer.next_token()?;
        self.current_token = std::mem::replace(&mut self.peek_token, next);
        Ok(())
    }

    fn check_token(&self, kind: Kind) -> bool {
        self.current_token.kind == kind
    }

    fn match_token(&mut self, kind: Kind) -> Result<()> {
        if !self.check_token(kind) {
            return abort(format!(
                "Expected {}, Got {}",
                kind, self.current_token.kind
            ));
        }
        self.next_token()
    }

    // Consumes an identifier and hands back its name
    fn expect_identifier(&mut self) -> Result<String> {
        let name = self.current_token.text.clone();
        self.match_token(Kind::Identifier)?;
        Ok(name)
    }

    /// `program := NEWLINE* statement*`, framed by the `main` prologue and
    /// epilogue. Every `GOTO` target must have been labeled somewhere.
    pub fn compile(mut self) -> Result<String> {
        self.emitter.header_line("#include <stdio.h>");
        self.emitter.emit_line("int main(void){");

        while self.check_token(Kind::Newline) {
            self.next_token()?;
        }
        while !self.check_token(Kind::Eof) {
            self.statement()?;
        }

        if let Some(label) = self.gotos.iter().find(|l| !self.labels.contains(*l)) {
            return abort(format!("Attempting to GOTO undeclared label: {}", label));
        }

        self.emitter.emit_line("return 0;");
        self.emitter.emit_line("}");
        Ok(self.emitter.finalize())
    }

    fn statement(&mut self) -> Result<()> {
        match self.current_token.kind {
            Kind::Print => self.print_statement()?,
            Kind::If => self.if_statement()?,
            Kind::While => self.while_statement()?,
            Kind::For => self.for_statement()?,
            Kind::Label => self.label_statement()?,
            Kind::Goto => self.goto_statement()?,
            Kind::Input => self.input_statement()?,
            Kind::LetInt => self.let_statement(VarType::Int)?,
            Kind::LetFloat => self.let_statement(VarType::Float)?,
            Kind::LetString => self.let_statement(VarType::String)?,
            Kind::LetChar => self.let_statement(VarType::Char)?,
            Kind::Let => self.legacy_let_statement()?,
            kind => {
                return abort(format!(
                    "Invalid statement at {} ({})",
                    describe(&self.current_token),
                    kind
                ));
            }
        }
        self.newline()
    }

    // Statements up to (not including) one of `terminators`. Running into
    // EOF is left for the caller's `match_token` to report.
    fn block(&mut self, terminators: &[Kind]) -> Result<()> {
        while !terminators.contains(&self.current_token.kind) && !self.check_token(Kind::Eof) {
            self.statement()?;
        }
        Ok(())
    }

    fn print_statement(&mut self) -> Result<()> {
        self.next_token()?; // Consume PRINT

        if matches!(self.current_token.kind, Kind::String | Kind::Char) {
            let text = printf_literal(&self.current_token);
            self.emitter.emit_line(&format!("printf(\"{}\\n\");", text));
            return self.next_token();
        }

        let ty = self.print_type()?;
        let format = ty.printf_format();
        let close = match ty {
            VarType::Int => {
                self.emitter.emit(&format!("printf(\"{}\\n\", (int)(", format));
                "));"
            }
            VarType::Float => {
                self.emitter.emit(&format!("printf(\"{}\\n\", (float)(", format));
                "));"
            }
            VarType::String | VarType::Char => {
                self.emitter.emit(&format!("printf(\"{}\\n\", ", format));
                ");"
            }
        };
        self.expression()?;
        self.emitter.emit_line(close);
        Ok(())
    }

    // The head of a printed expression decides its format
    // Legacy programs print numbers as floats unless a typed variable leads.
    fn print_type(&self) -> Result<VarType> {
        let token = &self.current_token;
        let legacy = self.options.dialect == Dialect::Legacy;
        match token.kind {
            Kind::Identifier => self.symbols.get(&token.text).ok_or_else(|| {
                CompileError::syntax(format!(
                    "Referencing variable before assignment: {}",
                    token.text
                ))
            }),
            _ if legacy => Ok(VarType::Float),
            Kind::Int => Ok(VarType::Int),
            Kind::Float => Ok(VarType::Float),
            _ => abort(format!(
                "Cannot print expression starting at {}",
                describe(token)
            )),
        }
    }

    fn if_statement(&mut self) -> Result<()> {
        // IF cmp THEN ... (ELIF cmp THEN ...)* (ELSE ...)? ENDIF
        self.next_token()?; // Consume IF
        self.emitter.emit("if(");
        self.comparison()?;
        self.match_token(Kind::Then)?;
        self.newline()?;
        self.emitter.emit_line("){");

        let arms = [Kind::Elif, Kind::Else, Kind::EndIf];
        self.block(&arms)?;

        while self.check_token(Kind::Elif) {
            self.next_token()?; // Consume ELIF
            self.emitter.emit("}else if(");
            self.comparison()?;
            self.match_token(Kind::Then)?;
            self.newline()?;
            self.emitter.emit_line("){");

            if self.check_token(Kind::Elif) {
                return abort("Empty ELIF block before ELIF");
            }
            self.block(&arms)?;
        }

        if self.check_token(Kind::Else) {
            self.next_token()?; // Consume ELSE
            self.newline()?;
            self.emitter.emit_line("}else{");
            self.block(&[Kind::EndIf])?;
        }

        self.match_token(Kind::EndIf)?;
        self.emitter.emit_line("}");
        Ok(())
    }

    fn while_statement(&mut self) -> Result<()> {
        self.next_token()?; // Consume WHILE
        self.emitter.emit("while(");
        self.comparison()?;
        self.match_token(Kind::Repeat)?;
        self.newline()?;
        self.emitter.emit_line("){");

        self.block(&[Kind::EndWhile])?;
        self.match_token(Kind::EndWhile)?;
        self.emitter.emit_line("}");
        Ok(())
    }

    fn for_statement(&mut self) -> Result<()> {
        // FOR i = start TO bound ... NEXT
        self.next_token()?; // Consume FOR
        let name = self.expect_identifier()?;
        check_c_name(&name)?;

        // The induction variable is an int from here on, whatever it was before
        if self.symbols.force(&name, VarType::Int) {
            self.emitter.header_line(&VarType::Int.c_declaration(&name));
        }

        self.match_token(Kind::Assign)?;
        self.emitter.emit(&format!("for({} = ", name));
        self.unary()?;

        self.match_token(Kind::To)?;
        self.emitter.emit(&format!("; {} < ", name));
        self.unary()?;
        self.emitter.emit_line(&format!("; {}++){{", name));
        self.newline()?;

        self.block(&[Kind::Next])?;
        self.match_token(Kind::Next)?;
        self.emitter.emit_line("}");
        Ok(())
    }

    fn label_statement(&mut self) -> Result<()> {
        self.next_token()?; // Consume LABEL
        let name = self.expect_identifier()?;
        check_c_name(&name)?;
        if !self.labels.insert(name.clone()) {
            return abort(format!("Label already declared: {}", name));
        }
        // The empty statement keeps a label legal right before a closing brace
        self.emitter.emit_line(&format!("{}:;", name));
        Ok(())
    }

    fn goto_statement(&mut self) -> Result<()> {
        self.next_token()?; // Consume GOTO
        let name = self.expect_identifier()?;
        check_c_name(&name)?;
        self.emitter.emit_line(&format!("goto {};", name));
        self.gotos.push(name);
        Ok(())
    }

    fn input_statement(&mut self) -> Result<()> {
        self.next_token()?; // Consume INPUT
        let name = self.expect_identifier()?;
        check_c_name(&name)?;

        let ty = match self.symbols.get(&name) {
            Some(ty) => ty,
            None => {
                self.symbols.declare(&name, VarType::Float);
                self.emitter
                    .header_line(&VarType::Float.c_declaration(&name));
                VarType::Float
            }
        };
        let format = ty.scanf_format().ok_or_else(|| {
            CompileError::syntax(format!("Cannot INPUT into {} variable: {}", ty, name))
        })?;

        // Bad input zeroes the variable and skips the offending word
        self.emitter
            .emit_line(&format!("if(0 == scanf(\"{}\", &{})){{", format, name));
        self.emitter.emit_line(&format!("{} = 0;", name));
        self.emitter.emit_line("scanf(\"%*s\");");
        self.emitter.emit_line("}");
        Ok(())
    }

    fn let_statement(&mut self, ty: VarType) -> Result<()> {
        // LETI|LETF|LETS|LETC name = expression
        self.next_token()?; // Consume LETx

        if !self.check_token(Kind::Identifier) {
            return self.match_token(Kind::Identifier);
        }
        let name = self.current_token.text.clone();
        check_c_name(&name)?;
        if !self.symbols.declare(&name, ty) {
            return abort(format!("Variable already declared: {}", name));
        }
        self.emitter.header_line(&ty.c_declaration(&name));
        self.next_token()?;

        self.emitter.emit(&format!("{} = ", name));
        self.match_token(Kind::Assign)?;

        self.expected = Some(ty);
        self.expression()?;
        self.expected = None;

        self.emitter.emit_line(";");
        Ok(())
    }

    fn legacy_let_statement(&mut self) -> Result<()> {
        // LET name = expression, declaring a float the first time round
        self.next_token()?; // Consume LET
        let name = self.expect_identifier()?;
        check_c_name(&name)?;
        if self.symbols.declare(&name, VarType::Float) {
            self.emitter
                .header_line(&VarType::Float.c_declaration(&name));
        }

        self.emitter.emit(&format!("{} = ", name));
        self.match_token(Kind::Assign)?;
        self.expression()?;
        self.emitter.emit_line(";");
        Ok(())
    }

    fn expression(&mut self) -> Result<()> {
        self.term()?;
        while matches!(self.current_token.kind, Kind::Plus | Kind::Minus) {
            self.emitter.emit(&self.current_token.text);
            self.next_token()?;
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<()> {
        self.unary()?;
        while matches!(
            self.current_token.kind,
            Kind::Star | Kind::Slash | Kind::Mod
        ) {
            self.emitter.emit(&self.current_token.text);
            self.next_token()?;
            self.unary()?;
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<()> {
        if matches!(self.current_token.kind, Kind::Plus | Kind::Minus) {
            self.emitter.emit(&self.current_token.text);
            self.next_token()?;
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<()> {
        let token = &self.current_token;
        if let Some(literal) = VarType::from_literal(token.kind) {
            if let Some(expected) = self.expected {
                if expected != literal {
                    return abort(format!(
                        "Type mismatch: cannot assign {} literal {} to {} variable",
                        token.kind, token.text, expected
                    ));
                }
            }
            let code = match token.kind {
                Kind::String => format!("\"{}\"", token.text),
                Kind::Char => format!("'{}'", escape_char(&token.text)),
                _ => token.text.clone(),
            };
            self.emitter.emit(&code);
        } else if token.kind == Kind::Identifier {
            if !self.symbols.contains(&token.text) {
                return abort(format!(
                    "Referencing variable before assignment: {}",
                    token.text
                ));
            }
            self.emitter.emit(&token.text);
        } else {
            return abort(format!("Unexpected token at {}", describe(token)));
        }
        self.next_token()
    }

    // Chains are concatenated as is, so `a < b < c` keeps C's meaning
    fn comparison(&mut self) -> Result<()> {
        self.expression()?;
        if !self.current_token.kind.is_comparison() {
            return abort(format!(
                "Expected comparison operator at {}",
                describe(&self.current_token)
            ));
        }
        while self.current_token.kind.is_comparison() {
            self.emitter.emit(&self.current_token.text);
            self.next_token()?;
            self.expression()?;
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        self.match_token(Kind::Newline)?;
        while self.check_token(Kind::Newline) {
            self.next_token()?;
        }
        Ok(())
    }
}

fn abort<T>(message: impl Into<String>) -> Result<T> {
    Err(CompileError::syntax(message))
}

// Variables and labels become C identifiers verbatim
fn check_c_name(name: &str) -> Result<()> {
    if symbols::is_reserved(name) {
        return abort(format!("Reserved name: {}", name));
    }
    Ok(())
}

// Token text for diagnostics; newline and EOF have nothing printable
fn describe(token: &Token) -> String {
    match token.kind {
        Kind::Newline | Kind::Eof => token.kind.to_string(),
        _ => token.text.clone(),
    }
}

// The lexer never yields `'` as a char payload, so only `\` needs escaping
fn escape_char(text: &str) -> String {
    if text == "\\" {
        return "\\\\".to_string();
    }
    text.to_string()
}

// Literal inlined as a printf format string
fn printf_literal(token: &Token) -> String {
    let text = token.text.replace('%', "%%");
    if token.kind == Kind::Char {
        match text.as_str() {
            "\"" => return "\\\"".to_string(),
            "\\" => return "\\\\".to_string(),
            _ => {}
        }
    }
    text
}

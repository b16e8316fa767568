use crate::config::Dialect;
use crate::error::{CompileError, Result};
use crate::token::{Kind, Token};

pub struct Lexer {
    input: String,
    position: usize,
    read_position: usize,
    ch: u8,
    dialect: Dialect,
}

impl Lexer {
    pub fn new(source: &str, dialect: Dialect) -> Self {
        // Every statement must end in a newline, including the last one
        let mut input = String::with_capacity(source.len() + 1);
        input.push_str(source);
        input.push('\n');

        let mut lexer = Lexer {
            input,            // Input string plus the sentinel newline
            position: 0,      // Points to current char
            read_position: 0, // Points ahead of current char
            ch: 0,            // Current char
            dialect,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let tok = match self.ch {
            b'+' => self.single(Kind::Plus),
            b'-' => self.single(Kind::Minus),
            b'*' => self.single(Kind::Star),
            b'/' => self.single(Kind::Slash),
            b'%' => self.single(Kind::Mod),
            b'\n' => self.single(Kind::Newline),
            b'=' => self.double(b'=', Kind::Eq, Kind::Assign),
            b'>' => self.double(b'=', Kind::GtEq, Kind::Gt),
            b'<' => self.double(b'=', Kind::LtEq, Kind::Lt),
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new("!=", Kind::NotEq)
                } else {
                    return Err(CompileError::lex(format!(
                        "Expected !=, Got !{}",
                        self.char_at(self.read_position).unwrap_or_default()
                    )));
                }
            }
            b'"' => self.read_string()?,
            b'\'' => self.read_char_literal()?,
            b'0'..=b'9' => return self.read_number(),
            b'a'..=b'z' | b'A'..=b'Z' => {
                let ident = self.read_identifier();
                let kind = Kind::keyword(&ident, self.dialect).unwrap_or(Kind::Identifier);
                return Ok(Token::new(ident, kind));
            }
            // End of input; keep handing out EOF if asked again
            0 if self.position >= self.input.len() => return Ok(Token::new("", Kind::Eof)),
            _ => {
                let unknown = self.char_at(self.position).unwrap_or_default();
                return Err(CompileError::lex(format!("Unknown token: {}", unknown)));
            }
        };

        self.read_char();
        Ok(tok)
    }

    fn read_char(&mut self) {
        if self.read_position >= self.input.len() {
            // 0 marks the end of input
            self.ch = 0;
        } else {
            self.ch = self.input.as_bytes()[self.read_position];
        }
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input.as_bytes()[self.read_position]
        }
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.input.get(index..).and_then(|rest| rest.chars().next())
    }

    fn single(&self, kind: Kind) -> Token {
        Token::new((self.ch as char).to_string(), kind)
    }

    // `=`, `<`, `>` may be followed by `=`
    fn double(&mut self, next: u8, long: Kind, short: Kind) -> Token {
        if self.peek_char() == next {
            let text = format!("{}{}", self.ch as char, next as char);
            self.read_char();
            Token::new(text, long)
        } else {
            self.single(short)
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\r') {
            self.read_char();
        }
        if self.ch == b'#' {
            self.skip_comment();
        }
    }

    fn skip_comment(&mut self) {
        // Leave the newline for the parser
        while self.ch != b'\n' && self.ch != 0 {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        while self.ch.is_ascii_alphanumeric() {
            self.read_char();
        }
        self.input[position..self.position].to_string()
    }

    fn read_number(&mut self) -> Result<Token> {
        let position = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }

        if self.ch == b'.' {
            if !self.peek_char().is_ascii_digit() {
                return Err(CompileError::lex("Illegal character in number."));
            }
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char();
            }
            let number = &self.input[position..self.position];
            return Ok(Token::new(number, Kind::Float));
        }
        let number = &self.input[position..self.position];
        Ok(Token::new(number, Kind::Int))
    }

    fn read_string(&mut self) -> Result<Token> {
        let position = self.position + 1;
        loop {
            self.read_char();
            match self.ch {
                b'"' => break,
                b'\n' | 0 => return Err(CompileError::lex("Unterminated string literal")),
                _ => {}
            }
        }
        let s = &self.input[position..self.position];
        Ok(Token::new(s, Kind::String))
    }

    fn read_char_literal(&mut self) -> Result<Token> {
        self.read_char(); // Consume opening '
        let ch = match self.char_at(self.position) {
            Some(c) if c != '\'' && c != '\n' => c,
            _ => return Err(CompileError::lex("Illegal character literal")),
        };
        // Multi-byte characters span several reads
        for _ in 0..ch.len_utf8() {
            self.read_char();
        }
        if self.ch == b'\'' {
            Ok(Token::new(ch.to_string(), Kind::Char))
        } else {
            Err(CompileError::lex("Illegal character literal"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Kind> {
        let mut lexer = Lexer::new(input, Dialect::Typed);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            kinds.push(token.kind);
            if token.kind == Kind::Eof {
                return kinds;
            }
        }
    }

    fn lex_error(input: &str) -> String {
        let mut lexer = Lexer::new(input, Dialect::Typed);
        loop {
            match lexer.next_token() {
                Ok(token) if token.kind == Kind::Eof => panic!("no error for {:?}", input),
                Ok(_) => {}
                Err(e) => return e.to_string(),
            }
        }
    }

    #[test]
    fn test_next_token() {
        let input = "LETI a = 5";
        let mut lexer = Lexer::new(input, Dialect::Typed);

        let tokens = vec![
            Token::new("LETI", Kind::LetInt),
            Token::new("a", Kind::Identifier),
            Token::new("=", Kind::Assign),
            Token::new("5", Kind::Int),
            Token::new("\n", Kind::Newline),
            Token::new("", Kind::Eof),
        ];

        for token in tokens {
            assert_eq!(lexer.next_token().unwrap(), token);
        }
    }

    #[test]
    fn test_if_statement() {
        let input = "IF a >= b THEN\nPRINT \"a is big\"\nENDIF";
        let mut lexer = Lexer::new(input, Dialect::Typed);

        let tokens = vec![
            Token::new("IF", Kind::If),
            Token::new("a", Kind::Identifier),
            Token::new(">=", Kind::GtEq),
            Token::new("b", Kind::Identifier),
            Token::new("THEN", Kind::Then),
            Token::new("\n", Kind::Newline),
            Token::new("PRINT", Kind::Print),
            Token::new("a is big", Kind::String),
            Token::new("\n", Kind::Newline),
            Token::new("ENDIF", Kind::EndIf),
            Token::new("\n", Kind::Newline),
            Token::new("", Kind::Eof),
        ];

        for token in tokens {
            assert_eq!(lexer.next_token().unwrap(), token);
        }
    }

    #[test]
    fn test_for_statement() {
        let input = "FOR i = 1 TO 10\nPRINT i\nNEXT";
        assert_eq!(
            kinds(input),
            vec![
                Kind::For,
                Kind::Identifier,
                Kind::Assign,
                Kind::Int,
                Kind::To,
                Kind::Int,
                Kind::Newline,
                Kind::Print,
                Kind::Identifier,
                Kind::Newline,
                Kind::Next,
                Kind::Newline,
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / % = == != < <= > >="),
            vec![
                Kind::Plus,
                Kind::Minus,
                Kind::Star,
                Kind::Slash,
                Kind::Mod,
                Kind::Assign,
                Kind::Eq,
                Kind::NotEq,
                Kind::Lt,
                Kind::LtEq,
                Kind::Gt,
                Kind::GtEq,
                Kind::Newline,
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_and_literals() {
        let mut lexer = Lexer::new("12 3.25 'x' \"\" LETC", Dialect::Typed);
        assert_eq!(lexer.next_token().unwrap(), Token::new("12", Kind::Int));
        assert_eq!(lexer.next_token().unwrap(), Token::new("3.25", Kind::Float));
        assert_eq!(lexer.next_token().unwrap(), Token::new("x", Kind::Char));
        assert_eq!(lexer.next_token().unwrap(), Token::new("", Kind::String));
        assert_eq!(lexer.next_token().unwrap(), Token::new("LETC", Kind::LetChar));
    }

    #[test]
    fn test_comments_and_whitespace() {
        assert_eq!(
            kinds("\t# a comment == !\r\nGOTO end # trailing\n"),
            vec![
                Kind::Newline,
                Kind::Goto,
                Kind::Identifier,
                Kind::Newline,
                Kind::Newline,
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_need_exact_case() {
        let mut lexer = Lexer::new("print Print PRINTX LET", Dialect::Typed);
        for _ in 0..4 {
            assert_eq!(lexer.next_token().unwrap().kind, Kind::Identifier);
        }

        let mut lexer = Lexer::new("LET", Dialect::Legacy);
        assert_eq!(lexer.next_token().unwrap(), Token::new("LET", Kind::Let));
    }

    #[test]
    fn test_empty_input_yields_sentinel_newline() {
        assert_eq!(kinds(""), vec![Kind::Newline, Kind::Eof]);

        let mut lexer = Lexer::new("", Dialect::Typed);
        lexer.next_token().unwrap();
        assert_eq!(lexer.next_token().unwrap().kind, Kind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, Kind::Eof);
    }

    #[test]
    fn test_lexing_errors() {
        assert_eq!(lex_error("1."), "Lexing error: Illegal character in number.");
        assert_eq!(lex_error("1.x"), "Lexing error: Illegal character in number.");
        assert_eq!(lex_error("!x"), "Lexing error: Expected !=, Got !x");
        assert_eq!(lex_error("a @ b"), "Lexing error: Unknown token: @");
        assert_eq!(lex_error("_a"), "Lexing error: Unknown token: _");
        assert_eq!(lex_error("\"open"), "Lexing error: Unterminated string literal");
        assert_eq!(lex_error("\"two\nlines\""), "Lexing error: Unterminated string literal");
        assert_eq!(lex_error("'ab'"), "Lexing error: Illegal character literal");
        assert_eq!(lex_error("''"), "Lexing error: Illegal character literal");
    }
}

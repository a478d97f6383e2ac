use super::token::{Token, INTEGER_SIZE, NUMBER_SIZE};
use super::{Error, Ident};
use std::convert::TryFrom;
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// ## Decoded tokens
///
/// Payload tokens carry their value. Strings refer back into the byte
/// slice they were decoded from so nothing is copied.

#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Token(Token),
    Ident(Ident),
    Integer(i32),
    Number(f32),
    String(Range<usize>),
}

impl Lexeme {
    pub fn token(&self) -> Token {
        match self {
            Lexeme::Token(t) => *t,
            Lexeme::Ident(_) => Token::Ident,
            Lexeme::Integer(_) => Token::Integer,
            Lexeme::Number(_) => Token::Number,
            Lexeme::String(_) => Token::String,
        }
    }
}

/// Decodes the token starting at `pos`. Returns it with the position of
/// the following token.
pub fn decode(bytes: &[u8], pos: usize) -> Result<(Lexeme, usize)> {
    let corrupt = || error!(BadCommand; "CORRUPT TOKEN");
    let byte = *bytes.get(pos).ok_or_else(corrupt)?;
    let token = Token::try_from(byte).map_err(|_| corrupt())?;
    let pos = pos + 1;
    match token {
        Token::Ident => {
            let (ident, len) = Ident::decode(&bytes[pos..])?;
            Ok((Lexeme::Ident(ident), pos + len))
        }
        Token::Integer => {
            let mut raw = [0; INTEGER_SIZE];
            raw.copy_from_slice(bytes.get(pos..pos + INTEGER_SIZE).ok_or_else(corrupt)?);
            Ok((Lexeme::Integer(i32::from_le_bytes(raw)), pos + INTEGER_SIZE))
        }
        Token::Number => {
            let mut raw = [0; NUMBER_SIZE];
            raw.copy_from_slice(bytes.get(pos..pos + NUMBER_SIZE).ok_or_else(corrupt)?);
            Ok((Lexeme::Number(f32::from_le_bytes(raw)), pos + NUMBER_SIZE))
        }
        Token::String => {
            let len = bytes[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(corrupt)?;
            Ok((Lexeme::String(pos..pos + len), pos + len + 1))
        }
        _ => Ok((Lexeme::Token(token), pos)),
    }
}

/// ## Token line
///
/// Walks the tokens of one line, stopping before `Eol`.

#[derive(Debug, Clone)]
pub struct Line<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Line<'a> {
    pub fn new(bytes: &'a [u8]) -> Line<'a> {
        Line { bytes, pos: 0 }
    }

    /// Checks that `bytes` starts with a well formed token line and
    /// returns its length including `Eol`.
    pub fn validate(bytes: &[u8]) -> Result<usize> {
        let mut pos = 0;
        loop {
            let (lexeme, next) = decode(bytes, pos)?;
            if lexeme.token() == Token::Eol {
                return Ok(next);
            }
            pos = next;
        }
    }

    /// Payload of a string token decoded from this line.
    pub fn text(&self, range: Range<usize>) -> &'a [u8] {
        &self.bytes[range]
    }
}

impl<'a> Iterator for Line<'a> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        match decode(self.bytes, self.pos) {
            Ok((Lexeme::Token(Token::Eol), _)) | Err(_) => None,
            Ok((lexeme, next)) => {
                self.pos = next;
                Some(lexeme)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::lex;

    fn tokens(s: &str) -> Vec<u8> {
        let mut buf = [0; 128];
        let len = lex(s, &mut buf).unwrap();
        buf[..len].to_vec()
    }

    #[test]
    fn test_walk() {
        let bytes = tokens(r#"PRINT a$;"hi";10;2.5"#);
        let line = Line::new(&bytes);
        let v: Vec<Token> = line.clone().map(|l| l.token()).collect();
        assert_eq!(
            v,
            vec![
                Token::Print,
                Token::Ident,
                Token::Semicolon,
                Token::String,
                Token::Semicolon,
                Token::Integer,
                Token::Semicolon,
                Token::Number
            ]
        );
        match line.clone().nth(3) {
            Some(Lexeme::String(r)) => assert_eq!(line.text(r), b"hi"),
            other => panic!("{:?}", other),
        }
        assert_eq!(line.clone().nth(5), Some(Lexeme::Integer(10)));
        assert_eq!(line.clone().nth(7), Some(Lexeme::Number(2.5)));
    }

    #[test]
    fn test_validate() {
        let bytes = tokens("a=1:cls");
        assert_eq!(Line::validate(&bytes), Ok(bytes.len()));
        assert!(Line::validate(&bytes[..bytes.len() - 1]).is_err());
        assert!(Line::validate(&[7, 0]).is_err());
        assert_eq!(Line::new(&[0]).next(), None);
    }
}

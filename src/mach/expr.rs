use super::{Host, Operation, Runtime};
use crate::error;
use crate::lang::{Error, Token};
use rand::Rng;

type Result<T> = std::result::Result<T, Error>;

/// Type of an evaluated expression. Checked on every pass, the value
/// is only produced while executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Number,
    String,
}

/// ## Expression evaluator
///
/// Recursive descent over the token stream with precedence climbing for
/// binary operators. Values go on the evaluation stack.

impl<H: Host> Runtime<H> {
    pub(super) fn parse_expression(&mut self) -> Result<Type> {
        let lhs = self.parse_primary()?;
        self.parse_binary_rhs(0, lhs)
    }

    pub(super) fn expect_number(&mut self) -> Result<()> {
        match self.parse_expression()? {
            Type::Number => Ok(()),
            Type::String => Err(error!(ExpectedNumeric)),
        }
    }

    pub(super) fn expect_string(&mut self) -> Result<()> {
        match self.parse_expression()? {
            Type::String => Ok(()),
            Type::Number => Err(error!(ExpectedString)),
        }
    }

    fn parse_binary_rhs(&mut self, min_prec: i32, mut lhs: Type) -> Result<Type> {
        loop {
            let op = self.cursor.token;
            let prec = match op.precedence() {
                Some(prec) if prec >= min_prec => prec,
                _ => return Ok(lhs),
            };
            self.next_token()?;
            let mut rhs = self.parse_primary()?;
            if let Some(next) = self.cursor.token.precedence() {
                if prec < next {
                    rhs = self.parse_binary_rhs(prec + 1, rhs)?;
                }
            }
            lhs = self.apply_binary(op, lhs, rhs)?;
        }
    }

    fn parse_primary(&mut self) -> Result<Type> {
        let executing = self.ctx.executing;
        match self.cursor.token {
            Token::Ident => self.parse_identifier(),
            Token::Number | Token::Integer => {
                if executing {
                    self.arena.push_num(self.cursor.num)?;
                }
                self.next_token()?;
                Ok(Type::Number)
            }
            Token::String => {
                if executing {
                    self.push_text()?;
                }
                self.next_token()?;
                Ok(Type::String)
            }
            Token::LParen => {
                self.next_token()?;
                let ty = self.parse_expression()?;
                if self.cursor.token != Token::RParen {
                    return Err(error!(MissingBracket));
                }
                self.next_token()?;
                Ok(ty)
            }
            Token::Rnd => {
                if executing {
                    let r: f32 = self.rng.gen();
                    self.arena.push_num(r)?;
                }
                self.next_token()?;
                Ok(Type::Number)
            }
            Token::Inkey => {
                if executing {
                    match self.host.get_key() {
                        Some(key) => self.arena.push_str(&[key])?,
                        None => self.arena.push_str(b"")?,
                    }
                }
                self.next_token()?;
                Ok(Type::String)
            }
            Token::Minus | Token::Not => self.parse_unary(),
            t if t.is_function() => self.parse_function(),
            _ => Err(error!(UnexpectedToken)),
        }
    }

    fn parse_unary(&mut self) -> Result<Type> {
        let op = self.cursor.token;
        self.next_token()?;
        if self.parse_primary()? != Type::Number {
            return Err(error!(ExpectedNumeric));
        }
        if self.ctx.executing {
            let val = self.arena.pop_num();
            self.arena.push_num(Operation::unary(op, val))?;
        }
        Ok(Type::Number)
    }

    /// Variable or array element reference.
    fn parse_identifier(&mut self) -> Result<Type> {
        let ident = self.cursor.ident;
        self.next_token()?;
        let is_array = self.cursor.token == Token::LParen;
        if is_array {
            self.parse_subscript()?;
        }
        if self.ctx.executing {
            match (ident.is_string(), is_array) {
                (false, false) => {
                    let val = self.arena.lookup_num(&ident)?;
                    self.arena.push_num(val)?;
                }
                (false, true) => {
                    let val = self.arena.lookup_num_element(&ident)?;
                    self.arena.push_num(val)?;
                }
                (true, false) => {
                    let text = self.arena.lookup_str(&ident)?;
                    self.arena.push_str_within(text)?;
                }
                (true, true) => {
                    let text = self.arena.lookup_str_element(&ident)?;
                    self.arena.push_str_within(text)?;
                }
            }
        }
        Ok(if ident.is_string() {
            Type::String
        } else {
            Type::Number
        })
    }

    /// `(i, j, ..)` after an array name. Pushes each index then the count.
    pub(super) fn parse_subscript(&mut self) -> Result<()> {
        let mut count = 0;
        loop {
            self.next_token()?;
            self.expect_number()?;
            count += 1;
            if self.cursor.token != Token::Comma {
                break;
            }
        }
        if self.cursor.token != Token::RParen {
            return Err(error!(MissingBracket));
        }
        self.next_token()?;
        if self.ctx.executing {
            self.arena.push_num(count as f32)?;
        }
        Ok(())
    }
}

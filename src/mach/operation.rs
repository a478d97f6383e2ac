use super::{Host, Runtime, Type};
use crate::error;
use crate::lang::{Error, Token};
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators
///
/// Comparisons and logic produce 1 for true and 0 for false.

pub struct Operation {}

impl Operation {
    /// Result type of `lhs op rhs`, or an error for mixed or unsupported
    /// operands. Strings only join with `+` and compare.
    pub fn result_type(op: Token, lhs: Type, rhs: Type) -> Result<Type> {
        match (lhs, rhs) {
            (Type::Number, Type::Number) => Ok(Type::Number),
            (Type::String, Type::String) if op == Token::Plus => Ok(Type::String),
            (Type::String, Type::String) if Operation::is_comparison(op) => Ok(Type::Number),
            _ => Err(error!(UnexpectedToken)),
        }
    }

    fn is_comparison(op: Token) -> bool {
        use Token::*;
        matches!(
            op,
            Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual
        )
    }

    pub fn number(op: Token, lhs: f32, rhs: f32) -> Result<f32> {
        use Token::*;
        Ok(match op {
            Plus => lhs + rhs,
            Minus => lhs - rhs,
            Multiply => lhs * rhs,
            Divide => {
                if rhs == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                lhs / rhs
            }
            Mod => {
                let rhs = rhs as i32;
                if rhs == 0 {
                    return Err(error!(DivisionByZero));
                }
                (lhs as i32).wrapping_rem(rhs) as f32
            }
            And => {
                if rhs != 0.0 {
                    lhs
                } else {
                    0.0
                }
            }
            Or => {
                if rhs != 0.0 {
                    1.0
                } else {
                    lhs
                }
            }
            _ if !Operation::is_comparison(op) => return Err(error!(UnexpectedToken)),
            _ => match lhs.partial_cmp(&rhs) {
                Some(ord) => Operation::truth(op, ord)?,
                None if op == NotEqual => 1.0,
                None => 0.0,
            },
        })
    }

    /// Byte-wise comparison of two strings.
    pub fn compare(op: Token, lhs: &[u8], rhs: &[u8]) -> Result<f32> {
        Operation::truth(op, lhs.cmp(rhs))
    }

    fn truth(op: Token, ord: Ordering) -> Result<f32> {
        use Token::*;
        let t = match op {
            Equal => ord == Ordering::Equal,
            NotEqual => ord != Ordering::Equal,
            Less => ord == Ordering::Less,
            Greater => ord == Ordering::Greater,
            LessEqual => ord != Ordering::Greater,
            GreaterEqual => ord != Ordering::Less,
            _ => return Err(error!(UnexpectedToken)),
        };
        Ok(if t { 1.0 } else { 0.0 })
    }

    /// Unary minus and NOT.
    pub fn unary(op: Token, val: f32) -> f32 {
        match op {
            Token::Not => {
                if val == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            _ => -val,
        }
    }
}

impl<H: Host> Runtime<H> {
    /// Type checks a binary operator and, while executing, replaces the
    /// two top stack values with the result.
    pub(super) fn apply_binary(&mut self, op: Token, lhs: Type, rhs: Type) -> Result<Type> {
        let ty = Operation::result_type(op, lhs, rhs)?;
        if !self.ctx.executing {
            return Ok(ty);
        }
        match (lhs, ty) {
            (Type::Number, _) => {
                let r = self.arena.pop_num();
                let l = self.arena.pop_num();
                self.arena.push_num(Operation::number(op, l, r)?)?;
            }
            (Type::String, Type::String) => self.arena.concat_top2(),
            (Type::String, Type::Number) => {
                let r = self.arena.pop_str();
                let l = self.arena.pop_str();
                let val = Operation::compare(op, self.arena.bytes(l), self.arena.bytes(r))?;
                self.arena.push_num(val)?;
            }
        }
        Ok(ty)
    }
}

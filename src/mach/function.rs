use super::runtime::Source;
use super::{format_float, Host, Runtime, Type};
use crate::error;
use crate::lang::{Error, ErrorCode, Token};

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Argument count and types come from the token's descriptor.

pub struct Function {}

impl Function {
    /// Longest leading number in `s`, 0 when there is none.
    pub fn leading_number(s: &str) -> f32 {
        let s = s.trim_start();
        let end = s
            .find(|c: char| !(c.is_ascii_digit() || "+-.eE".contains(c)))
            .unwrap_or_else(|| s.len());
        let s = &s[..end];
        (1..=s.len())
            .rev()
            .find_map(|n| s.get(..n)?.parse::<f32>().ok())
            .unwrap_or(0.0)
    }

    /// Count argument of `LEFT$` and friends.
    fn length(n: f32) -> Result<usize> {
        let n = n as i32;
        if n < 0 {
            return Err(error!(StringSubscriptOutOfRange));
        }
        Ok(n as usize)
    }
}

impl<H: Host> Runtime<H> {
    pub(super) fn parse_function(&mut self) -> Result<Type> {
        let op = self.cursor.token;
        let desc = op.descriptor();
        if self.next_token()? != Token::LParen {
            return Err(error!(MissingBracket));
        }
        self.next_token()?;
        let args = desc.args as usize;
        for i in 0..args {
            if desc.is_string_arg(i) {
                self.expect_string()?;
            } else {
                self.expect_number()?;
            }
            if i + 1 < args {
                if self.cursor.token != Token::Comma {
                    return Err(error!(UnexpectedToken));
                }
                self.next_token()?;
            }
        }
        if self.ctx.executing {
            self.call_function(op)?;
        }
        if self.cursor.token != Token::RParen {
            return Err(error!(MissingBracket));
        }
        self.next_token()?;
        Ok(if desc.returns_string {
            Type::String
        } else {
            Type::Number
        })
    }

    fn call_function(&mut self, op: Token) -> Result<()> {
        match op {
            Token::Len => {
                let len = self.arena.pop_str().len();
                self.arena.push_num(len as f32)
            }
            Token::Val => self.val(),
            Token::Int => {
                let n = self.arena.pop_num();
                self.arena.push_num(n.floor())
            }
            Token::Str => {
                let n = self.arena.pop_num();
                self.arena.push_str(format_float(n).as_bytes())
            }
            Token::Left => {
                let n = Function::length(self.arena.pop_num())?;
                self.arena.left_str(n);
                Ok(())
            }
            Token::Right => {
                let n = Function::length(self.arena.pop_num())?;
                self.arena.right_str(n);
                Ok(())
            }
            Token::Mid => {
                let n = Function::length(self.arena.pop_num())?;
                let start = self.arena.pop_num() as i32;
                if start < 1 {
                    return Err(error!(StringSubscriptOutOfRange));
                }
                self.arena.mid_str(start as usize, n);
                Ok(())
            }
            Token::PinRead => {
                let pin = self.arena.pop_num() as i32;
                let val = self.host.digital_read(pin);
                self.arena.push_num(val as f32)
            }
            Token::AnalogRead => {
                let pin = self.arena.pop_num() as i32;
                let val = self.host.analog_read(pin);
                self.arena.push_num(val as f32)
            }
            _ => Err(error!(UnexpectedToken)),
        }
    }

    /// Evaluates the string on top of the stack as a numeric expression.
    /// The string is replaced by the result. On failure it is popped and
    /// nothing else on the stack changes.
    fn val(&mut self) -> Result<()> {
        let mark = self.arena.stack_mark();
        let cursor = self.cursor.clone();
        let result = self.eval_top_str();
        self.cursor = cursor;
        self.arena.restore_stack(mark);
        self.arena.pop_str();
        self.arena.push_num(result?)
    }

    fn eval_top_str(&mut self) -> Result<f32> {
        let start = self.arena.push_tokens_of_top_str().map_err(|e| match e.code() {
            ErrorCode::LineTooLong => error!(OutOfMemory),
            _ => error!(ErrorInValInput),
        })?;
        self.start(Source::Arena, start)?;
        let ty = self.parse_expression().map_err(|e| match e.code() {
            ErrorCode::OutOfMemory => e,
            _ => error!(ErrorInValInput),
        })?;
        if ty != Type::Number {
            return Err(error!(ExpectedNumeric));
        }
        if self.cursor.token != Token::Eol {
            return Err(error!(ErrorInValInput));
        }
        Ok(self.arena.pop_num())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Quiet;

    impl Host for Quiet {
        fn output_char(&mut self, _ch: u8) {}
        fn new_line(&mut self) {}
        fn read_line(&mut self) -> String {
            String::new()
        }
    }

    fn executing() -> Runtime<Quiet> {
        let mut r = Runtime::<Quiet>::default();
        r.ctx.executing = true;
        r
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(Function::leading_number("42"), 42.0);
        assert_eq!(Function::leading_number("  -1.5e2xyz"), -150.0);
        assert_eq!(Function::leading_number("3 apples"), 3.0);
        assert_eq!(Function::leading_number("abc"), 0.0);
        assert_eq!(Function::leading_number("info"), 0.0);
        assert_eq!(Function::leading_number(""), 0.0);
    }

    #[test]
    fn test_val() {
        let mut r = executing();
        r.arena.push_num(7.0).unwrap();
        r.arena.push_str(b"2+3*2").unwrap();
        r.val().unwrap();
        assert_eq!(r.arena.pop_num(), 8.0);
        assert_eq!(r.arena.pop_num(), 7.0);
        assert_eq!(r.arena.stack_depth(), 0);
    }

    #[test]
    fn test_val_failure_keeps_stack() {
        let mut r = executing();
        r.arena.push_num(7.0).unwrap();
        let depth = r.arena.stack_depth();
        let bad: [(&[u8], ErrorCode); 4] = [
            (b"2+", ErrorCode::ErrorInValInput),
            (b"1 2", ErrorCode::ErrorInValInput),
            (b"@", ErrorCode::ErrorInValInput),
            (b"\"x\"", ErrorCode::ExpectedNumeric),
        ];
        for (text, code) in bad.iter() {
            r.arena.push_str(text).unwrap();
            assert_eq!(r.val().unwrap_err().code(), *code);
            assert_eq!(r.arena.stack_depth(), depth);
        }
        assert_eq!(r.arena.pop_num(), 7.0);
    }

    #[test]
    fn test_val_keeps_cursor() {
        let mut r = executing();
        r.cursor.token = Token::RParen;
        r.cursor.pos = 3;
        r.arena.push_str(b"5").unwrap();
        r.val().unwrap();
        assert_eq!(r.cursor.token, Token::RParen);
        assert_eq!(r.cursor.pos, 3);
    }
}

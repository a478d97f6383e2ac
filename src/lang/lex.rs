use super::token::{Token, INTEGER_SIZE, NUMBER_SIZE};
use super::{Error, Ident, MAX_NUMBER_LEN};

type Result<T> = std::result::Result<T, Error>;

/// Tokenizes one line of text into `out` and returns the number of bytes
/// written, the terminating `Eol` included. On error `out` holds garbage.
pub fn lex<S: AsRef<[u8]> + ?Sized>(input: &S, out: &mut [u8]) -> Result<usize> {
    let input = input.as_ref();
    let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
    let mut lexer = BasicLexer {
        input: &input[..end],
        pos: 0,
        out,
        len: 0,
    };
    lexer.run()?;
    Ok(lexer.len)
}

/// Text for a `Number` token that lexes back to the same bits: no
/// exponent, at most `MAX_NUMBER_LEN` characters, and a decimal point so
/// it never becomes an `Integer`.
pub fn number_text(num: f32) -> String {
    let mut s = num.to_string();
    if s.len() > MAX_NUMBER_LEN {
        if let Some(fraction) = s.strip_prefix("0.") {
            s = format!(".{}", fraction);
        } else {
            let nines = "9".repeat(MAX_NUMBER_LEN);
            if nines.parse::<f32>().map(f32::to_bits) == Ok(num.to_bits()) {
                s = nines;
            }
        }
    }
    if !s.contains('.') && s.parse::<i32>().is_ok() {
        s.push('.');
        if s.len() < MAX_NUMBER_LEN {
            s.push('0');
        }
    }
    s
}

fn is_basic_whitespace(b: u8) -> bool {
    b.is_ascii_whitespace()
}

fn is_number_char(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'$'
}

struct BasicLexer<'a> {
    input: &'a [u8],
    pos: usize,
    out: &'a mut [u8],
    len: usize,
}

impl<'a> BasicLexer<'a> {
    fn run(&mut self) -> Result<()> {
        loop {
            while self.peek().map_or(false, is_basic_whitespace) {
                self.pos += 1;
            }
            match self.peek() {
                None => {
                    if self.len >= self.out.len() {
                        return Err(error!(LineTooLong));
                    }
                    self.out[self.len] = Token::Eol as u8;
                    self.len += 1;
                    return Ok(());
                }
                Some(b) if is_number_char(b) => self.number()?,
                Some(b) if b.is_ascii_alphabetic() => self.word()?,
                Some(b'"') => self.string()?,
                Some(_) => self.operator()?,
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Reserves `n` bytes of output, always keeping one for `Eol`.
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        if self.len + n >= self.out.len() {
            return Err(error!(LineTooLong));
        }
        let start = self.len;
        self.len += n;
        Ok(&mut self.out[start..self.len])
    }

    fn emit(&mut self, token: Token) -> Result<()> {
        self.reserve(1)?[0] = token as u8;
        Ok(())
    }

    fn number(&mut self) -> Result<()> {
        let start = self.pos;
        let mut decimal = false;
        while let Some(b) = self.peek() {
            if !is_number_char(b) {
                break;
            }
            if self.pos - start == MAX_NUMBER_LEN {
                return Err(error!(BadNumber));
            }
            if b == b'.' {
                if decimal {
                    return Err(error!(BadNumber));
                }
                decimal = true;
            }
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.input[start..self.pos]);
        if !decimal {
            if let Ok(int) = text.parse::<i32>() {
                let buf = self.reserve(1 + INTEGER_SIZE)?;
                buf[0] = Token::Integer as u8;
                buf[1..].copy_from_slice(&int.to_le_bytes());
                return Ok(());
            }
        }
        let num = text.parse::<f32>().unwrap_or(0.0);
        let buf = self.reserve(1 + NUMBER_SIZE)?;
        buf[0] = Token::Number as u8;
        buf[1..].copy_from_slice(&num.to_le_bytes());
        Ok(())
    }

    fn word(&mut self) -> Result<()> {
        let start = self.pos;
        while self.peek().map_or(false, is_word_char) {
            self.pos += 1;
        }
        let input = self.input;
        let word = &input[start..self.pos];
        if let Some(token) = std::str::from_utf8(word).ok().and_then(Token::keyword) {
            self.emit(token)?;
            if token == Token::Rem {
                self.remark()?;
            }
            return Ok(());
        }
        if let Some(dollar) = word.iter().position(|&b| b == b'$') {
            if dollar != word.len() - 1 {
                return Err(error!(UnexpectedInput));
            }
        }
        let ident = Ident::new(word);
        let buf = self.reserve(1 + ident.encoded_len())?;
        buf[0] = Token::Ident as u8;
        ident.encode(&mut buf[1..]);
        Ok(())
    }

    fn remark(&mut self) -> Result<()> {
        while self.peek().map_or(false, is_basic_whitespace) {
            self.pos += 1;
        }
        let input = self.input;
        let text = &input[self.pos..];
        self.pos = self.input.len();
        let buf = self.reserve(text.len() + 2)?;
        buf[0] = Token::String as u8;
        buf[1..=text.len()].copy_from_slice(text);
        buf[text.len() + 1] = 0;
        Ok(())
    }

    fn string(&mut self) -> Result<()> {
        self.emit(Token::String)?;
        self.pos += 1;
        loop {
            let b = match self.peek() {
                None => return Err(error!(UnterminatedString)),
                Some(b) => b,
            };
            self.pos += 1;
            if b == b'"' {
                if self.peek() == Some(b'"') {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.reserve(1)?[0] = b;
        }
        self.reserve(1)?[0] = 0;
        Ok(())
    }

    fn operator(&mut self) -> Result<()> {
        match Token::operator(&self.input[self.pos..]) {
            Some(token) => {
                self.pos += token.text().len();
                self.emit(token)
            }
            None => Err(error!(UnexpectedInput)),
        }
    }
}

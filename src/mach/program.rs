use super::Arena;
use crate::error;
use crate::lang::{Error, Line, Token};
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// Bytes before the tokens of a line record: length and line number.
pub const RECORD_HEADER: usize = 4;

/// ## Program store
///
/// Line records `{len: u16, line: u16, tokens.., Eol}` packed in
/// ascending line order from offset zero.

impl Arena {
    /// First record with a line number `>= number`, or `prog_end`.
    pub fn find_line(&self, number: u16) -> usize {
        let mut at = 0;
        while at < self.prog_end && self.line_number_at(at) < number {
            at = self.next_line(at);
        }
        at
    }

    pub fn line_number_at(&self, at: usize) -> u16 {
        self.read_u16(at + 2)
    }

    pub fn next_line(&self, at: usize) -> usize {
        at + self.read_u16(at) as usize
    }

    /// Token bytes of the record at `at`, `Eol` included.
    pub fn line_tokens(&self, at: usize) -> Range<usize> {
        at + RECORD_HEADER..self.next_line(at)
    }

    pub fn is_program_end(&self, at: usize) -> bool {
        at >= self.prog_end
    }

    /// Inserts or replaces line `number`. A lone `Eol` deletes the line.
    /// Capacity is checked against the net change before anything moves.
    pub fn insert_line(&mut self, number: u16, tokens: &[u8]) -> Result<()> {
        debug_assert_eq!(tokens.last(), Some(&(Token::Eol as u8)));
        let at = self.find_line(number);
        let old_len = if !self.is_program_end(at) && self.line_number_at(at) == number {
            self.read_u16(at) as usize
        } else {
            0
        };
        let replacing = tokens.len() > 1;
        let new_len = if replacing {
            RECORD_HEADER + tokens.len()
        } else {
            0
        };
        if new_len > old_len && self.prog_end + new_len - old_len > self.var_start {
            return Err(error!(OutOfMemory));
        }
        if new_len > u16::MAX as usize {
            return Err(error!(LineTooLong));
        }
        if old_len > 0 {
            self.delete_record(at);
        }
        if replacing {
            self.mem.copy_within(at..self.prog_end, at + new_len);
            self.write_u16(at, new_len as u16);
            self.write_u16(at + 2, number);
            self.mem[at + RECORD_HEADER..at + new_len].copy_from_slice(tokens);
            self.prog_end += new_len;
        }
        self.reset_stack();
        self.check();
        Ok(())
    }

    fn delete_record(&mut self, at: usize) {
        let len = self.read_u16(at) as usize;
        self.mem.copy_within(at + len..self.prog_end, at);
        self.prog_end -= len;
    }

    pub fn program_bytes(&self) -> &[u8] {
        &self.mem[..self.prog_end]
    }

    /// Replaces the program with a saved image. Variables are cleared.
    /// A malformed image leaves the arena empty.
    pub fn load_program(&mut self, image: &[u8]) -> Result<()> {
        self.reset();
        if image.len() > self.capacity() {
            return Err(error!(OutOfMemory));
        }
        validate_image(image)?;
        self.mem[..image.len()].copy_from_slice(image);
        self.prog_end = image.len();
        self.reset_stack();
        self.check();
        Ok(())
    }
}

fn validate_image(image: &[u8]) -> Result<()> {
    let bad = || error!(BadParameter; "CORRUPT PROGRAM");
    let mut at = 0;
    let mut last = 0;
    while at < image.len() {
        let header = image.get(at..at + RECORD_HEADER).ok_or_else(bad)?;
        let len = u16::from_le_bytes([header[0], header[1]]) as usize;
        let number = u16::from_le_bytes([header[2], header[3]]);
        if number <= last || len <= RECORD_HEADER + 1 || at + len > image.len() {
            return Err(bad());
        }
        let tokens = &image[at + RECORD_HEADER..at + len];
        match Line::validate(tokens) {
            Ok(n) if n == tokens.len() => {}
            _ => return Err(bad()),
        }
        last = number;
        at += len;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{lex, ErrorCode};
    use crate::mach::arena::MIN_MEMORY_SIZE;

    fn tokens(s: &str) -> Vec<u8> {
        let mut buf = [0; 128];
        let len = lex(s, &mut buf).unwrap();
        buf[..len].to_vec()
    }

    fn numbers(arena: &Arena) -> Vec<u16> {
        let mut v = vec![];
        let mut at = 0;
        while !arena.is_program_end(at) {
            v.push(arena.line_number_at(at));
            at = arena.next_line(at);
        }
        v
    }

    #[test]
    fn test_insert_in_order() {
        let mut arena = Arena::new(256);
        arena.insert_line(20, &tokens("cls")).unwrap();
        arena.insert_line(10, &tokens("cls")).unwrap();
        arena.insert_line(30, &tokens("cls")).unwrap();
        assert_eq!(numbers(&arena), vec![10, 20, 30]);
        assert_eq!(arena.find_line(15), arena.next_line(0));
        assert!(arena.is_program_end(arena.find_line(31)));
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut arena = Arena::new(256);
        arena.insert_line(10, &tokens("print 1")).unwrap();
        let once = arena.program_bytes().to_vec();
        arena.insert_line(10, &tokens("print 1")).unwrap();
        assert_eq!(arena.program_bytes(), &once[..]);
    }

    #[test]
    fn test_empty_line_deletes() {
        let mut arena = Arena::new(256);
        arena.insert_line(10, &tokens("cls")).unwrap();
        arena.insert_line(20, &tokens("cls")).unwrap();
        arena.insert_line(10, &tokens("")).unwrap();
        assert_eq!(numbers(&arena), vec![20]);
    }

    #[test]
    fn test_out_of_memory_leaves_program() {
        let mut arena = Arena::new(MIN_MEMORY_SIZE);
        arena.insert_line(10, &tokens("cls")).unwrap();
        let before = arena.regions();
        let long = tokens(r#"print "0123456789012345678901234567890123456789012345678901234567890""#);
        assert_eq!(
            arena.insert_line(20, &long).unwrap_err().code(),
            ErrorCode::OutOfMemory
        );
        assert_eq!(arena.regions(), before);
        assert_eq!(numbers(&arena), vec![10]);
    }

    #[test]
    fn test_load_validates() {
        let mut arena = Arena::new(256);
        arena.insert_line(10, &tokens("print 1")).unwrap();
        arena.insert_line(20, &tokens("goto 10")).unwrap();
        let image = arena.program_bytes().to_vec();
        let mut other = Arena::new(256);
        other.load_program(&image).unwrap();
        assert_eq!(other.program_bytes(), &image[..]);
        let mut broken = image.clone();
        broken[2] = 30;
        assert_eq!(
            other.load_program(&broken).unwrap_err().code(),
            ErrorCode::BadParameter
        );
        assert!(other.program_bytes().is_empty());
        assert!(other.load_program(&image[..image.len() - 1]).is_err());
    }
}

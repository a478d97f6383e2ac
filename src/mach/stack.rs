use super::Arena;
use crate::error;
use crate::lang::{lex, Error};
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

const NUM_SIZE: usize = 4;
const LEN_SIZE: usize = 2;

/// ## Evaluation stack
///
/// Numbers are four byte floats. Strings are their bytes, a NUL and a
/// trailing u16 length which counts the NUL, so popping never scans.
/// Popped bytes stay in memory until the next push overwrites them.

impl Arena {
    fn grow_stack(&mut self, n: usize) -> Result<usize> {
        if self.stack_end + n > self.var_start {
            return Err(error!(OutOfMemory));
        }
        let at = self.stack_end;
        self.stack_end += n;
        Ok(at)
    }

    pub fn push_num(&mut self, val: f32) -> Result<()> {
        let at = self.grow_stack(NUM_SIZE)?;
        self.write_f32(at, val);
        Ok(())
    }

    pub fn pop_num(&mut self) -> f32 {
        debug_assert!(self.stack_end >= self.stack_start + NUM_SIZE);
        self.stack_end -= NUM_SIZE;
        self.read_f32(self.stack_end)
    }

    pub fn push_str(&mut self, s: &[u8]) -> Result<()> {
        let at = self.grow_stack(s.len() + 1 + LEN_SIZE)?;
        self.mem[at..at + s.len()].copy_from_slice(s);
        self.finish_str(at, s.len());
        Ok(())
    }

    /// Pushes a copy of bytes already in the arena, for example a string
    /// literal in the program or a variable's value.
    pub fn push_str_within(&mut self, src: Range<usize>) -> Result<()> {
        let len = src.len();
        let at = self.grow_stack(len + 1 + LEN_SIZE)?;
        self.mem.copy_within(src, at);
        self.finish_str(at, len);
        Ok(())
    }

    fn finish_str(&mut self, at: usize, len: usize) {
        self.mem[at + len] = 0;
        self.write_u16(at + len + 1, len as u16 + 1);
    }

    /// Bytes of the top string, NUL excluded.
    pub fn peek_str(&self) -> Range<usize> {
        let len = self.read_u16(self.stack_end - LEN_SIZE) as usize;
        let start = self.stack_end - LEN_SIZE - len;
        start..start + len - 1
    }

    /// Pops the top string. The returned range stays readable until the
    /// next push.
    pub fn pop_str(&mut self) -> Range<usize> {
        let range = self.peek_str();
        debug_assert!(range.start >= self.stack_start);
        self.stack_end = range.start;
        range
    }

    /// Joins the two top strings into one, in place.
    pub fn concat_top2(&mut self) {
        let second = self.pop_str();
        let first = self.pop_str();
        let len = first.len() + second.len();
        self.mem.copy_within(second, first.end);
        self.stack_end = first.start + len + 1 + LEN_SIZE;
        self.finish_str(first.start, len);
    }

    /// Replaces the top string with `len` of its bytes from `start`.
    /// The string can only shrink.
    pub fn retain_top_str(&mut self, start: usize, len: usize) {
        let top = self.peek_str();
        debug_assert!(start + len <= top.len());
        self.mem
            .copy_within(top.start + start..top.start + start + len, top.start);
        self.stack_end = top.start + len + 1 + LEN_SIZE;
        self.finish_str(top.start, len);
    }

    /// `LEFT$`: keeps at most `n` leading bytes.
    pub fn left_str(&mut self, n: usize) {
        let len = self.peek_str().len();
        self.retain_top_str(0, n.min(len));
    }

    /// `RIGHT$`: keeps at most `n` trailing bytes.
    pub fn right_str(&mut self, n: usize) {
        let len = self.peek_str().len();
        let n = n.min(len);
        self.retain_top_str(len - n, n);
    }

    /// `MID$`: one-based `start`, clamped to the string.
    pub fn mid_str(&mut self, start: usize, n: usize) {
        debug_assert!(start >= 1);
        let len = self.peek_str().len();
        let skip = (start - 1).min(len);
        self.retain_top_str(skip, n.min(len - skip));
    }

    /// Tokenizes the top string into the free space above it and leaves
    /// the tokens on the stack. Returns where they start.
    pub fn push_tokens_of_top_str(&mut self) -> Result<usize> {
        let text = self.peek_str();
        let start = self.stack_end;
        let (below, above) = self.mem.split_at_mut(start);
        let len = lex(&below[text], &mut above[..self.var_start - start])?;
        self.stack_end += len;
        Ok(start)
    }

    /// Current top of stack, for restoring after a failed evaluation.
    pub fn stack_mark(&self) -> usize {
        self.stack_end
    }

    pub fn restore_stack(&mut self, mark: usize) {
        debug_assert!(mark >= self.stack_start && mark <= self.var_start);
        self.stack_end = mark;
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_end - self.stack_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(arena: &Arena) -> Vec<u8> {
        arena.bytes(arena.peek_str()).to_vec()
    }

    #[test]
    fn test_numbers() {
        let mut arena = Arena::new(64);
        arena.push_num(1.0).unwrap();
        arena.push_num(2.0).unwrap();
        assert_eq!(arena.pop_num(), 2.0);
        assert_eq!(arena.pop_num(), 1.0);
        assert_eq!(arena.stack_depth(), 0);
    }

    #[test]
    fn test_overflow_unchanged() {
        let mut arena = Arena::new(64);
        for _ in 0..16 {
            arena.push_num(0.0).unwrap();
        }
        let before = arena.regions();
        assert!(arena.push_num(0.0).is_err());
        assert!(arena.push_str(b"x").is_err());
        assert_eq!(arena.regions(), before);
    }

    #[test]
    fn test_concat() {
        let mut arena = Arena::new(64);
        arena.push_num(9.0).unwrap();
        arena.push_str(b"AB").unwrap();
        arena.push_str(b"CD").unwrap();
        arena.concat_top2();
        assert_eq!(top(&arena), b"ABCD");
        arena.pop_str();
        assert_eq!(arena.pop_num(), 9.0);
    }

    #[test]
    fn test_substrings_clamp() {
        let mut arena = Arena::new(64);
        arena.push_str(b"HELLO").unwrap();
        arena.left_str(9);
        assert_eq!(top(&arena), b"HELLO");
        arena.right_str(3);
        assert_eq!(top(&arena), b"LLO");
        arena.push_str(b"ABCDEF").unwrap();
        arena.mid_str(2, 3);
        assert_eq!(top(&arena), b"BCD");
        arena.mid_str(9, 2);
        assert_eq!(top(&arena), b"");
        arena.pop_str();
        assert_eq!(top(&arena), b"LLO");
    }

    #[test]
    fn test_mark() {
        let mut arena = Arena::new(64);
        arena.push_str(b"2+").unwrap();
        let mark = arena.stack_mark();
        arena.push_num(1.0).unwrap();
        arena.restore_stack(mark);
        assert_eq!(top(&arena), b"2+");
    }
}

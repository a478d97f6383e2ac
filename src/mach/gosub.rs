use super::Arena;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

const FRAME_SIZE: usize = 4;

/// ## Gosub stack
///
/// Return frames `{line: u16, stmt: u16}` sit directly above the
/// variables. Pushing moves the whole variable region down one frame.

impl Arena {
    pub fn push_gosub(&mut self, line: u16, stmt: u16) -> Result<()> {
        if self.var_start < self.stack_end + FRAME_SIZE {
            return Err(error!(OutOfMemory));
        }
        self.mem
            .copy_within(self.var_start..self.var_end, self.var_start - FRAME_SIZE);
        self.var_start -= FRAME_SIZE;
        self.var_end -= FRAME_SIZE;
        self.gosub_start = self.var_end;
        self.write_u16(self.gosub_start, line);
        self.write_u16(self.gosub_start + 2, stmt);
        self.check();
        Ok(())
    }

    /// Pops the newest frame, `None` when there is none.
    pub fn pop_gosub(&mut self) -> Option<(u16, u16)> {
        if self.gosub_start == self.gosub_end {
            return None;
        }
        let frame = (
            self.read_u16(self.gosub_start),
            self.read_u16(self.gosub_start + 2),
        );
        self.mem
            .copy_within(self.var_start..self.var_end, self.var_start + FRAME_SIZE);
        self.var_start += FRAME_SIZE;
        self.var_end += FRAME_SIZE;
        self.gosub_start = self.var_end;
        self.check();
        Some(frame)
    }

    pub fn gosub_depth(&self) -> usize {
        (self.gosub_end - self.gosub_start) / FRAME_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Ident;

    #[test]
    fn test_frames_keep_variables() {
        let mut arena = Arena::new(128);
        let a = Ident::new(b"A");
        arena.store_num(&a, 4.0).unwrap();
        arena.push_gosub(10, 1).unwrap();
        arena.push_gosub(20, 2).unwrap();
        assert_eq!(arena.gosub_depth(), 2);
        assert_eq!(arena.lookup_num(&a), Ok(4.0));
        assert_eq!(arena.pop_gosub(), Some((20, 2)));
        assert_eq!(arena.pop_gosub(), Some((10, 1)));
        assert_eq!(arena.pop_gosub(), None);
        assert_eq!(arena.gosub_depth(), 0);
        assert_eq!(arena.lookup_num(&a), Ok(4.0));
    }

    #[test]
    fn test_overflow() {
        let mut arena = Arena::new(64);
        for i in 0..16 {
            arena.push_gosub(i, 0).unwrap();
        }
        let before = arena.regions();
        assert!(arena.push_gosub(99, 0).is_err());
        assert_eq!(arena.regions(), before);
    }
}

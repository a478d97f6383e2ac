use std::ops::Range;

/// Default arena size in bytes.
pub const MEMORY_SIZE: usize = 8192;
pub const MIN_MEMORY_SIZE: usize = 64;
/// Offsets are stored in u16 fields.
pub const MAX_MEMORY_SIZE: usize = u16::MAX as usize;

/// ## Interpreter memory
///
/// One fixed buffer shared by four regions. The program grows up from
/// zero, the evaluation stack sits right after it, variables grow down
/// from the end and gosub frames live above the variables:
///
/// ```text
/// 0        prog_end  stack_end      var_start   var_end    gosub_end
/// |program |stack ...|   free       |variables  |gosub     |
/// ```
///
/// Region operations live with their region: `program`, `stack`, `var`
/// and `gosub` each add methods to `Arena`.

pub struct Arena {
    pub(super) mem: Box<[u8]>,
    pub(super) prog_end: usize,
    pub(super) stack_start: usize,
    pub(super) stack_end: usize,
    pub(super) var_start: usize,
    pub(super) var_end: usize,
    pub(super) gosub_start: usize,
    pub(super) gosub_end: usize,
}

/// Snapshot of the region cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub prog_end: usize,
    pub stack_start: usize,
    pub stack_end: usize,
    pub var_start: usize,
    pub var_end: usize,
    pub gosub_start: usize,
    pub gosub_end: usize,
    pub capacity: usize,
}

impl Regions {
    pub fn is_ordered(&self) -> bool {
        self.prog_end <= self.stack_start
            && self.stack_start <= self.stack_end
            && self.stack_end <= self.var_start
            && self.var_start <= self.var_end
            && self.var_end == self.gosub_start
            && self.gosub_start <= self.gosub_end
            && self.gosub_end <= self.capacity
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Arena {:?}", self.regions())
    }
}

impl Arena {
    pub fn new(capacity: usize) -> Arena {
        let capacity = capacity.max(MIN_MEMORY_SIZE).min(MAX_MEMORY_SIZE);
        Arena {
            mem: vec![0; capacity].into_boxed_slice(),
            prog_end: 0,
            stack_start: 0,
            stack_end: 0,
            var_start: capacity,
            var_end: capacity,
            gosub_start: capacity,
            gosub_end: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.mem.len()
    }

    pub fn regions(&self) -> Regions {
        Regions {
            prog_end: self.prog_end,
            stack_start: self.stack_start,
            stack_end: self.stack_end,
            var_start: self.var_start,
            var_end: self.var_end,
            gosub_start: self.gosub_start,
            gosub_end: self.gosub_end,
            capacity: self.capacity(),
        }
    }

    /// Bytes between the top of the stack and the variables.
    pub fn free(&self) -> usize {
        self.var_start - self.stack_end
    }

    /// Forgets the program, variables, gosub frames and stack.
    pub fn reset(&mut self) {
        self.prog_end = 0;
        self.clear_variables();
        self.reset_stack();
    }

    /// Forgets variables and gosub frames.
    pub fn clear_variables(&mut self) {
        let capacity = self.capacity();
        self.var_start = capacity;
        self.var_end = capacity;
        self.gosub_start = capacity;
        self.gosub_end = capacity;
        self.check();
    }

    pub fn reset_stack(&mut self) {
        self.stack_start = self.prog_end;
        self.stack_end = self.prog_end;
    }

    pub fn bytes(&self, range: Range<usize>) -> &[u8] {
        &self.mem[range]
    }

    pub(super) fn read_u16(&self, at: usize) -> u16 {
        u16::from_le_bytes([self.mem[at], self.mem[at + 1]])
    }

    pub(super) fn write_u16(&mut self, at: usize, val: u16) {
        self.mem[at..at + 2].copy_from_slice(&val.to_le_bytes());
    }

    pub(super) fn read_f32(&self, at: usize) -> f32 {
        let mut raw = [0; 4];
        raw.copy_from_slice(&self.mem[at..at + 4]);
        f32::from_le_bytes(raw)
    }

    pub(super) fn write_f32(&mut self, at: usize, val: f32) {
        self.mem[at..at + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Position of the NUL ending the string that starts at `at`.
    pub(super) fn nul_from(&self, at: usize) -> usize {
        self.mem[at..]
            .iter()
            .position(|&b| b == 0)
            .map_or(self.capacity(), |n| at + n)
    }

    #[inline]
    pub(super) fn check(&self) {
        debug_assert!(self.regions().is_ordered(), "{:?}", self.regions());
    }
}

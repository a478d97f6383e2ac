use super::Arena;
use crate::error;
use crate::lang::{Error, Ident};
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// Record header: length and kind.
const VAR_HEADER: usize = 3;
const FOR_NEXT_SIZE: usize = 3 * 4 + 2 * 2;

/// ## Variable kinds
///
/// Bit flags so a lookup can accept several kinds at once.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kind(u8);

impl Kind {
    pub const NUMBER: Kind = Kind(0x01);
    pub const FOR_NEXT: Kind = Kind(0x02);
    pub const NUM_ARRAY: Kind = Kind(0x04);
    pub const STRING: Kind = Kind(0x08);
    pub const STR_ARRAY: Kind = Kind(0x10);
    /// Plain numbers and loop counters share one name space.
    pub const SCALAR: Kind = Kind(0x01 | 0x02);

    fn intersects(self, other: Kind) -> bool {
        self.0 & other.0 != 0
    }

    pub fn array(is_string: bool) -> Kind {
        if is_string {
            Kind::STR_ARRAY
        } else {
            Kind::NUM_ARRAY
        }
    }
}

/// Loop state stored by FOR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForNext {
    pub val: f32,
    pub step: f32,
    pub end: f32,
    pub line: u16,
    pub stmt: u16,
}

impl ForNext {
    /// True while the loop should run again.
    pub fn continues(&self) -> bool {
        if self.step >= 0.0 {
            self.val <= self.end
        } else {
            self.val >= self.end
        }
    }
}

/// ## Variable store
///
/// Records `{len: u16, kind: u8, name.., NUL, payload}` packed from
/// `var_start` up to `var_end`. New records are added at the bottom.
/// Fixed size values are updated in place, anything else is deleted
/// and added again after checking the net size change.

impl Arena {
    pub fn find_var(&self, ident: &Ident, mask: Kind) -> Option<usize> {
        let mut at = self.var_start;
        while at < self.var_end {
            let kind = Kind(self.mem[at + 2]);
            if kind.intersects(mask) {
                let name = at + VAR_HEADER..self.nul_from(at + VAR_HEADER);
                if ident.matches(&self.mem[name]) {
                    return Some(at);
                }
            }
            at += self.read_u16(at) as usize;
        }
        None
    }

    pub fn var_kind(&self, at: usize) -> Kind {
        Kind(self.mem[at + 2])
    }

    fn var_payload(&self, at: usize) -> usize {
        self.nul_from(at + VAR_HEADER) + 1
    }

    fn var_size(ident: &Ident, payload: usize) -> usize {
        VAR_HEADER + ident.as_bytes().len() + 1 + payload
    }

    /// Fails unless replacing `old` bytes of variables with `new` bytes
    /// keeps clear of `limit`, the highest stack byte still in use.
    fn check_var_room(&self, old: usize, new: usize, limit: usize) -> Result<()> {
        if new > old && self.var_start < limit + (new - old) {
            return Err(error!(OutOfMemory));
        }
        Ok(())
    }

    fn delete_var(&mut self, at: usize) {
        let len = self.read_u16(at) as usize;
        self.mem.copy_within(self.var_start..at, self.var_start + len);
        self.var_start += len;
    }

    /// Adds a record at the bottom of the variables. The caller has
    /// checked the room. Returns the payload offset.
    fn add_var(&mut self, ident: &Ident, kind: Kind, payload: usize) -> usize {
        let size = Arena::var_size(ident, payload);
        self.var_start -= size;
        let at = self.var_start;
        self.write_u16(at, size as u16);
        self.mem[at + 2] = kind.0;
        let name = ident.as_bytes();
        let name_at = at + VAR_HEADER;
        self.mem[name_at..name_at + name.len()].copy_from_slice(name);
        self.mem[name_at + name.len()] = 0;
        self.check();
        name_at + name.len() + 1
    }

    /// Replaces any record found under `mask` with a fresh one.
    fn realloc_var(
        &mut self,
        ident: &Ident,
        mask: Kind,
        kind: Kind,
        payload: usize,
        limit: usize,
    ) -> Result<usize> {
        let existing = self.find_var(ident, mask);
        let old = existing.map_or(0, |at| self.read_u16(at) as usize);
        self.check_var_room(old, Arena::var_size(ident, payload), limit)?;
        if let Some(at) = existing {
            self.delete_var(at);
        }
        Ok(self.add_var(ident, kind, payload))
    }

    pub fn lookup_num(&self, ident: &Ident) -> Result<f32> {
        match self.find_var(ident, Kind::SCALAR) {
            Some(at) => Ok(self.read_f32(self.var_payload(at))),
            None => Err(error!(VariableNotFound)),
        }
    }

    pub fn store_num(&mut self, ident: &Ident, val: f32) -> Result<()> {
        let at = match self.find_var(ident, Kind::SCALAR) {
            Some(at) => self.var_payload(at),
            None => {
                self.check_var_room(0, Arena::var_size(ident, 4), self.stack_end)?;
                self.add_var(ident, Kind::NUMBER, 4)
            }
        };
        self.write_f32(at, val);
        Ok(())
    }

    pub fn store_for_next(&mut self, ident: &Ident, state: &ForNext) -> Result<()> {
        let at = self.realloc_var(
            ident,
            Kind::SCALAR,
            Kind::FOR_NEXT,
            FOR_NEXT_SIZE,
            self.stack_end,
        )?;
        self.write_f32(at, state.val);
        self.write_f32(at + 4, state.step);
        self.write_f32(at + 8, state.end);
        self.write_u16(at + 12, state.line);
        self.write_u16(at + 14, state.stmt);
        Ok(())
    }

    pub fn lookup_for_next(&self, ident: &Ident) -> Result<ForNext> {
        let at = self
            .find_var(ident, Kind::SCALAR)
            .ok_or_else(|| error!(VariableNotFound))?;
        if self.var_kind(at) != Kind::FOR_NEXT {
            return Err(error!(NextWithoutFor));
        }
        let p = self.var_payload(at);
        Ok(ForNext {
            val: self.read_f32(p),
            step: self.read_f32(p + 4),
            end: self.read_f32(p + 8),
            line: self.read_u16(p + 12),
            stmt: self.read_u16(p + 14),
        })
    }

    /// Value bytes of a string variable, NUL excluded.
    pub fn lookup_str(&self, ident: &Ident) -> Result<Range<usize>> {
        match self.find_var(ident, Kind::STRING) {
            Some(at) => {
                let p = self.var_payload(at);
                Ok(p..self.nul_from(p))
            }
            None => Err(error!(VariableNotFound)),
        }
    }

    /// Pops the top string into a string variable.
    pub fn store_str(&mut self, ident: &Ident) -> Result<()> {
        let limit = self.stack_end;
        let src = self.peek_str();
        let len = src.len();
        let at = self.realloc_var(ident, Kind::STRING, Kind::STRING, len + 1, limit)?;
        self.mem.copy_within(src, at);
        self.mem[at + len] = 0;
        self.pop_str();
        Ok(())
    }

    /// Pops the dimension count and dimensions, then creates a zeroed
    /// array. An existing array of the same name is replaced.
    pub fn create_array(&mut self, ident: &Ident) -> Result<()> {
        let mark = self.stack_mark();
        let count = self.pop_num() as i32;
        let mut elements: usize = 1;
        for _ in 0..count {
            let dim = self.pop_num() as i32;
            if dim < 1 {
                return Err(error!(ArraySubscriptOutOfRange));
            }
            elements = elements
                .checked_mul(dim as usize)
                .filter(|&n| n <= self.capacity())
                .ok_or_else(|| error!(OutOfMemory))?;
        }
        let count = count.max(0) as usize;
        let element_size = if ident.is_string() { 1 } else { 4 };
        let payload = 2 + 2 * count + element_size * elements;
        if payload > self.capacity() {
            return Err(error!(OutOfMemory));
        }
        let kind = Kind::array(ident.is_string());
        let mut at = self.realloc_var(ident, kind, kind, payload, mark)?;
        self.write_u16(at, count as u16);
        at += 2;
        self.restore_stack(mark);
        self.pop_num();
        for _ in 0..count {
            let dim = self.pop_num() as u16;
            self.write_u16(at, dim);
            at += 2;
        }
        for b in &mut self.mem[at..at + element_size * elements] {
            *b = 0;
        }
        Ok(())
    }

    /// Pops the index count and indexes, returns the element number and
    /// the offset of the first element.
    fn array_element(&mut self, ident: &Ident) -> Result<(usize, usize)> {
        let at = self
            .find_var(ident, Kind::array(ident.is_string()))
            .ok_or_else(|| error!(VariableNotFound))?;
        let mut p = self.var_payload(at);
        let dims = self.read_u16(p) as usize;
        p += 2;
        let given = self.pop_num() as i32;
        if given < 0 || given as usize != dims {
            return Err(error!(WrongArrayDimensions));
        }
        let mut offset = 0;
        let mut base = 1;
        for _ in 0..dims {
            let index = self.pop_num() as i32;
            let dim = self.read_u16(p) as usize;
            p += 2;
            if index < 1 || index as usize > dim {
                return Err(error!(ArraySubscriptOutOfRange));
            }
            offset += base * (index as usize - 1);
            base *= dim;
        }
        Ok((offset, p))
    }

    /// Start of element `n` in a string array's packed elements.
    fn str_element(&self, first: usize, n: usize) -> usize {
        let mut p = first;
        for _ in 0..n {
            p = self.nul_from(p) + 1;
        }
        p
    }

    pub fn lookup_num_element(&mut self, ident: &Ident) -> Result<f32> {
        let (offset, first) = self.array_element(ident)?;
        Ok(self.read_f32(first + 4 * offset))
    }

    pub fn store_num_element(&mut self, ident: &Ident, val: f32) -> Result<()> {
        let (offset, first) = self.array_element(ident)?;
        self.write_f32(first + 4 * offset, val);
        Ok(())
    }

    pub fn lookup_str_element(&mut self, ident: &Ident) -> Result<Range<usize>> {
        let (offset, first) = self.array_element(ident)?;
        let p = self.str_element(first, offset);
        Ok(p..self.nul_from(p))
    }

    /// Stack holds the indexes, their count, then the new value on top.
    /// The variables below the element shift by the change in length.
    pub fn store_str_element(&mut self, ident: &Ident) -> Result<()> {
        let limit = self.stack_end;
        let src = self.pop_str();
        let record = self
            .find_var(ident, Kind::STR_ARRAY)
            .ok_or_else(|| error!(VariableNotFound))?;
        let (offset, first) = self.array_element(ident)?;
        let p = self.str_element(first, offset);
        let old = self.nul_from(p) - p;
        let new = src.len();
        self.check_var_room(old, new, limit)?;
        let record_len = self.read_u16(record) as usize + new - old;
        let var_start = self.var_start + old - new;
        self.mem.copy_within(self.var_start..p, var_start);
        let p = p + old - new;
        let record = record + old - new;
        self.var_start = var_start;
        self.write_u16(record, record_len as u16);
        self.mem.copy_within(src, p);
        self.mem[p + new] = 0;
        self.check();
        Ok(())
    }
}

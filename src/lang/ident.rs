use super::{Error, MAX_IDENT_LEN};

type Result<T> = std::result::Result<T, Error>;

/// ## Variable names
///
/// Up to eight significant characters followed by an optional `$`
/// which marks a string variable. Case is kept for listing but every
/// comparison ignores it.

#[derive(Clone, Copy)]
pub struct Ident {
    bytes: [u8; MAX_IDENT_LEN + 1],
    len: u8,
}

impl Ident {
    /// Builds a name from a lexed word. Characters past the significant
    /// length are dropped, a trailing `$` survives.
    pub fn new(word: &[u8]) -> Ident {
        let (stem, dollar) = match word.split_last() {
            Some((b'$', stem)) => (stem, true),
            _ => (word, false),
        };
        let mut bytes = [0; MAX_IDENT_LEN + 1];
        let mut len = stem.len().min(MAX_IDENT_LEN);
        bytes[..len].copy_from_slice(&stem[..len]);
        if dollar {
            bytes[len] = b'$';
            len += 1;
        }
        Ident {
            bytes,
            len: len as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn is_string(&self) -> bool {
        self.as_bytes().last() == Some(&b'$')
    }

    pub fn matches(&self, other: &[u8]) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other)
    }

    /// Size of the token payload written by `encode`.
    pub fn encoded_len(&self) -> usize {
        self.len as usize + 1
    }

    /// Writes the name with the high bit set on its last byte, then the
    /// string flag.
    pub fn encode(&self, out: &mut [u8]) {
        let len = self.len as usize;
        out[..len].copy_from_slice(self.as_bytes());
        out[len - 1] |= 0x80;
        out[len] = self.is_string() as u8;
    }

    /// Reads a payload written by `encode`. Returns the name and the
    /// number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Ident, usize)> {
        let end = bytes
            .iter()
            .position(|&b| b >= 0x80)
            .ok_or_else(|| error!(BadCommand; "CORRUPT IDENTIFIER"))?;
        if end >= MAX_IDENT_LEN + 1 || end + 1 >= bytes.len() {
            return Err(error!(BadCommand; "CORRUPT IDENTIFIER"));
        }
        let mut ident = Ident {
            bytes: [0; MAX_IDENT_LEN + 1],
            len: end as u8 + 1,
        };
        ident.bytes[..=end].copy_from_slice(&bytes[..=end]);
        ident.bytes[end] &= 0x7F;
        if ident.is_string() != (bytes[end + 1] != 0) {
            return Err(error!(BadCommand; "CORRUPT IDENTIFIER"));
        }
        Ok((ident, end + 2))
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Ident) -> bool {
        self.matches(other.as_bytes())
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl std::fmt::Debug for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Ident({})", self)
    }
}

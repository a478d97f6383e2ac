/*!
# Rust Language Module

This Rust module turns BASIC text into token bytes and back.
Nothing here touches the interpreter memory.

*/

/// Program line number. `None` is a direct mode statement.
pub type LineNumber = Option<u16>;

/// Significant characters in a variable name, not counting `$`.
pub const MAX_IDENT_LEN: usize = 8;
/// Longest numeric literal the lexer accepts.
pub const MAX_NUMBER_LEN: usize = 10;
/// Size of the direct mode token buffer.
pub const TOKEN_BUF_SIZE: usize = 128;

#[macro_use]
mod error;
mod ident;
mod lex;
pub mod line;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use ident::Ident;
pub use lex::{lex, number_text};
pub use line::{Lexeme, Line};
pub use token::{Descriptor, Token, OPERATORS};

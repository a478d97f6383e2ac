use super::{Host, Runtime};
use crate::lang::{number_text, Lexeme, Line, Token};

/// ## Program listing
///
/// Turns stored tokens back into text. Keywords print in upper case
/// with the spacing from their descriptor, so a listing lexes back to
/// the same tokens.

impl<H: Host> Runtime<H> {
    /// Lists lines from `first` to `last` inclusive. Zero leaves that end
    /// of the range open.
    pub(super) fn list_program(&mut self, first: u16, last: u16) {
        let mut at = 0;
        while !self.arena.is_program_end(at) {
            let number = self.arena.line_number_at(at);
            if (first == 0 || number >= first) && (last == 0 || number <= last) {
                self.host.output_int(number as i32);
                self.host.output_char(b' ');
                let tokens = self.arena.line_tokens(at);
                list_tokens(&mut self.host, self.arena.bytes(tokens));
                self.host.new_line();
            }
            at = self.arena.next_line(at);
        }
    }
}

/// Prints one line of tokens, `Eol` terminated.
pub fn list_tokens<H: Host + ?Sized>(host: &mut H, bytes: &[u8]) {
    let line = Line::new(bytes);
    let mut remark = false;
    for lexeme in line.clone() {
        match lexeme {
            Lexeme::Token(token) => {
                let desc = token.descriptor();
                if desc.pre {
                    host.output_char(b' ');
                }
                host.output_str(desc.text.as_bytes());
                if desc.post {
                    host.output_char(b' ');
                }
                remark = token == Token::Rem;
            }
            Lexeme::Ident(ident) => host.output_str(ident.as_bytes()),
            Lexeme::Integer(num) => host.output_int(num),
            Lexeme::Number(num) => host.output_str(number_text(num).as_bytes()),
            Lexeme::String(range) if remark => host.output_str(line.text(range)),
            Lexeme::String(range) => {
                host.output_char(b'"');
                for &ch in line.text(range) {
                    if ch == b'"' {
                        host.output_char(b'"');
                    }
                    host.output_char(ch);
                }
                host.output_char(b'"');
            }
        }
    }
}

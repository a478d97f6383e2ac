use super::{Arena, Host, Regions, MEMORY_SIZE};
use crate::error;
use crate::lang::{lex, line::decode, Error, ErrorCode, Ident, Lexeme, Token, TOKEN_BUF_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// First byte of a saved program image that runs on `boot`.
pub const AUTORUN: u8 = 0xFC;

/// Where the cursor is reading tokens from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Source {
    Direct,
    Arena,
}

/// The current token and where the next one starts.
#[derive(Debug, Clone)]
pub(super) struct Cursor {
    pub source: Source,
    pub pos: usize,
    pub token: Token,
    pub ident: Ident,
    pub num: f32,
    pub text: Range<usize>,
}

impl Default for Cursor {
    fn default() -> Cursor {
        Cursor {
            source: Source::Direct,
            pos: 0,
            token: Token::Eol,
            ident: Ident::new(b""),
            num: 0.0,
            text: 0..0,
        }
    }
}

/// Execution state shared by the statement interpreter and the run loop.
/// Line 0 is the direct mode buffer.
#[derive(Debug, Default, Clone)]
pub(super) struct Context {
    pub line: u16,
    pub stmt: u16,
    pub jump_line: u16,
    pub jump_stmt: u16,
    pub target_stmt: u16,
    pub break_line: bool,
    pub end_run: bool,
    pub stop: Option<(u16, u16)>,
    pub executing: bool,
}

impl Context {
    fn has_jump(&self) -> bool {
        self.jump_line != 0 || self.jump_stmt != 0
    }
}

/// ## BASIC interpreter
///
/// Owns the arena, the direct mode token buffer and the host. Feed it
/// one line at a time with `enter`. Numbered lines are stored, anything
/// else runs immediately.
pub struct Runtime<H: Host> {
    pub(super) arena: Arena,
    pub(super) direct: Vec<u8>,
    pub(super) cursor: Cursor,
    pub(super) ctx: Context,
    pub(super) host: H,
    pub(super) rng: StdRng,
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H) -> Runtime<H> {
        Runtime::with_capacity(host, MEMORY_SIZE)
    }

    /// Arena size is clamped to what u16 offsets can address.
    pub fn with_capacity(host: H, capacity: usize) -> Runtime<H> {
        Runtime {
            arena: Arena::new(capacity),
            direct: vec![Token::Eol as u8; TOKEN_BUF_SIZE],
            cursor: Cursor::default(),
            ctx: Context::default(),
            host,
            rng: StdRng::from_entropy(),
        }
    }

    /// Makes `RND` repeatable.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn free_memory(&self) -> usize {
        self.arena.free()
    }

    pub fn regions(&self) -> Regions {
        self.arena.regions()
    }

    pub fn program_bytes(&self) -> &[u8] {
        self.arena.program_bytes()
    }

    /// Loads the default program slot and runs it if it was saved with
    /// `SAVE+`. Returns true when a program ran.
    pub fn boot(&mut self) -> Result<bool> {
        match self.host.load_program() {
            Some(image) if image.first() == Some(&AUTORUN) => {
                self.arena.load_program(&image[1..])?;
                self.ctx.stop = None;
                self.enter("RUN")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Tokenizes and processes one line of input.
    pub fn enter(&mut self, line: &str) -> Result<()> {
        self.tokenize(line)?;
        self.process_input()
    }

    /// Tokenizes into the direct mode buffer.
    pub fn tokenize(&mut self, line: &str) -> Result<()> {
        if let Err(e) = lex(line, &mut self.direct) {
            self.direct[0] = Token::Eol as u8;
            return Err(e);
        }
        Ok(())
    }

    /// Stores the tokenized line when it starts with a line number,
    /// otherwise runs it. A syntax error is found before anything runs.
    pub fn process_input(&mut self) -> Result<()> {
        self.ctx.line = 0;
        self.ctx.end_run = false;
        let result = self.run_input().map_err(|e| match self.ctx.line {
            0 => e,
            line => e.in_line_number(Some(line)),
        });
        if let Err(e) = &result {
            if e.code() != ErrorCode::Stop {
                self.ctx.stop = None;
            }
        }
        self.arena.reset_stack();
        self.arena.check();
        result
    }

    fn run_input(&mut self) -> Result<()> {
        self.arena.reset_stack();
        self.start(Source::Direct, 0)?;
        let mut number = None;
        if self.cursor.token == Token::Integer {
            if self.cursor.num > u16::MAX as f32 {
                return Err(error!(LineNumTooBig));
            }
            if self.cursor.num < 1.0 {
                return Err(error!(BadLineNum));
            }
            number = Some((self.cursor.num as u16, self.cursor.pos));
            self.next_token()?;
        }

        self.ctx.executing = false;
        self.ctx.stmt = 0;
        self.ctx.target_stmt = 0;
        self.parse_stmts()?;

        if let Some((number, start)) = number {
            let end = self.cursor.pos;
            return self.arena.insert_line(number, &self.direct[start..end]);
        }

        self.ctx.executing = true;
        self.start(Source::Direct, 0)?;
        let mut at = 0;
        loop {
            self.ctx.stmt = 0;
            if self.ctx.target_stmt != 0 {
                self.ctx.executing = false;
                self.parse_stmts()?;
                self.ctx.executing = true;
                self.ctx.target_stmt = 0;
            }

            self.parse_stmts()?;

            if self.ctx.end_run || (self.ctx.line == 0 && !self.ctx.has_jump()) {
                break;
            }
            if self.ctx.line != 0 && self.ctx.jump_line == 0 && self.ctx.jump_stmt != 0 {
                self.ctx.line = 0;
            }
            if self.ctx.line == 0 && self.ctx.jump_line == 0 {
                self.start(Source::Direct, 0)?;
            } else {
                at = if self.ctx.has_jump() {
                    self.arena.find_line(self.ctx.jump_line)
                } else {
                    self.arena.next_line(at)
                };
                if self.arena.is_program_end(at) {
                    break;
                }
                self.ctx.line = self.arena.line_number_at(at);
                self.start(Source::Arena, self.arena.line_tokens(at).start)?;
                if self.ctx.jump_line != 0
                    && self.ctx.jump_stmt != 0
                    && self.ctx.line > self.ctx.jump_line
                {
                    self.ctx.jump_stmt = 0;
                }
            }
            if self.ctx.jump_stmt != 0 {
                self.ctx.target_stmt = self.ctx.jump_stmt;
            }
            if self.host.interrupted() {
                return Err(error!(BreakPressed));
            }
        }
        Ok(())
    }

    /// Points the cursor at `pos` and reads the first token.
    pub(super) fn start(&mut self, source: Source, pos: usize) -> Result<Token> {
        self.cursor.source = source;
        self.cursor.pos = pos;
        self.next_token()
    }

    pub(super) fn next_token(&mut self) -> Result<Token> {
        let bytes: &[u8] = match self.cursor.source {
            Source::Direct => &self.direct,
            Source::Arena => &self.arena.mem,
        };
        let (lexeme, next) = decode(bytes, self.cursor.pos)?;
        self.cursor.pos = next;
        self.cursor.token = lexeme.token();
        match lexeme {
            Lexeme::Ident(ident) => self.cursor.ident = ident,
            Lexeme::Integer(num) => self.cursor.num = num as f32,
            Lexeme::Number(num) => self.cursor.num = num,
            Lexeme::String(range) => self.cursor.text = range,
            Lexeme::Token(_) => {}
        }
        Ok(self.cursor.token)
    }

    /// Pushes the current string token.
    pub(super) fn push_text(&mut self) -> Result<()> {
        let range = self.cursor.text.clone();
        match self.cursor.source {
            Source::Direct => self.arena.push_str(&self.direct[range]),
            Source::Arena => self.arena.push_str_within(range),
        }
    }

    /// Forgets the program and variables.
    pub(super) fn reset(&mut self) {
        self.arena.reset();
        self.ctx.stop = None;
    }
}

impl<H: Host + Default> Default for Runtime<H> {
    fn default() -> Runtime<H> {
        Runtime::new(H::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Screen {
        out: String,
    }

    impl Host for Screen {
        fn output_char(&mut self, ch: u8) {
            self.out.push(ch as char);
        }
        fn new_line(&mut self) {
            self.out.push('\n');
        }
        fn read_line(&mut self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_direct_line() {
        let mut r = Runtime::<Screen>::default();
        r.enter("PRINT 1+2").unwrap();
        assert_eq!(r.host().out, "3\n");
    }

    #[test]
    fn test_stored_line_is_not_run() {
        let mut r = Runtime::<Screen>::default();
        r.enter("10 PRINT 1").unwrap();
        assert_eq!(r.host().out, "");
        assert!(!r.program_bytes().is_empty());
    }

    #[test]
    fn test_line_number_limits() {
        let mut r = Runtime::<Screen>::default();
        assert_eq!(
            r.enter("65536 PRINT").unwrap_err().code(),
            ErrorCode::LineNumTooBig
        );
        assert_eq!(r.enter("0 PRINT").unwrap_err().code(), ErrorCode::BadLineNum);
        assert!(r.enter("65535 PRINT").is_ok());
    }

    #[test]
    fn test_error_carries_line() {
        let mut r = Runtime::<Screen>::default();
        r.enter("10 PRINT 1/0").unwrap();
        let e = r.enter("RUN").unwrap_err();
        assert_eq!(e.code(), ErrorCode::DivisionByZero);
        assert_eq!(e.line_number(), Some(10));
        assert_eq!(r.enter("PRINT 1/0").unwrap_err().line_number(), None);
    }

    #[test]
    fn test_tokenize_failure_clears_buffer() {
        let mut r = Runtime::<Screen>::default();
        assert!(r.enter("PRINT \"abc").is_err());
        assert!(r.process_input().is_ok());
        assert_eq!(r.host().out, "");
    }
}

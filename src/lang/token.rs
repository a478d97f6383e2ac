use std::convert::TryFrom;

/// ## Token opcodes
///
/// A token stream is a sequence of single byte opcodes. Four of them are
/// followed by an inline payload:
///
/// * `Ident` - name bytes, the last one with its high bit set, then a byte
///   which is 1 for string identifiers. See [`Ident`](super::Ident).
/// * `Integer` - little-endian i32 (line numbers and whole literals).
/// * `Number` - little-endian f32.
/// * `String` - bytes terminated by NUL.
///
/// Every other opcode indexes the static [`TABLE`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Token {
    Eol = 0,
    Ident = 1,
    Integer = 2,
    Number = 3,
    String = 4,
    LParen = 8,
    RParen = 9,
    Plus = 10,
    Minus = 11,
    Multiply = 12,
    Divide = 13,
    Equal = 14,
    Greater = 15,
    Less = 16,
    NotEqual = 17,
    GreaterEqual = 18,
    LessEqual = 19,
    Colon = 20,
    Semicolon = 21,
    Comma = 22,
    And = 23,
    Or = 24,
    Not = 25,
    Print = 26,
    Let = 27,
    List = 28,
    Run = 29,
    Goto = 30,
    Rem = 31,
    Stop = 32,
    Input = 33,
    Cont = 34,
    If = 35,
    Then = 36,
    Len = 37,
    Val = 38,
    Rnd = 39,
    Int = 40,
    Str = 41,
    For = 42,
    To = 43,
    Step = 44,
    Next = 45,
    Mod = 46,
    New = 47,
    Gosub = 48,
    Return = 49,
    Dim = 50,
    Left = 51,
    Right = 52,
    Mid = 53,
    Cls = 54,
    Pause = 55,
    Position = 56,
    Pin = 57,
    PinMode = 58,
    Inkey = 59,
    Save = 60,
    Load = 61,
    PinRead = 62,
    AnalogRead = 63,
    Dir = 64,
    Delete = 65,
}

pub const FIRST_KEYWORD: u8 = Token::And as u8;
pub const LAST_KEYWORD: u8 = Token::Delete as u8;

/// Byte size of the inline payload of `Integer` and `Number` tokens.
pub const INTEGER_SIZE: usize = 4;
pub const NUMBER_SIZE: usize = 4;

/// Operators and punctuation in lexing order.
///
/// Invariant: when one lexeme is a prefix of another, the longer one comes
/// first. The lexer takes the first entry that matches, so `>=` must be
/// tried before `>`.
pub const OPERATORS: [Token; 15] = [
    Token::NotEqual,
    Token::GreaterEqual,
    Token::LessEqual,
    Token::LParen,
    Token::RParen,
    Token::Plus,
    Token::Minus,
    Token::Multiply,
    Token::Divide,
    Token::Equal,
    Token::Greater,
    Token::Less,
    Token::Colon,
    Token::Semicolon,
    Token::Comma,
];

/// Display text and signature of a table token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor {
    pub text: &'static str,
    /// Number of arguments taken by a built-in function.
    pub args: u8,
    /// Set bits mark string arguments, bit 0 is the first argument.
    pub string_args: u8,
    pub returns_string: bool,
    /// Print a space before the token when listing.
    pub pre: bool,
    /// Print a space after the token when listing.
    pub post: bool,
}

impl Descriptor {
    const fn none() -> Descriptor {
        Descriptor::symbol("")
    }
    const fn symbol(text: &'static str) -> Descriptor {
        Descriptor {
            text,
            args: 0,
            string_args: 0,
            returns_string: false,
            pre: false,
            post: false,
        }
    }
    const fn word(text: &'static str) -> Descriptor {
        Descriptor {
            post: true,
            ..Descriptor::symbol(text)
        }
    }
    const fn infix(text: &'static str) -> Descriptor {
        Descriptor {
            pre: true,
            post: true,
            ..Descriptor::symbol(text)
        }
    }
    const fn function(
        text: &'static str,
        args: u8,
        string_args: u8,
        returns_string: bool,
    ) -> Descriptor {
        Descriptor {
            args,
            string_args,
            returns_string,
            ..Descriptor::symbol(text)
        }
    }

    pub fn is_string_arg(&self, index: usize) -> bool {
        self.string_args & (1 << index) != 0
    }
}

pub static TABLE: [Descriptor; 66] = [
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::none(),
    Descriptor::symbol("("),
    Descriptor::symbol(")"),
    Descriptor::symbol("+"),
    Descriptor::symbol("-"),
    Descriptor::symbol("*"),
    Descriptor::symbol("/"),
    Descriptor::symbol("="),
    Descriptor::symbol(">"),
    Descriptor::symbol("<"),
    Descriptor::symbol("<>"),
    Descriptor::symbol(">="),
    Descriptor::symbol("<="),
    Descriptor::word(":"),
    Descriptor::symbol(";"),
    Descriptor::symbol(","),
    Descriptor::infix("AND"),
    Descriptor::infix("OR"),
    Descriptor::word("NOT"),
    Descriptor::word("PRINT"),
    Descriptor::word("LET"),
    Descriptor::word("LIST"),
    Descriptor::word("RUN"),
    Descriptor::word("GOTO"),
    Descriptor::word("REM"),
    Descriptor::word("STOP"),
    Descriptor::word("INPUT"),
    Descriptor::word("CONT"),
    Descriptor::word("IF"),
    Descriptor::infix("THEN"),
    Descriptor::function("LEN", 1, 0b001, false),
    Descriptor::function("VAL", 1, 0b001, false),
    Descriptor::symbol("RND"),
    Descriptor::function("INT", 1, 0, false),
    Descriptor::function("STR$", 1, 0, true),
    Descriptor::word("FOR"),
    Descriptor::infix("TO"),
    Descriptor::infix("STEP"),
    Descriptor::word("NEXT"),
    Descriptor::infix("MOD"),
    Descriptor::word("NEW"),
    Descriptor::word("GOSUB"),
    Descriptor::word("RETURN"),
    Descriptor::word("DIM"),
    Descriptor::function("LEFT$", 2, 0b001, true),
    Descriptor::function("RIGHT$", 2, 0b001, true),
    Descriptor::function("MID$", 3, 0b001, true),
    Descriptor::word("CLS"),
    Descriptor::word("PAUSE"),
    Descriptor::word("POSITION"),
    Descriptor::word("PIN"),
    Descriptor::word("PINMODE"),
    Descriptor::symbol("INKEY$"),
    Descriptor::word("SAVE"),
    Descriptor::word("LOAD"),
    Descriptor::function("PINREAD", 1, 0, false),
    Descriptor::function("ANALOGRD", 1, 0, false),
    Descriptor::word("DIR"),
    Descriptor::word("DELETE"),
];

impl Token {
    pub fn descriptor(self) -> &'static Descriptor {
        &TABLE[self as usize]
    }

    pub fn text(self) -> &'static str {
        self.descriptor().text
    }

    /// Case-insensitive keyword lookup over the keyword region of the table.
    pub fn keyword(s: &str) -> Option<Token> {
        (FIRST_KEYWORD..=LAST_KEYWORD)
            .filter_map(|b| Token::try_from(b).ok())
            .find(|t| t.text().eq_ignore_ascii_case(s))
    }

    /// Longest operator matching the start of `input`.
    pub fn operator(input: &[u8]) -> Option<Token> {
        OPERATORS
            .iter()
            .find(|t| input.starts_with(t.text().as_bytes()))
            .copied()
    }

    /// Binding strength of a binary operator, `None` for anything else.
    pub fn precedence(self) -> Option<i32> {
        use Token::*;
        match self {
            And | Or => Some(5),
            Equal | NotEqual => Some(10),
            Less | Greater | LessEqual | GreaterEqual => Some(20),
            Plus | Minus => Some(30),
            Multiply | Divide | Mod => Some(40),
            _ => None,
        }
    }

    pub fn is_function(self) -> bool {
        use Token::*;
        matches!(
            self,
            Len | Val | Int | Str | Left | Right | Mid | PinRead | AnalogRead
        )
    }

    pub fn ends_statement(self) -> bool {
        self == Token::Eol || self == Token::Colon
    }
}

impl TryFrom<u8> for Token {
    type Error = u8;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Token::*;
        let token = match byte {
            0 => Eol,
            1 => Ident,
            2 => Integer,
            3 => Number,
            4 => String,
            8 => LParen,
            9 => RParen,
            10 => Plus,
            11 => Minus,
            12 => Multiply,
            13 => Divide,
            14 => Equal,
            15 => Greater,
            16 => Less,
            17 => NotEqual,
            18 => GreaterEqual,
            19 => LessEqual,
            20 => Colon,
            21 => Semicolon,
            22 => Comma,
            23 => And,
            24 => Or,
            25 => Not,
            26 => Print,
            27 => Let,
            28 => List,
            29 => Run,
            30 => Goto,
            31 => Rem,
            32 => Stop,
            33 => Input,
            34 => Cont,
            35 => If,
            36 => Then,
            37 => Len,
            38 => Val,
            39 => Rnd,
            40 => Int,
            41 => Str,
            42 => For,
            43 => To,
            44 => Step,
            45 => Next,
            46 => Mod,
            47 => New,
            48 => Gosub,
            49 => Return,
            50 => Dim,
            51 => Left,
            52 => Right,
            53 => Mid,
            54 => Cls,
            55 => Pause,
            56 => Position,
            57 => Pin,
            58 => PinMode,
            59 => Inkey,
            60 => Save,
            61 => Load,
            62 => PinRead,
            63 => AnalogRead,
            64 => Dir,
            65 => Delete,
            _ => return Err(byte),
        };
        Ok(token)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}
